//! Generic four-stop sequential gradient (green, yellow, orange, red).
//!
//! Used for every variable that is not an AQI index; callers normalize the
//! value into `[0, 1]` with the variable's domain first.

use super::colormap::{lerp_color, Rgb, NO_DATA};

const SEQ_STOPS: [Rgb; 4] = [
    Rgb::new(0x22, 0xc5, 0x5e), // green
    Rgb::new(0xea, 0xb3, 0x08), // yellow
    Rgb::new(0xf9, 0x73, 0x16), // orange
    Rgb::new(0xef, 0x44, 0x44), // red
];

/// Map a normalized value to a color. Input is clamped to `[0, 1]`;
/// `None` and NaN map to [`NO_DATA`].
pub fn sequential_color(t: Option<f64>) -> Rgb {
    let Some(t) = t.filter(|v| !v.is_nan()) else {
        return NO_DATA;
    };
    let segments = SEQ_STOPS.len() - 1;
    let scaled = t.clamp(0.0, 1.0) * segments as f64;
    let i = (scaled.floor() as usize).min(segments - 1);
    let f = scaled - i as f64;
    lerp_color(SEQ_STOPS[i], SEQ_STOPS[i + 1], f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(sequential_color(Some(0.0)), SEQ_STOPS[0]);
        assert_eq!(sequential_color(Some(1.0)), SEQ_STOPS[3]);
        assert_eq!(sequential_color(Some(-3.0)), SEQ_STOPS[0]);
        assert_eq!(sequential_color(Some(7.0)), SEQ_STOPS[3]);
    }

    #[test]
    fn test_continuous_at_breakpoints() {
        for k in 1..3 {
            let knot = k as f64 / 3.0;
            let at = sequential_color(Some(knot));
            assert_eq!(at, SEQ_STOPS[k]);

            let below = sequential_color(Some(knot - 1e-9));
            let above = sequential_color(Some(knot + 1e-9));
            for (x, y) in [(below, at), (above, at)] {
                assert!((x.r as i16 - y.r as i16).abs() <= 1);
                assert!((x.g as i16 - y.g as i16).abs() <= 1);
                assert!((x.b as i16 - y.b as i16).abs() <= 1);
            }
        }
    }

    #[test]
    fn test_midpoint_of_first_segment() {
        assert_eq!(
            sequential_color(Some(1.0 / 6.0)),
            lerp_color(SEQ_STOPS[0], SEQ_STOPS[1], 0.5)
        );
    }

    #[test]
    fn test_no_data() {
        assert_eq!(sequential_color(None), NO_DATA);
        assert_eq!(sequential_color(Some(f64::NAN)), NO_DATA);
    }
}
