//! Piecewise AQI gradient over the fixed 0-500 scale.
//!
//! Each category color is held flat across the first part of its band and
//! blended into the next category over the remainder.

use super::colormap::{lerp_color, Rgb, NO_DATA};

/// Upper end of the AQI scale.
pub const AQI_MAX: f64 = 500.0;

const GREEN: Rgb = Rgb::new(0x22, 0xc5, 0x5e);
const YELLOW: Rgb = Rgb::new(0xea, 0xb3, 0x08);
const ORANGE: Rgb = Rgb::new(0xf9, 0x73, 0x16);
const RED: Rgb = Rgb::new(0xef, 0x44, 0x44);
const PURPLE: Rgb = Rgb::new(0xa8, 0x55, 0xf7);
const MAROON: Rgb = Rgb::new(0x99, 0x1b, 0x1b);

/// `(value, color)` knots, sorted by value.
const AQI_STOPS: [(f64, Rgb); 12] = [
    (0.0, GREEN),
    (50.0, GREEN),
    (75.0, YELLOW),
    (100.0, YELLOW),
    (125.0, ORANGE),
    (150.0, ORANGE),
    (175.0, RED),
    (200.0, RED),
    (250.0, PURPLE),
    (300.0, PURPLE),
    (400.0, MAROON),
    (500.0, MAROON),
];

/// Map an AQI value to a color. `None` and NaN map to [`NO_DATA`].
pub fn aqi_color(aqi: Option<f64>) -> Rgb {
    let Some(aqi) = aqi.filter(|v| !v.is_nan()) else {
        return NO_DATA;
    };
    let v = aqi.clamp(0.0, AQI_MAX);

    let last = AQI_STOPS.len() - 1;
    let mut i = 0;
    while i < last && AQI_STOPS[i + 1].0 < v {
        i += 1;
    }
    if i >= last {
        return AQI_STOPS[last].1;
    }

    let (a_val, a_color) = AQI_STOPS[i];
    let (b_val, b_color) = AQI_STOPS[i + 1];
    let t = if b_val == a_val {
        0.0
    } else {
        (v - a_val) / (b_val - a_val)
    };
    lerp_color(a_color, b_color, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knots_reproduce_stop_colors() {
        for (value, color) in AQI_STOPS {
            assert_eq!(aqi_color(Some(value)), color, "knot at {}", value);
        }
        assert_eq!(aqi_color(Some(100.0)).to_string(), "rgb(234,179,8)");
        assert_eq!(aqi_color(Some(150.0)).to_string(), "rgb(249,115,22)");
    }

    #[test]
    fn test_blend_between_categories() {
        // Halfway between green at 50 and yellow at 75
        let mid = aqi_color(Some(62.5));
        assert_eq!(mid, lerp_color(GREEN, YELLOW, 0.5));
        assert_eq!(mid, Rgb::new(0x86, 0xbc, 0x33));
    }

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(aqi_color(Some(-20.0)), GREEN);
        assert_eq!(aqi_color(Some(900.0)), MAROON);
        assert_eq!(aqi_color(Some(f64::INFINITY)), MAROON);
    }

    #[test]
    fn test_none_is_gray() {
        assert_eq!(aqi_color(None), NO_DATA);
        assert_eq!(aqi_color(Some(f64::NAN)), NO_DATA);
    }

    #[test]
    fn test_total_over_scale() {
        let mut v = 0.0;
        while v <= AQI_MAX {
            let color = aqi_color(Some(v));
            assert_ne!(color, NO_DATA);
            v += 0.5;
        }
    }
}
