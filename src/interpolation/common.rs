//! Shared numeric primitives for the interpolation engine.

/// One-dimensional Catmull-Rom cubic through `p1` (at `t = 0`) and `p2`
/// (at `t = 1`), with `p0` and `p3` as the outer control points.
#[inline]
pub fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    0.5 * (2.0 * p1
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t * t
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t * t * t)
}

/// Fine-grid step for a coarse step split into `fineness` cells.
pub fn fine_step(step: f64, fineness: u32) -> f64 {
    step / fineness as f64
}

/// Convert wind components to `(speed, direction)`.
///
/// Direction follows the meteorological convention: the bearing the wind
/// blows *from*, in `[0, 360)`.
pub fn wind_from_components(u: f64, v: f64) -> (f64, f64) {
    let speed = (u * u + v * v).sqrt();
    let direction = ((-u).atan2(-v).to_degrees() + 360.0) % 360.0;
    (speed, direction)
}

/// Convert a speed and "from" direction (degrees) to `(u, v)` components.
pub fn components_from_wind(speed: f64, direction: f64) -> (f64, f64) {
    let rad = direction.to_radians();
    (-speed * rad.sin(), -speed * rad.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_catmull_rom_passes_through_control_points() {
        assert_eq!(catmull_rom(3.0, 7.0, -2.0, 11.0, 0.0), 7.0);
        assert_close(catmull_rom(3.0, 7.0, -2.0, 11.0, 1.0), -2.0);
    }

    #[test]
    fn test_catmull_rom_reproduces_linear_data() {
        for &t in &[0.0, 0.25, 0.5, 0.8] {
            assert_close(catmull_rom(1.0, 2.0, 3.0, 4.0, t), 2.0 + t);
        }
    }

    #[test]
    fn test_catmull_rom_midpoint() {
        // 0.5 * (2*1 + 1*0.5 + (-1)*0.25 + 0) for p = (0, 1, 1, 0)
        assert_close(catmull_rom(0.0, 1.0, 1.0, 0.0, 0.5), 1.125);
    }

    #[test]
    fn test_catmull_rom_overshoots_near_steps() {
        assert!(catmull_rom(10.0, 0.0, 0.0, 0.0, 0.5) < 0.0);
    }

    #[test]
    fn test_fine_step() {
        assert_eq!(fine_step(2.0, 5), 0.4);
        assert_eq!(fine_step(2.0, 1), 2.0);
    }

    #[test]
    fn test_wind_from_components() {
        // Blowing toward the east means wind from the west
        let (speed, dir) = wind_from_components(5.0, 0.0);
        assert_close(speed, 5.0);
        assert_close(dir, 270.0);

        let (speed, dir) = wind_from_components(0.0, -3.0);
        assert_close(speed, 3.0);
        assert_close(dir, 0.0);

        let (_, dir) = wind_from_components(-1.0, 1.0);
        assert_close(dir, 135.0);
    }

    #[test]
    fn test_wind_direction_range() {
        for i in 0..72 {
            let a = (i as f64 * 5.0).to_radians();
            let (speed, dir) = wind_from_components(a.cos() * 4.0, a.sin() * 4.0);
            assert!(speed >= 0.0);
            assert!((0.0..360.0).contains(&dir), "direction {} out of range", dir);
        }
        let (speed, dir) = wind_from_components(0.0, 0.0);
        assert_eq!(speed, 0.0);
        assert!((0.0..360.0).contains(&dir));
    }

    #[test]
    fn test_components_round_trip() {
        for &(speed, dir) in &[(5.0, 270.0), (2.5, 45.0), (8.0, 180.0), (1.0, 10.0)] {
            let (u, v) = components_from_wind(speed, dir);
            let (s, d) = wind_from_components(u, v);
            assert_close(s, speed);
            assert_close(d, dir);
        }
    }
}
