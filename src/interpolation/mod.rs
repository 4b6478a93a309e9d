//! Spline interpolation of the coarse sample grid onto a finer grid.
//!
//! The engine reconstructs wind components and one scalar metric with a
//! bicubic Catmull-Rom stencil over the 4x4 coarse samples around each fine
//! point. It owns no state and allocates only its output field.

pub mod bicubic;
pub mod common;

pub use bicubic::interpolate_field;
pub use common::{catmull_rom, components_from_wind, fine_step, wind_from_components};

use serde::Serialize;

/// One interpolated fine-grid point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorDatum {
    /// Latitude, rounded to one decimal
    pub lat: f64,
    /// Longitude, rounded to one decimal
    pub lon: f64,
    /// Wind speed (m/s), never negative
    pub wind_speed: f64,
    /// Direction the wind blows from, degrees in `[0, 360)`
    pub wind_direction: f64,
    /// Interpolated scalar, floored at 0
    pub metric: f64,
}
