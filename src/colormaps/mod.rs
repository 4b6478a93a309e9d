//! Scalar-to-color mapping for pollutant and index fields.
//!
//! Two gradients are provided: a piecewise AQI gradient over a fixed 0-500
//! scale and a generic four-stop gradient over a normalized `[0, 1]` domain.
//! Each variable statically selects one of them.

pub mod aqi;
pub mod colormap;
pub mod legend;
pub mod sequential;

pub use aqi::aqi_color;
pub use colormap::{lerp_color, metric_color, Rgb, NO_DATA};
pub use legend::{legend_bands, AqiBand, AQI_BANDS};
pub use sequential::sequential_color;
