//! Color type and per-variable dispatch.

use serde::{Serialize, Serializer};
use std::fmt;

use super::{aqi::aqi_color, sequential::sequential_color};
use crate::variables::{ColorScheme, VariableConfig};

/// An opaque RGB color. Displays as a CSS `rgb(r,g,b)` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Neutral gray used wherever there is no data (`#6b7280`).
pub const NO_DATA: Rgb = Rgb::new(0x6b, 0x72, 0x80);

/// Linear interpolation between two colors, each channel rounded to nearest.
pub fn lerp_color(c1: Rgb, c2: Rgb, t: f64) -> Rgb {
    let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    Rgb::new(channel(c1.r, c2.r), channel(c1.g, c2.g), channel(c1.b, c2.b))
}

/// Color a value of the given variable with that variable's gradient.
pub fn metric_color(value: Option<f64>, config: &VariableConfig) -> Rgb {
    let Some(value) = value else {
        return NO_DATA;
    };
    match config.color_scheme {
        ColorScheme::Aqi => aqi_color(Some(value)),
        ColorScheme::Sequential => sequential_color(Some(config.normalize(value))),
    }
}
