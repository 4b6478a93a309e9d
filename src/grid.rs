//! The coarse sampling lattice.
//!
//! Samples live on a uniform lat/lon grid with a fixed step. Every coordinate
//! that is generated here, or used to look a sample up, is rounded to one
//! decimal degree so that keys stay stable under floating-point drift.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WindfieldError};

/// Tolerance added to the inclusive upper edge when stepping along an axis.
pub const COORD_EPSILON: f64 = 0.01;

/// Round a coordinate to one decimal degree.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Snap a coordinate down onto the step grid.
pub fn snap_down(v: f64, step: f64) -> f64 {
    (v / step).floor() * step
}

/// Snap a coordinate up onto the step grid.
pub fn snap_up(v: f64, step: f64) -> f64 {
    (v / step).ceil() * step
}

/// A rectangular region in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoBounds {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl GeoBounds {
    /// Create a new bounding box. `min <= max` on both axes is a precondition.
    pub fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Self {
        debug_assert!(lon_min <= lon_max, "lon_min must be <= lon_max");
        debug_assert!(lat_min <= lat_max, "lat_min must be <= lat_max");
        Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    /// Expand the box by `margin` degrees on every side.
    pub fn expand(&self, margin: f64) -> Self {
        Self::new(
            self.lon_min - margin,
            self.lon_max + margin,
            self.lat_min - margin,
            self.lat_max + margin,
        )
    }

    /// Whether the point lies inside the box (edges included).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&lat) && (self.lon_min..=self.lon_max).contains(&lon)
    }

    /// Parse a bounding box string "lon_min,lat_min,lon_max,lat_max"
    pub fn parse_bbox(bbox: &str) -> Result<Self> {
        let parts: Vec<&str> = bbox.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(WindfieldError::invalid_parameter(
                "bbox",
                "Bounding box must be in format 'lon_min,lat_min,lon_max,lat_max'",
            ));
        }

        let mut values = [0.0f64; 4];
        for (slot, (part, name)) in values
            .iter_mut()
            .zip(parts.iter().zip(["lon_min", "lat_min", "lon_max", "lat_max"]))
        {
            *slot = part.parse::<f64>().map_err(|_| {
                WindfieldError::invalid_parameter("bbox", format!("Invalid {}: {}", name, part))
            })?;
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(WindfieldError::invalid_parameter(
                "bbox",
                format!("Coordinates must be finite, got {}", bad),
            ));
        }
        let [lon_min, lat_min, lon_max, lat_max] = values;

        if lon_min > lon_max {
            return Err(WindfieldError::invalid_parameter(
                "bbox",
                format!("lon_min ({}) must be <= lon_max ({})", lon_min, lon_max),
            ));
        }
        if lat_min > lat_max {
            return Err(WindfieldError::invalid_parameter(
                "bbox",
                format!("lat_min ({}) must be <= lat_max ({})", lat_min, lat_max),
            ));
        }
        if !(-90.0..=90.0).contains(&lat_min) || !(-90.0..=90.0).contains(&lat_max) {
            return Err(WindfieldError::invalid_parameter(
                "bbox",
                "Latitude must be in the range -90 to 90",
            ));
        }

        if !(-180.0..=360.0).contains(&lon_min) || !(-180.0..=360.0).contains(&lon_max) {
            return Err(WindfieldError::invalid_parameter(
                "bbox",
                "Longitude must be in the range -180 to 360",
            ));
        }

        Ok(Self::new(lon_min, lon_max, lat_min, lat_max))
    }
}

/// A coarse grid coordinate, rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GridPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: round1(lat),
            lon: round1(lon),
        }
    }

    pub fn key(&self) -> GridKey {
        GridKey::new(self.lat, self.lon)
    }
}

/// Composite map key: latitude and longitude in tenths of a degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridKey {
    lat_tenths: i32,
    lon_tenths: i32,
}

impl GridKey {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat_tenths: (lat * 10.0).round() as i32,
            lon_tenths: (lon * 10.0).round() as i32,
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat_tenths as f64 / 10.0
    }

    pub fn lon(&self) -> f64 {
        self.lon_tenths as f64 / 10.0
    }
}

/// Values `min, min + step, ...` up to `max` (inclusive, with [`COORD_EPSILON`]).
///
/// Each value is computed as `min + i * step` rather than by repeated
/// addition. Returns an empty list for a non-positive step or any
/// non-finite input.
pub fn axis_values(min: f64, max: f64, step: f64) -> Vec<f64> {
    if !(min.is_finite() && max.is_finite() && step.is_finite()) || step <= 0.0 {
        return Vec::new();
    }
    let mut values = Vec::new();
    let mut i = 0u64;
    loop {
        let v = min + i as f64 * step;
        if v > max + COORD_EPSILON {
            break;
        }
        values.push(v);
        i += 1;
    }
    values
}

/// Enumerate the grid points covering `bounds`, row-major (all longitudes of
/// the first latitude, then the next latitude).
pub fn build_grid(bounds: &GeoBounds, step: f64) -> Vec<GridPoint> {
    let lats = axis_values(bounds.lat_min, bounds.lat_max, step);
    let lons = axis_values(bounds.lon_min, bounds.lon_max, step);

    let mut points = Vec::with_capacity(lats.len() * lons.len());
    for &lat in &lats {
        for &lon in &lons {
            points.push(GridPoint::new(lat, lon));
        }
    }
    points
}

/// Where the map is centered and how the coarse lattice is laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    /// Latitude of the view center
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,

    /// Longitude of the view center
    #[serde(default = "default_center_lon")]
    pub center_lon: f64,

    /// Minimum latitude span of the view, in degrees
    #[serde(default = "default_min_lat_span")]
    pub min_lat_span: f64,

    /// Minimum longitude span of the view, in degrees
    #[serde(default = "default_min_lon_span")]
    pub min_lon_span: f64,

    /// Coarse grid step, in degrees
    #[serde(default = "default_step")]
    pub step: f64,

    /// Number of steps the fetch box extends beyond the view on every side
    #[serde(default = "default_fetch_margin_steps")]
    pub fetch_margin_steps: u32,
}

impl GridSettings {
    /// The view box, snapped outward to the step grid.
    pub fn view_bounds(&self) -> GeoBounds {
        GeoBounds::new(
            snap_down(self.center_lon - self.min_lon_span / 2.0, self.step),
            snap_up(self.center_lon + self.min_lon_span / 2.0, self.step),
            snap_down(self.center_lat - self.min_lat_span / 2.0, self.step),
            snap_up(self.center_lat + self.min_lat_span / 2.0, self.step),
        )
    }

    /// The fetch box: the view expanded by the configured margin.
    pub fn fetch_bounds(&self) -> GeoBounds {
        self.view_bounds()
            .expand(self.fetch_margin_steps as f64 * self.step)
    }

    /// Grid points to request from the upstream sources.
    pub fn fetch_grid(&self) -> Vec<GridPoint> {
        build_grid(&self.fetch_bounds(), self.step)
    }
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            center_lat: default_center_lat(),
            center_lon: default_center_lon(),
            min_lat_span: default_min_lat_span(),
            min_lon_span: default_min_lon_span(),
            step: default_step(),
            fetch_margin_steps: default_fetch_margin_steps(),
        }
    }
}

fn default_center_lat() -> f64 {
    38.0
}

fn default_center_lon() -> f64 {
    125.0
}

fn default_min_lat_span() -> f64 {
    22.0
}

fn default_min_lon_span() -> f64 {
    42.0
}

fn default_step() -> f64 {
    2.0
}

fn default_fetch_margin_steps() -> u32 {
    8
}
