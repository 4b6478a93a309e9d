//! Raw coarse-grid samples and the sparse keyed collection that holds them.
//!
//! A [`SampleSet`] is built once per fetch cycle by merging the weather and
//! air-quality responses onto the fetch grid, and is read-only afterwards.

use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::grid::{GridKey, GridPoint};
use crate::interpolation::components_from_wind;
use crate::variables::MetricKey;

/// Weather field carrying the 10 m wind speed (m/s).
pub const WIND_SPEED_FIELD: &str = "wind_speed_10m";

/// Weather field carrying the 10 m wind direction (degrees, "from").
pub const WIND_DIRECTION_FIELD: &str = "wind_direction_10m";

/// One coarse-grid reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSample {
    /// Eastward wind component (m/s)
    pub u: f64,
    /// Northward wind component (m/s)
    pub v: f64,
    /// Scalar readings; `None` means "not measured here"
    pub metrics: HashMap<MetricKey, Option<f64>>,
}

impl RawSample {
    pub fn new(u: f64, v: f64) -> Self {
        Self {
            u,
            v,
            metrics: HashMap::new(),
        }
    }

    /// Builder-style helper to attach a metric reading.
    pub fn with_metric(mut self, key: MetricKey, value: Option<f64>) -> Self {
        self.metrics.insert(key, value);
        self
    }

    pub fn metric(&self, key: MetricKey) -> Option<f64> {
        self.metrics.get(&key).copied().flatten()
    }
}

/// Sparse mapping from rounded grid coordinates to samples.
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    samples: HashMap<GridKey, RawSample>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, point: GridPoint, sample: RawSample) {
        self.samples.insert(point.key(), sample);
    }

    pub fn get(&self, lat: f64, lon: f64) -> Option<&RawSample> {
        self.samples.get(&GridKey::new(lat, lon))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GridKey, &RawSample)> {
        self.samples.iter()
    }
}

impl FromIterator<(GridPoint, RawSample)> for SampleSet {
    fn from_iter<I: IntoIterator<Item = (GridPoint, RawSample)>>(iter: I) -> Self {
        let mut set = SampleSet::new();
        for (point, sample) in iter {
            set.insert(point, sample);
        }
        set
    }
}

/// Upstream APIs answer a single location with an object and several with
/// an array; normalize both to a list.
pub fn response_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

fn current_number(response: &Value, field: &str) -> Option<f64> {
    response.get("current")?.get(field)?.as_f64()
}

/// Merge weather and air-quality responses onto the grid they were fetched for.
///
/// The merge is index-aligned: the i-th response of each source belongs to
/// `grid[i]`. A missing weather entry gives a calm sample, a missing
/// air-quality entry gives no readings.
pub fn merge_responses(grid: &[GridPoint], weather: &[Value], air_quality: &[Value]) -> SampleSet {
    if weather.len() != grid.len() {
        warn!(
            grid_points = grid.len(),
            responses = weather.len(),
            "Weather response count does not match grid"
        );
    }
    if air_quality.len() != grid.len() {
        warn!(
            grid_points = grid.len(),
            responses = air_quality.len(),
            "Air-quality response count does not match grid"
        );
    }

    let mut set = SampleSet::new();
    for (i, point) in grid.iter().enumerate() {
        let (u, v) = weather
            .get(i)
            .and_then(|w| {
                let speed = current_number(w, WIND_SPEED_FIELD)?;
                let direction = current_number(w, WIND_DIRECTION_FIELD)?;
                Some(components_from_wind(speed, direction))
            })
            .unwrap_or((0.0, 0.0));

        let mut sample = RawSample::new(u, v);
        if let Some(aq) = air_quality.get(i) {
            for key in MetricKey::ALL {
                if aq.get("current").and_then(|c| c.get(key.as_str())).is_some() {
                    sample
                        .metrics
                        .insert(key, current_number(aq, key.as_str()));
                }
            }
        }
        set.insert(*point, sample);
    }

    debug!(samples = set.len(), "Merged upstream responses");
    set
}
