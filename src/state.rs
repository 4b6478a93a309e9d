//! Application state management for windfield.
//!
//! This module defines the shared state that is passed to all handlers: the
//! configuration and the current dataset. A refresh swaps the whole dataset,
//! and with it the memo of interpolated fields built from it.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::{Config, DataSource};
use crate::error::{Result, WindfieldError};
use crate::grid::GeoBounds;
use crate::interpolation::{interpolate_field, VectorDatum};
use crate::logging::log_field_stats;
use crate::samples::SampleSet;
use crate::variables::MetricKey;

/// Memo size at which the field cache starts over
const MAX_CACHED_FIELDS: usize = 64;

/// Memo key for an interpolated field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FieldKey {
    area: [u64; 4],
    fineness: u32,
    metric: MetricKey,
}

impl FieldKey {
    fn new(area: &GeoBounds, fineness: u32, metric: MetricKey) -> Self {
        Self {
            area: [
                area.lon_min.to_bits(),
                area.lon_max.to_bits(),
                area.lat_min.to_bits(),
                area.lat_max.to_bits(),
            ],
            fineness,
            metric,
        }
    }
}

/// One fetch cycle's samples plus the fields derived from them
#[derive(Debug)]
pub struct Dataset {
    /// Merged coarse samples
    pub samples: SampleSet,
    /// Number of grid points that were requested
    pub grid_points: usize,
    /// When the upstream data was fetched
    pub fetched_at: DateTime<Utc>,
    /// Where the samples came from
    pub source: DataSource,
    cache: Mutex<HashMap<FieldKey, Arc<Vec<VectorDatum>>>>,
}

impl Dataset {
    pub fn new(
        samples: SampleSet,
        grid_points: usize,
        fetched_at: DateTime<Utc>,
        source: DataSource,
    ) -> Self {
        Self {
            samples,
            grid_points,
            fetched_at,
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of memoized fields
    pub fn cached_fields(&self) -> usize {
        self.cache.lock().len()
    }

    /// Interpolate (or recall) the field for `area`.
    pub fn field(
        &self,
        area: &GeoBounds,
        step: f64,
        fineness: u32,
        metric: MetricKey,
        use_cache: bool,
    ) -> Result<Arc<Vec<VectorDatum>>> {
        let key = FieldKey::new(area, fineness, metric);
        if use_cache {
            if let Some(hit) = self.cache.lock().get(&key) {
                log_field_stats(metric.as_str(), fineness, hit.len(), None);
                return Ok(Arc::clone(hit));
            }
        }

        let started = Instant::now();
        let field = Arc::new(interpolate_field(
            &self.samples,
            area,
            step,
            fineness,
            metric,
        )?);
        log_field_stats(
            metric.as_str(),
            fineness,
            field.len(),
            Some(started.elapsed()),
        );

        if use_cache {
            let mut cache = self.cache.lock();
            if cache.len() >= MAX_CACHED_FIELDS {
                cache.clear();
            }
            cache.insert(key, Arc::clone(&field));
        }
        Ok(field)
    }
}

/// The main application state shared across all handlers
#[derive(Debug)]
pub struct AppState {
    /// Configuration
    pub config: Config,
    dataset: RwLock<Arc<Dataset>>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(config: Config, dataset: Dataset) -> Self {
        Self {
            config,
            dataset: RwLock::new(Arc::new(dataset)),
        }
    }

    /// Create a new AppState wrapped in an Arc for shared ownership
    pub fn new_shared(config: Config, dataset: Dataset) -> Arc<Self> {
        Arc::new(Self::new(config, dataset))
    }

    /// The current dataset. Holders keep it alive across a refresh.
    pub fn dataset(&self) -> Arc<Dataset> {
        Arc::clone(&self.dataset.read())
    }

    /// Swap in a freshly loaded dataset
    pub fn replace_dataset(&self, dataset: Dataset) {
        let samples = dataset.samples.len();
        let fetched_at = dataset.fetched_at;
        *self.dataset.write() = Arc::new(dataset);
        info!(
            samples = samples,
            fetched_at = %fetched_at,
            "Dataset replaced"
        );
    }

    /// Default map view
    pub fn view_bounds(&self) -> GeoBounds {
        self.config.grid.view_bounds()
    }

    /// Interpolated field for `area` from the current dataset
    pub fn field(
        &self,
        area: &GeoBounds,
        fineness: u32,
        metric: MetricKey,
    ) -> Result<Arc<Vec<VectorDatum>>> {
        self.dataset().field(
            area,
            self.config.grid.step,
            fineness,
            metric,
            self.config.data.cache_fields,
        )
    }

    /// Validate that the application state is consistent and ready for use
    pub fn validate(&self) -> Result<()> {
        let dataset = self.dataset();
        if dataset.samples.is_empty() {
            return Err(WindfieldError::DataNotFound {
                message: "No samples were loaded".to_string(),
            });
        }

        // The stencil reads two coarse steps past the view
        let needed = self.view_bounds().expand(2.0 * self.config.grid.step);
        let mut lats = dataset.samples.iter().map(|(k, _)| k.lat());
        let first = lats.next().unwrap_or(0.0);
        let (lat_min, lat_max) = lats.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let mut lons = dataset.samples.iter().map(|(k, _)| k.lon());
        let first = lons.next().unwrap_or(0.0);
        let (lon_min, lon_max) = lons.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

        if lat_min > needed.lat_min
            || lat_max < needed.lat_max
            || lon_min > needed.lon_min
            || lon_max < needed.lon_max
        {
            warn!(
                lat_min = lat_min,
                lat_max = lat_max,
                lon_min = lon_min,
                lon_max = lon_max,
                "Samples do not cover the view plus stencil margin; edges will fade toward zero"
            );
        }

        Ok(())
    }
}

/// Compact relative age of a timestamp: "just now", "5m ago", "3h ago", "2d ago".
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 24 * 60 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / (24 * 60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridPoint;
    use crate::samples::RawSample;
    use chrono::Duration;

    fn dataset() -> Dataset {
        let samples: SampleSet = (-2..=3)
            .flat_map(|i| (-2..=3).map(move |j| (i as f64 * 2.0, j as f64 * 2.0)))
            .map(|(lat, lon)| {
                (
                    GridPoint::new(lat, lon),
                    RawSample::new(1.0, 2.0).with_metric(MetricKey::UsAqi, Some(lat + lon)),
                )
            })
            .collect();
        let n = samples.len();
        Dataset::new(samples, n, Utc::now(), DataSource::Snapshot)
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.grid.center_lat = 1.0;
        config.grid.center_lon = 1.0;
        config.grid.min_lat_span = 2.0;
        config.grid.min_lon_span = 2.0;
        config
    }

    #[test]
    fn test_field_is_memoized() {
        let state = AppState::new(config(), dataset());
        let area = GeoBounds::new(0.0, 2.0, 0.0, 2.0);

        let first = state.field(&area, 2, MetricKey::UsAqi).unwrap();
        let second = state.field(&area, 2, MetricKey::UsAqi).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(state.dataset().cached_fields(), 1);

        let other = state.field(&area, 2, MetricKey::Pm10).unwrap();
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(state.dataset().cached_fields(), 2);
    }

    #[test]
    fn test_cache_disabled() {
        let mut config = config();
        config.data.cache_fields = false;
        let state = AppState::new(config, dataset());
        let area = GeoBounds::new(0.0, 2.0, 0.0, 2.0);

        let first = state.field(&area, 2, MetricKey::UsAqi).unwrap();
        let second = state.field(&area, 2, MetricKey::UsAqi).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
        assert_eq!(state.dataset().cached_fields(), 0);
    }

    #[test]
    fn test_replace_dataset_drops_cache() {
        let state = AppState::new(config(), dataset());
        let area = GeoBounds::new(0.0, 2.0, 0.0, 2.0);
        let before = state.field(&area, 1, MetricKey::UsAqi).unwrap();

        let held = state.dataset();
        state.replace_dataset(Dataset::new(
            SampleSet::new(),
            0,
            Utc::now(),
            DataSource::Live,
        ));

        // The old dataset stays usable for whoever still holds it
        assert_eq!(held.cached_fields(), 1);
        assert_eq!(state.dataset().cached_fields(), 0);
        assert_eq!(state.dataset().source, DataSource::Live);

        let after = state.field(&area, 1, MetricKey::UsAqi).unwrap();
        assert_eq!(after.len(), before.len());
        assert!(after.iter().all(|d| d.metric == 0.0));
    }

    #[test]
    fn test_validate() {
        let state = AppState::new(config(), dataset());
        assert!(state.validate().is_ok());

        let empty = AppState::new(
            config(),
            Dataset::new(SampleSet::new(), 0, Utc::now(), DataSource::Live),
        );
        assert!(matches!(
            empty.validate(),
            Err(WindfieldError::DataNotFound { .. })
        ));
    }

    #[test]
    fn test_time_ago() {
        let now = Utc::now();
        assert_eq!(time_ago(now, now), "just now");
        assert_eq!(time_ago(now - Duration::seconds(59), now), "just now");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(time_ago(now - Duration::minutes(59), now), "59m ago");
        assert_eq!(time_ago(now - Duration::minutes(60), now), "1h ago");
        assert_eq!(time_ago(now - Duration::hours(23), now), "23h ago");
        assert_eq!(time_ago(now - Duration::hours(49), now), "2d ago");
        assert_eq!(time_ago(now + Duration::minutes(3), now), "just now");
    }
}
