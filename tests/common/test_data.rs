//! Test data generation utilities.
//!
//! This module builds upstream-shaped responses and demo snapshots with known
//! data patterns for testing the windfield server.

use chrono::Utc;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use windfield::config::{Config, DataSource};
use windfield::data_loader::{save_snapshot, Snapshot};
use windfield::grid::{GridPoint, GridSettings};

/// Wind speed at every test grid point (m/s)
pub const WIND_SPEED: f64 = 5.0;

/// Wind direction at every test grid point (a westerly)
pub const WIND_FROM: f64 = 270.0;

/// A small layout around Seoul: view 36-40N, 124-128E, fetched with a
/// two-step margin (7x7 coarse points).
pub fn test_grid_settings() -> GridSettings {
    GridSettings {
        center_lat: 38.0,
        center_lon: 126.0,
        min_lat_span: 4.0,
        min_lon_span: 4.0,
        step: 2.0,
        fetch_margin_steps: 2,
    }
}

/// US AQI pattern: linear in both coordinates
pub fn us_aqi_at(lat: f64, lon: f64) -> f64 {
    2.0 * lat + lon - 150.0
}

/// PM2.5 pattern: linear, decreasing eastward
pub fn pm25_at(lat: f64, lon: f64) -> f64 {
    lat - 0.5 * lon + 80.0
}

/// One location of an Open-Meteo forecast response
pub fn weather_response(point: &GridPoint) -> Value {
    json!({
        "latitude": point.lat,
        "longitude": point.lon,
        "current_units": {"wind_speed_10m": "m/s", "wind_direction_10m": "°"},
        "current": {
            "time": "2024-03-01T06:00",
            "wind_speed_10m": WIND_SPEED,
            "wind_direction_10m": WIND_FROM
        }
    })
}

/// One location of an Open-Meteo air-quality response
pub fn air_quality_response(point: &GridPoint) -> Value {
    json!({
        "latitude": point.lat,
        "longitude": point.lon,
        "current": {
            "time": "2024-03-01T06:00",
            "us_aqi": us_aqi_at(point.lat, point.lon),
            "pm2_5": pm25_at(point.lat, point.lon),
            "ozone": null
        }
    })
}

/// A snapshot covering the fetch grid of `settings`
pub fn build_snapshot(settings: &GridSettings) -> Snapshot {
    let grid = settings.fetch_grid();
    Snapshot {
        fetched_at: Utc::now(),
        weather: grid.iter().map(weather_response).collect(),
        air_quality: grid.iter().map(air_quality_response).collect(),
        grid,
    }
}

/// Write the test snapshot into `dir` and return its path
pub fn write_snapshot(dir: &Path, settings: &GridSettings) -> PathBuf {
    let path = dir.join("demo-data.json");
    save_snapshot(&path, &build_snapshot(settings)).expect("Failed to write test snapshot");
    path
}

/// Configuration that serves the snapshot at `path`
pub fn snapshot_config(path: PathBuf) -> Config {
    let mut config = Config::default();
    config.grid = test_grid_settings();
    config.data.source = DataSource::Snapshot;
    config.data.snapshot_path = Some(path);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_index_aligned() {
        let snapshot = build_snapshot(&test_grid_settings());
        assert_eq!(snapshot.grid.len(), 49);
        assert_eq!(snapshot.weather.len(), 49);
        assert_eq!(snapshot.air_quality.len(), 49);
        assert_eq!(snapshot.air_quality[3]["latitude"], json!(snapshot.grid[3].lat));
    }
}
