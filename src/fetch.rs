//! Upstream weather and air-quality fetches.
//!
//! Both sources are queried in one request each for the whole grid, with
//! comma-separated coordinate lists, and are awaited together. A non-success
//! status from either source fails the attempt; there are no retries.

use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::DataConfig;
use crate::data_loader::Snapshot;
use crate::error::{Result, WindfieldError};
use crate::grid::GridPoint;
use crate::logging::Operation;
use crate::samples::{response_list, WIND_DIRECTION_FIELD, WIND_SPEED_FIELD};
use crate::variables::MetricKey;

/// Upstream request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Air-quality model domain requested from the upstream API
const AIR_QUALITY_DOMAIN: &str = "cams_global";

/// HTTP client for the two upstream APIs
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    weather_url: String,
    air_quality_url: String,
}

impl UpstreamClient {
    pub fn new(weather_url: impl Into<String>, air_quality_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("windfield/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            weather_url: weather_url.into(),
            air_quality_url: air_quality_url.into(),
        })
    }

    pub fn from_config(config: &DataConfig) -> Result<Self> {
        Self::new(config.weather_url.clone(), config.air_quality_url.clone())
    }

    /// Current 10 m wind for every grid point, in m/s.
    pub async fn fetch_weather(&self, grid: &[GridPoint]) -> Result<Vec<Value>> {
        let current = format!("{},{}", WIND_SPEED_FIELD, WIND_DIRECTION_FIELD);
        let (lats, lons) = coordinate_lists(grid);
        let query = [
            ("latitude", lats),
            ("longitude", lons),
            ("current", current),
            ("wind_speed_unit", "ms".to_string()),
        ];
        self.get_json("Weather", &self.weather_url, &query)
            .await
            .map(response_list)
    }

    /// Current readings of every metric for every grid point.
    pub async fn fetch_air_quality(&self, grid: &[GridPoint]) -> Result<Vec<Value>> {
        let current = MetricKey::ALL
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let (lats, lons) = coordinate_lists(grid);
        let query = [
            ("latitude", lats),
            ("longitude", lons),
            ("current", current),
            ("domains", AIR_QUALITY_DOMAIN.to_string()),
        ];
        self.get_json("Air quality", &self.air_quality_url, &query)
            .await
            .map(response_list)
    }

    /// Fetch both sources concurrently and bundle them with the grid.
    pub async fn fetch_snapshot(&self, grid: Vec<GridPoint>) -> Result<Snapshot> {
        let op = Operation::start("fetch", &format!("{} grid points", grid.len()));
        let (weather, air_quality) = op.finish(tokio::try_join!(
            self.fetch_weather(&grid),
            self.fetch_air_quality(&grid)
        ))?;

        Ok(Snapshot {
            fetched_at: Utc::now(),
            grid,
            weather,
            air_quality,
        })
    }

    async fn get_json(
        &self,
        source_name: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Value> {
        debug!(source = source_name, url = url, "Requesting upstream data");
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WindfieldError::Fetch {
                source_name: source_name.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Comma-joined latitude and longitude lists, in grid order.
fn coordinate_lists(grid: &[GridPoint]) -> (String, String) {
    let lats = grid.iter().map(|p| p.lat.to_string()).collect::<Vec<_>>();
    let lons = grid.iter().map(|p| p.lon.to_string()).collect::<Vec<_>>();
    (lats.join(","), lons.join(","))
}
