//! Loading raw samples into memory.
//!
//! Samples come either from a live fetch of the upstream APIs or from a demo
//! snapshot file that stores the raw responses next to the grid they were
//! requested for. Both paths end in the same index-aligned merge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

use crate::config::{Config, DataSource};
use crate::error::{Result, WindfieldError};
use crate::fetch::UpstreamClient;
use crate::grid::GridPoint;
use crate::logging::{log_sample_stats, Operation};
use crate::samples::{merge_responses, SampleSet};
use crate::state::Dataset;

/// Raw upstream responses for one fetch, as persisted for demo mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub fetched_at: DateTime<Utc>,
    pub grid: Vec<GridPoint>,
    pub weather: Vec<Value>,
    pub air_quality: Vec<Value>,
}

impl Snapshot {
    /// Merge the stored responses back onto the stored grid.
    pub fn to_samples(&self) -> SampleSet {
        merge_responses(&self.grid, &self.weather, &self.air_quality)
    }

    /// Build the in-memory dataset for this snapshot.
    pub fn into_dataset(self, source: DataSource) -> Dataset {
        let samples = self.to_samples();
        log_sample_stats(
            source_name(source),
            self.grid.len(),
            samples.len(),
            self.fetched_at,
        );
        Dataset::new(samples, self.grid.len(), self.fetched_at, source)
    }
}

fn source_name(source: DataSource) -> &'static str {
    match source {
        DataSource::Live => "live",
        DataSource::Snapshot => "snapshot",
    }
}

/// Read a snapshot file from disk
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    // Check if the file exists
    if !path.exists() {
        return Err(WindfieldError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&content)?;

    info!(
        path = %path.display(),
        grid_points = snapshot.grid.len(),
        fetched_at = %snapshot.fetched_at,
        "Opened snapshot file"
    );
    Ok(snapshot)
}

/// Write a snapshot file, returning the number of bytes written
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<usize> {
    let json = serde_json::to_string(snapshot)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &json)?;
    debug!(path = %path.display(), bytes = json.len(), "Snapshot written");
    Ok(json.len())
}

/// Load the configured data source into a dataset
pub async fn load_dataset(config: &Config) -> Result<Dataset> {
    let source = config.data.source;
    let op = Operation::start("data_load", source_name(source));

    let snapshot = match source {
        DataSource::Snapshot => config
            .data
            .snapshot_path
            .as_deref()
            .ok_or_else(|| WindfieldError::Config {
                message: "Snapshot source requires a snapshot path".to_string(),
            })
            .and_then(load_snapshot),
        DataSource::Live => match UpstreamClient::from_config(&config.data) {
            Ok(client) => client.fetch_snapshot(config.grid.fetch_grid()).await,
            Err(e) => Err(e),
        },
    };

    Ok(op.finish(snapshot)?.into_dataset(source))
}
