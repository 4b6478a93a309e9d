//! Heartbeat endpoint handler.
//!
//! Returns server status information: uptime, memory usage and the age of
//! the data currently being served.

use axum::{extract::State, Json};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use uuid::Uuid;

use crate::config::DataSource;
use crate::state::{time_ago, AppState, Dataset};

/// Random server ID, fixed for the life of the process
static SERVER_ID: once_cell::sync::Lazy<String> =
    once_cell::sync::Lazy::new(|| Uuid::new_v4().to_string());

/// Server start time
static START_TIME: once_cell::sync::Lazy<SystemTime> = once_cell::sync::Lazy::new(SystemTime::now);

/// Heartbeat response structure
#[derive(Debug, Serialize)]
pub struct HeartbeatResponse {
    /// Server ID (unique per instance)
    pub server_id: String,
    /// Current timestamp (ISO 8601 format)
    pub timestamp: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Process memory usage in bytes
    pub memory_usage_bytes: Option<u64>,
    /// Dataset information
    pub dataset: DatasetInfo,
    /// Server status
    pub status: String,
}

/// Dataset information structure
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    pub source: DataSource,
    pub fetched_at: DateTime<Utc>,
    /// Relative age, e.g. "5m ago"
    pub age: String,
    pub grid_points: usize,
    pub samples: usize,
    pub cached_fields: usize,
}

impl DatasetInfo {
    fn describe(dataset: &Dataset, now: DateTime<Utc>) -> Self {
        Self {
            source: dataset.source,
            fetched_at: dataset.fetched_at,
            age: time_ago(dataset.fetched_at, now),
            grid_points: dataset.grid_points,
            samples: dataset.samples.len(),
            cached_fields: dataset.cached_fields(),
        }
    }
}

/// Handle GET /heartbeat requests
pub async fn heartbeat_handler(State(state): State<Arc<AppState>>) -> Json<HeartbeatResponse> {
    let now = SystemTime::now();
    let now_utc = DateTime::<Utc>::from(now);
    let uptime = now
        .duration_since(*START_TIME)
        .unwrap_or(Duration::from_secs(0));

    let dataset = state.dataset();
    let status = if dataset.samples.is_empty() {
        "degraded"
    } else {
        "healthy"
    };

    Json(HeartbeatResponse {
        server_id: SERVER_ID.clone(),
        timestamp: now_utc.to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime_seconds: uptime.as_secs(),
        memory_usage_bytes: get_memory_usage(),
        dataset: DatasetInfo::describe(&dataset, now_utc),
        status: status.to_string(),
    })
}

/// Resident set size of this process, where the platform exposes it
fn get_memory_usage() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        // Second field of statm is RSS in pages
        let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
        let pages = statm.split_whitespace().nth(1)?.parse::<u64>().ok()?;
        Some(pages * 4096)
    }

    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}
