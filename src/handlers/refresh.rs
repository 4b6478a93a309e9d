//! Refresh endpoint handler.
//!
//! Re-runs the live fetch and swaps the new dataset in. Requests already
//! in flight finish against the dataset they started with.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use super::error_response;
use crate::config::DataSource;
use crate::data_loader::load_dataset;
use crate::error::{Result, WindfieldError};
use crate::logging::generate_request_id;
use crate::state::AppState;

/// Response for a successful refresh
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub fetched_at: DateTime<Utc>,
    pub samples: usize,
}

/// Handle POST /refresh requests
pub async fn refresh_handler(State(state): State<Arc<AppState>>) -> Response {
    let request_id = generate_request_id();
    let start_time = Instant::now();

    match refresh(&state).await {
        Ok(response) => {
            info!(
                endpoint = "/refresh",
                request_id = %request_id,
                samples = response.samples,
                duration_ms = start_time.elapsed().as_millis() as u64,
                "Refresh successful"
            );
            Json(response).into_response()
        }
        Err(error) => error_response(error, "/refresh", &request_id, None),
    }
}

async fn refresh(state: &AppState) -> Result<RefreshResponse> {
    if state.config.data.source == DataSource::Snapshot {
        return Err(WindfieldError::invalid_parameter(
            "source",
            "Serving a snapshot; there is nothing to refresh",
        ));
    }

    let dataset = load_dataset(&state.config).await?;
    let response = RefreshResponse {
        fetched_at: dataset.fetched_at,
        samples: dataset.samples.len(),
    };
    state.replace_dataset(dataset);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::samples::SampleSet;
    use crate::state::Dataset;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_refresh_rejected_for_snapshot_source() {
        let mut config = Config::default();
        config.data.source = DataSource::Snapshot;
        let state = AppState::new_shared(
            config,
            Dataset::new(SampleSet::new(), 0, Utc::now(), DataSource::Snapshot),
        );

        let response = refresh_handler(State(state)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
