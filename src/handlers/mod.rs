//! HTTP request handlers for the windfield API.
//!
//! This module contains all the endpoint handlers for the web server, the
//! router that wires them up and the shared error-to-response mapping.

pub mod cities;
pub mod field;
pub mod heartbeat;
pub mod legend;
pub mod refresh;

pub use cities::cities_handler;
pub use field::field_handler;
pub use heartbeat::heartbeat_handler;
pub use legend::{legend_handler, variables_handler};
pub use refresh::refresh_handler;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::error::{Result, WindfieldError};
use crate::grid::GeoBounds;
use crate::interpolation::fine_step;
use crate::logging::log_request_error;
use crate::state::AppState;
use crate::variables::MetricKey;

/// Upper bound on the `fineness` query parameter
pub const MAX_FINENESS: u32 = 20;

/// Upper bound on the number of points in one interpolated field
pub const MAX_FIELD_POINTS: usize = 250_000;

/// Build the API router over the shared state
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/field", get(field_handler))
        .route("/cities", get(cities_handler))
        .route("/legend", get(legend_handler))
        .route("/variables", get(variables_handler))
        .route("/heartbeat", get(heartbeat_handler))
        .route("/refresh", post(refresh_handler))
        .with_state(state)
}

/// Log a failed request and turn the error into a JSON response
pub(crate) fn error_response(
    error: WindfieldError,
    endpoint: &str,
    request_id: &str,
    params: Option<&str>,
) -> Response {
    log_request_error(&error, endpoint, request_id, params);

    (
        error.status_code(),
        Json(serde_json::json!({
            "error": error.to_string(),
            "request_id": request_id
        })),
    )
        .into_response()
}

/// Parse an optional `metric` parameter, defaulting to US AQI
pub(crate) fn parse_metric(metric: Option<&str>) -> Result<MetricKey> {
    match metric {
        Some(s) => s.parse(),
        None => Ok(MetricKey::default()),
    }
}

/// Resolve the requested fineness against the configured default and limits
pub(crate) fn resolve_fineness(state: &AppState, fineness: Option<u32>) -> Result<u32> {
    let fineness = fineness.unwrap_or(state.config.data.fineness);
    if fineness == 0 || fineness > MAX_FINENESS {
        return Err(WindfieldError::invalid_parameter(
            "fineness",
            format!("must be between 1 and {}", MAX_FINENESS),
        ));
    }
    Ok(fineness)
}

/// Resolve the requested area, defaulting to the configured view
pub(crate) fn resolve_area(state: &AppState, bbox: Option<&str>) -> Result<GeoBounds> {
    match bbox {
        Some(bbox) => GeoBounds::parse_bbox(bbox),
        None => Ok(state.view_bounds()),
    }
}

/// Reject areas whose fine grid would exceed [`MAX_FIELD_POINTS`]
pub(crate) fn check_field_size(area: &GeoBounds, step: f64, fineness: u32) -> Result<()> {
    let fine = fine_step(step, fineness);
    let rows = ((area.lat_max - area.lat_min) / fine).floor() + 1.0;
    let cols = ((area.lon_max - area.lon_min) / fine).floor() + 1.0;
    let points = rows * cols;
    if !(points <= MAX_FIELD_POINTS as f64) {
        return Err(WindfieldError::invalid_parameter(
            "bbox",
            format!(
                "Requested field has about {} points, the limit is {}",
                points as u64, MAX_FIELD_POINTS
            ),
        ));
    }
    Ok(())
}
