//! Legend and variable catalog endpoint handlers.

use axum::{extract::Query, response::IntoResponse, response::Response, Json};
use serde::{Deserialize, Serialize};

use super::{error_response, parse_metric};
use crate::colormaps::{legend_bands, AqiBand};
use crate::logging::generate_request_id;
use crate::variables::{VariableConfig, VARIABLE_CONFIGS};

/// Query parameters for the legend endpoint
#[derive(Debug, Deserialize)]
pub struct LegendQuery {
    pub metric: Option<String>,
}

/// Response for a legend query
#[derive(Debug, Serialize)]
pub struct LegendResponse {
    pub variable: &'static VariableConfig,
    pub bands: Vec<AqiBand>,
}

/// Handle GET /legend requests
pub async fn legend_handler(Query(params): Query<LegendQuery>) -> Response {
    match parse_metric(params.metric.as_deref()) {
        Ok(metric) => Json(LegendResponse {
            variable: metric.config(),
            bands: legend_bands(metric),
        })
        .into_response(),
        Err(error) => error_response(
            error,
            "/legend",
            &generate_request_id(),
            params.metric.as_deref(),
        ),
    }
}

/// Handle GET /variables requests
pub async fn variables_handler() -> Json<&'static [VariableConfig]> {
    Json(VARIABLE_CONFIGS.as_slice())
}
