//! Field query endpoint handler.
//!
//! Returns the interpolated wind and metric field over an area, with a
//! display color attached to every point.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::{check_field_size, error_response, parse_metric, resolve_area, resolve_fineness};
use crate::colormaps::{metric_color, Rgb};
use crate::error::Result;
use crate::grid::GeoBounds;
use crate::interpolation::{fine_step, VectorDatum};
use crate::logging::generate_request_id;
use crate::state::AppState;
use crate::variables::MetricKey;

/// Query parameters for the field endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct FieldQuery {
    /// Variable to interpolate (default `us_aqi`)
    pub metric: Option<String>,
    /// Fine cells per coarse step (default from config)
    pub fineness: Option<u32>,
    /// Area as "lon_min,lat_min,lon_max,lat_max" (default: the view)
    pub bbox: Option<String>,
}

/// One field point with its display color
#[derive(Debug, Clone, Serialize)]
pub struct ColoredVector {
    #[serde(flatten)]
    pub datum: VectorDatum,
    pub color: Rgb,
}

/// Response for a field query
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldResponse {
    pub metric: MetricKey,
    pub fineness: u32,
    pub fine_step: f64,
    pub area: GeoBounds,
    pub count: usize,
    pub vectors: Vec<ColoredVector>,
}

/// Handle GET /field requests
pub async fn field_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FieldQuery>,
) -> Response {
    let request_id = generate_request_id();
    let start_time = Instant::now();

    debug!(
        endpoint = "/field",
        request_id = %request_id,
        metric = ?params.metric,
        fineness = ?params.fineness,
        bbox = ?params.bbox,
        "Processing field query"
    );

    match process_field_query(&state, &params) {
        Ok(response) => {
            let duration = start_time.elapsed();
            info!(
                endpoint = "/field",
                request_id = %request_id,
                metric = %response.metric,
                points = response.count,
                duration_us = duration.as_micros() as u64,
                "Field query successful"
            );
            Json(response).into_response()
        }
        Err(error) => error_response(
            error,
            "/field",
            &request_id,
            Some(&format!("{:?}", params)),
        ),
    }
}

fn process_field_query(state: &AppState, params: &FieldQuery) -> Result<FieldResponse> {
    let metric = parse_metric(params.metric.as_deref())?;
    let fineness = resolve_fineness(state, params.fineness)?;
    let area = resolve_area(state, params.bbox.as_deref())?;
    let step = state.config.grid.step;
    check_field_size(&area, step, fineness)?;

    let field = state.field(&area, fineness, metric)?;
    let config = metric.config();
    let vectors: Vec<ColoredVector> = field
        .iter()
        .map(|&datum| ColoredVector {
            datum,
            color: metric_color(Some(datum.metric), config),
        })
        .collect();

    Ok(FieldResponse {
        metric,
        fineness,
        fine_step: fine_step(step, fineness),
        area,
        count: vectors.len(),
        vectors,
    })
}
