//! City label endpoint handler.
//!
//! Looks up each visible city's value in the same interpolated field the
//! map is drawn from.

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
use crate::cities::{nearest_values, visible_cities, CityDatum};
use crate::colormaps::{metric_color, Rgb};
use crate::error::Result;
use crate::interpolation::fine_step;
use crate::logging::generate_request_id;
use crate::state::AppState;

/// Query parameters for the cities endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CitiesQuery {
    pub metric: Option<String>,
    pub fineness: Option<u32>,
    pub bbox: Option<String>,
}

/// A city label with its display color
#[derive(Debug, Clone, Serialize)]
pub struct CityLabel {
    #[serde(flatten)]
    pub city: CityDatum,
    pub color: Rgb,
}

/// Handle GET /cities requests
pub async fn cities_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CitiesQuery>,
) -> Response {
    let request_id = generate_request_id();
    let start_time = Instant::now();

    debug!(
        endpoint = "/cities",
        request_id = %request_id,
        metric = ?params.metric,
        "Processing cities query"
    );

    match process_cities_query(&state, &params) {
        Ok(labels) => {
            info!(
                endpoint = "/cities",
                request_id = %request_id,
                cities = labels.len(),
                duration_us = start_time.elapsed().as_micros() as u64,
                "Cities query successful"
            );
            Json(labels).into_response()
        }
        Err(error) => error_response(
            error,
            "/cities",
            &request_id,
            Some(&format!("{:?}", params)),
        ),
    }
}

fn process_cities_query(state: &AppState, params: &CitiesQuery) -> Result<Vec<CityLabel>> {
    let metric = parse_metric(params.metric.as_deref())?;
    let fineness = resolve_fineness(state, params.fineness)?;
    let area = resolve_area(state, params.bbox.as_deref())?;
    let step = state.config.grid.step;
    check_field_size(&area, step, fineness)?;

    let field = state.field(&area, fineness, metric)?;
    let cities = visible_cities(&area);
    let config = metric.config();

    Ok(nearest_values(&cities, &field, &area, fine_step(step, fineness))
        .into_iter()
        .map(|city| CityLabel {
            color: metric_color(city.metric, config),
            city,
        })
        .collect())
}
