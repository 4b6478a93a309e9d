//! Tracing setup and the structured events windfield emits.
//!
//! Pipeline events carry an `operation` field (`fetch`, `data_load`,
//! `interpolate`) so one filter picks out a single stage.

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::error::{Result, WindfieldError};

/// Request tracing layer for the API router
pub type HttpTraceLayer = TraceLayer<SharedClassifier<ServerErrorsAsFailures>>;

pub fn create_http_trace_layer() -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// One timed pipeline stage.
///
/// Logs when it starts and, through [`Operation::finish`], how long it took
/// and whether it failed.
#[derive(Debug)]
pub struct Operation {
    name: &'static str,
    started: Instant,
}

impl Operation {
    pub fn start(name: &'static str, details: &str) -> Self {
        info!(operation = name, details, "Stage started");
        Self {
            name,
            started: Instant::now(),
        }
    }

    /// Log the outcome of the stage and hand the result back.
    pub fn finish<T>(self, result: Result<T>) -> Result<T> {
        let duration_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        match &result {
            Ok(_) => info!(operation = self.name, duration_ms, "Stage finished"),
            Err(e) => warn!(operation = self.name, duration_ms, error = %e, "Stage failed"),
        }
        result
    }
}

/// Summarize a freshly merged sample set
pub fn log_sample_stats(
    source: &str,
    grid_points: usize,
    samples: usize,
    fetched_at: DateTime<Utc>,
) {
    let coverage = if grid_points == 0 {
        0.0
    } else {
        samples as f64 / grid_points as f64
    };
    info!(
        operation = "data_load",
        source,
        grid_points,
        samples,
        coverage,
        fetched_at = %fetched_at.to_rfc3339(),
        "Samples ready"
    );
}

/// Log a served field. `elapsed` is `None` when it came from the memo.
pub fn log_field_stats(metric: &str, fineness: u32, points: usize, elapsed: Option<Duration>) {
    match elapsed {
        Some(elapsed) => debug!(
            operation = "interpolate",
            metric,
            fineness,
            points,
            duration_ms = elapsed.as_secs_f64() * 1000.0,
            "Field interpolated"
        ),
        None => debug!(
            operation = "interpolate",
            metric,
            fineness,
            points,
            "Field served from cache"
        ),
    }
}

/// Log an error that aborts `context`
pub fn log_error(error: &WindfieldError, context: &str) {
    error!(
        context,
        status = error.status_code().as_u16(),
        error = %error,
        "Aborted"
    );
}

/// Log a failed request. Caller mistakes are warnings, everything else is
/// an error.
pub fn log_request_error(
    error: &WindfieldError,
    endpoint: &str,
    request_id: &str,
    params: Option<&str>,
) {
    let status = error.status_code();
    let params = params.unwrap_or("none");
    if status.is_client_error() {
        warn!(
            endpoint,
            request_id,
            params,
            status = status.as_u16(),
            error = %error,
            "Request rejected"
        );
    } else {
        error!(
            endpoint,
            request_id,
            params,
            status = status.as_u16(),
            error = %error,
            "Request failed"
        );
    }
}

pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_unique_uuids() {
        let a = generate_request_id();
        let b = generate_request_id();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn test_operation_passes_result_through() {
        let ok = Operation::start("fetch", "49 grid points").finish(Ok(7));
        assert_eq!(ok.unwrap(), 7);

        let failed: Result<()> = Operation::start("data_load", "snapshot").finish(Err(
            WindfieldError::DataNotFound {
                message: "missing".to_string(),
            },
        ));
        assert!(matches!(failed, Err(WindfieldError::DataNotFound { .. })));
    }

    #[test]
    fn test_event_helpers_accept_edge_values() {
        log_sample_stats("live", 0, 0, Utc::now());
        log_field_stats("us_aqi", 5, 12_000, Some(Duration::from_millis(3)));
        log_field_stats("pm10", 1, 0, None);
        log_error(
            &WindfieldError::Config {
                message: "bad port".to_string(),
            },
            "startup",
        );
        log_request_error(
            &WindfieldError::invalid_parameter("bbox", "not finite"),
            "/field",
            "req-1",
            Some("bbox=NaN"),
        );
        log_request_error(
            &WindfieldError::DataNotFound {
                message: "empty".to_string(),
            },
            "/cities",
            "req-2",
            None,
        );
    }
}
