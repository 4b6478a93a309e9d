//! # windfield
//!
//! An in-memory wind and air-quality field server.
//!
//! This library samples wind and pollutant readings on a coarse lat/lon
//! grid, reconstructs smooth fields between the samples with bicubic
//! Catmull-Rom interpolation and serves them, colored for display, over a
//! small HTTP API.
//!
//! ## Key Features
//!
//! - **Two data sources**: live Open-Meteo fetches or a saved demo snapshot
//! - **Smooth fields**: wind direction is interpolated through its `(u, v)`
//!   components, never as an angle
//! - **Ready-to-draw output**: AQI and sequential gradients, legends and
//!   city labels read from the same field
//!
//! ## Architecture
//!
//! - **Data Layer**: fetches or loads raw responses and merges them into a sample set
//! - **Processing**: interpolation, color mapping and per-city lookup, all pure
//! - **API Layer**: exposes fields, labels and legends through a JSON HTTP API

pub mod cities;
pub mod colormaps;
pub mod config;
pub mod data_loader;
pub mod error;
pub mod fetch;
pub mod grid;
pub mod handlers;
pub mod interpolation;
pub mod logging;
pub mod samples;
pub mod state;
pub mod variables;

pub use config::Config;
pub use error::{Result, WindfieldError};
pub use logging::{
    create_http_trace_layer, generate_request_id, init_tracing, log_error, log_request_error,
    Operation,
};
pub use state::{AppState, Dataset};
