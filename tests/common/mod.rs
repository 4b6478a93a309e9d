//! Common test utilities for windfield.
//!
//! This module provides shared utilities for testing the windfield server.

// Not every test binary uses every helper
#![allow(dead_code)]

pub mod assertions;
pub mod http_client;
pub mod test_data;
