//! Configuration management for windfield.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, WindfieldError};
use crate::grid::GridSettings;

/// Default Open-Meteo forecast endpoint
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Default Open-Meteo air-quality endpoint
pub const DEFAULT_AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";

/// Command-line arguments for windfield
#[derive(Parser, Debug, Default)]
#[command(name = "windfield")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Serve a saved demo snapshot instead of fetching live data
    #[arg(short, long, env = "WINDFIELD_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Host address to bind to
    #[arg(short = 'H', long, env = "WINDFIELD_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "WINDFIELD_PORT")]
    pub port: Option<u16>,

    /// Fine cells per coarse grid step
    #[arg(short, long, env = "WINDFIELD_FINENESS")]
    pub fineness: Option<u32>,

    /// Path to JSON configuration file
    #[arg(short, long, env = "WINDFIELD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "WINDFIELD_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Where raw samples come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Query the upstream weather and air-quality APIs
    #[default]
    Live,
    /// Read a saved demo snapshot file
    Snapshot,
}

/// Data processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Data source
    #[serde(default)]
    pub source: DataSource,

    /// Path to the demo snapshot (required for the snapshot source)
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,

    /// Weather API endpoint
    #[serde(default = "default_weather_url")]
    pub weather_url: String,

    /// Air-quality API endpoint
    #[serde(default = "default_air_quality_url")]
    pub air_quality_url: String,

    /// Default number of fine cells per coarse step
    #[serde(default = "default_fineness")]
    pub fineness: u32,

    /// Memoize interpolated fields until the data is replaced
    #[serde(default = "default_cache_fields")]
    pub cache_fields: bool,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Grid layout
    #[serde(default)]
    pub grid: GridSettings,

    /// Data configuration
    #[serde(default)]
    pub data: DataConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Build configuration from already parsed arguments
    pub fn from_args(args: Args) -> Result<Self> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments and environment
        if let Some(host) = args.host {
            config.server.host = host;
        }
        if let Some(port) = args.port {
            config.server.port = port;
        }
        if let Some(fineness) = args.fineness {
            config.data.fineness = fineness;
        }
        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }
        if let Some(snapshot) = args.snapshot {
            config.data.source = DataSource::Snapshot;
            config.data.snapshot_path = Some(snapshot);
        }

        Ok(config)
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.server = other.server;
        self.grid = other.grid;
        self.data = other.data;
        self.log_level = other.log_level;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate server host (must be a valid IP or hostname)
        if self.server.host.is_empty() {
            return Err(config_error("Server host cannot be empty"));
        }

        // Validate port (0 is not a valid port for users)
        if self.server.port == 0 {
            return Err(config_error("Server port cannot be 0"));
        }

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(config_error(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.log_level
                )));
            }
        }

        // Validate grid layout
        let grid = &self.grid;
        if grid.step <= 0.0 || !grid.step.is_finite() {
            return Err(config_error(format!(
                "Grid step must be a positive number, got {}",
                grid.step
            )));
        }
        if grid.min_lat_span < 0.0 || grid.min_lon_span < 0.0 {
            return Err(config_error("Grid spans cannot be negative"));
        }
        if !(-90.0..=90.0).contains(&grid.center_lat) {
            return Err(config_error(format!(
                "Center latitude {} is outside -90 to 90",
                grid.center_lat
            )));
        }
        // The bicubic stencil reaches two steps past the view
        if grid.fetch_margin_steps < 2 {
            return Err(config_error(format!(
                "Fetch margin must be at least 2 steps, got {}",
                grid.fetch_margin_steps
            )));
        }

        // Validate data settings
        if self.data.fineness == 0 {
            return Err(config_error("Fineness must be at least 1"));
        }
        if self.data.source == DataSource::Snapshot && self.data.snapshot_path.is_none() {
            return Err(config_error("Snapshot source requires a snapshot path"));
        }

        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> WindfieldError {
    WindfieldError::Config {
        message: message.into(),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            grid: GridSettings::default(),
            data: DataConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: DataSource::default(),
            snapshot_path: None,
            weather_url: default_weather_url(),
            air_quality_url: default_air_quality_url(),
            fineness: default_fineness(),
            cache_fields: default_cache_fields(),
        }
    }
}

// Default value functions for serde
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_weather_url() -> String {
    DEFAULT_WEATHER_URL.to_string()
}

fn default_air_quality_url() -> String {
    DEFAULT_AIR_QUALITY_URL.to_string()
}

fn default_fineness() -> u32 {
    5
}

fn default_cache_fields() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.data.source, DataSource::Live);
        assert_eq!(config.data.fineness, 5);
        assert_eq!(config.grid.step, 2.0);
        assert_eq!(config.grid.fetch_margin_steps, 8);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_merge() {
        let mut config1 = Config::default();
        let mut config2 = Config::default();

        config2.server.port = 9000;
        config2.data.fineness = 3;

        config1.merge(config2);

        assert_eq!(config1.server.port, 9000);
        assert_eq!(config1.data.fineness, 3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"grid": {"step": 1.0}, "data": {"fineness": 2}}"#).unwrap();
        assert_eq!(config.grid.step, 1.0);
        assert_eq!(config.grid.center_lon, 125.0);
        assert_eq!(config.data.fineness, 2);
        assert_eq!(config.data.weather_url, DEFAULT_WEATHER_URL);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_args_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"server": {{"host": "0.0.0.0", "port": 9100}}, "log_level": "debug"}}"#
        )
        .unwrap();

        let args = Args {
            config: Some(file.path().to_path_buf()),
            port: Some(9200),
            snapshot: Some(PathBuf::from("demo.json")),
            ..Default::default()
        };
        let config = Config::from_args(args).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9200);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.data.source, DataSource::Snapshot);
        assert_eq!(config.data.snapshot_path, Some(PathBuf::from("demo.json")));
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let args = Args {
            config: Some(PathBuf::from("/definitely/not/here.json")),
            ..Default::default()
        };
        assert!(Config::from_args(args).is_err());
    }

    #[test]
    fn test_config_validation() {
        // Valid config should pass
        let config = Config::default();
        assert!(config.validate().is_ok());

        // Test invalid host
        let mut config = Config::default();
        config.server.host = "".to_string();
        assert!(config.validate().is_err());

        // Test invalid port
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        // Test invalid log level
        let mut config = Config::default();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());

        // Test invalid step
        let mut config = Config::default();
        config.grid.step = 0.0;
        assert!(config.validate().is_err());

        // Test a margin too small for the stencil
        let mut config = Config::default();
        config.grid.fetch_margin_steps = 1;
        assert!(config.validate().is_err());

        // Test zero fineness
        let mut config = Config::default();
        config.data.fineness = 0;
        assert!(config.validate().is_err());

        // Test snapshot source without a path
        let mut config = Config::default();
        config.data.source = DataSource::Snapshot;
        assert!(config.validate().is_err());
    }
}
