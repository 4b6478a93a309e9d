//! The pollutant and index variables that can be mapped.
//!
//! Configs are static, process-wide and read-only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WindfieldError;

/// Identifier of one of the known scalar variables.
///
/// The serialized names double as the Open-Meteo air-quality field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    #[default]
    UsAqi,
    EuropeanAqi,
    #[serde(rename = "pm2_5")]
    Pm25,
    Pm10,
    Dust,
    AerosolOpticalDepth,
    CarbonMonoxide,
    NitrogenDioxide,
    SulphurDioxide,
    Ozone,
}

impl MetricKey {
    /// Every known key, in display order.
    pub const ALL: [MetricKey; 10] = [
        MetricKey::UsAqi,
        MetricKey::EuropeanAqi,
        MetricKey::Pm25,
        MetricKey::Pm10,
        MetricKey::Dust,
        MetricKey::AerosolOpticalDepth,
        MetricKey::CarbonMonoxide,
        MetricKey::NitrogenDioxide,
        MetricKey::SulphurDioxide,
        MetricKey::Ozone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::UsAqi => "us_aqi",
            MetricKey::EuropeanAqi => "european_aqi",
            MetricKey::Pm25 => "pm2_5",
            MetricKey::Pm10 => "pm10",
            MetricKey::Dust => "dust",
            MetricKey::AerosolOpticalDepth => "aerosol_optical_depth",
            MetricKey::CarbonMonoxide => "carbon_monoxide",
            MetricKey::NitrogenDioxide => "nitrogen_dioxide",
            MetricKey::SulphurDioxide => "sulphur_dioxide",
            MetricKey::Ozone => "ozone",
        }
    }

    /// The static display configuration for this key.
    pub fn config(&self) -> &'static VariableConfig {
        // VARIABLE_CONFIGS is laid out in the same order as ALL
        &VARIABLE_CONFIGS[*self as usize]
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = WindfieldError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        MetricKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s.to_lowercase())
            .ok_or_else(|| {
                WindfieldError::invalid_parameter("metric", format!("Unknown metric: {}", s))
            })
    }
}

/// Which gradient a variable is colored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Fixed 0-500 piecewise AQI gradient
    Aqi,
    /// Generic 4-stop gradient over the variable's domain
    Sequential,
}

/// Display configuration for one variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableConfig {
    pub key: MetricKey,
    pub label: &'static str,
    pub unit: &'static str,
    pub domain: (f64, f64),
    pub color_scheme: ColorScheme,
}

impl VariableConfig {
    /// Normalize a value into the variable's domain (not clamped).
    pub fn normalize(&self, value: f64) -> f64 {
        let (lo, hi) = self.domain;
        (value - lo) / (hi - lo)
    }
}

const fn config(
    key: MetricKey,
    label: &'static str,
    unit: &'static str,
    domain: (f64, f64),
    color_scheme: ColorScheme,
) -> VariableConfig {
    VariableConfig {
        key,
        label,
        unit,
        domain,
        color_scheme,
    }
}

/// All variable configs, indexed by `MetricKey as usize`.
pub static VARIABLE_CONFIGS: [VariableConfig; 10] = [
    config(MetricKey::UsAqi, "US AQI", "", (0.0, 500.0), ColorScheme::Aqi),
    config(MetricKey::EuropeanAqi, "EU AQI", "", (0.0, 100.0), ColorScheme::Aqi),
    config(MetricKey::Pm25, "PM2.5", "μg/m³", (0.0, 150.0), ColorScheme::Sequential),
    config(MetricKey::Pm10, "PM10", "μg/m³", (0.0, 300.0), ColorScheme::Sequential),
    config(MetricKey::Dust, "Dust", "μg/m³", (0.0, 200.0), ColorScheme::Sequential),
    config(MetricKey::AerosolOpticalDepth, "AOD", "", (0.0, 2.0), ColorScheme::Sequential),
    config(MetricKey::CarbonMonoxide, "CO", "μg/m³", (0.0, 5000.0), ColorScheme::Sequential),
    config(MetricKey::NitrogenDioxide, "NO₂", "μg/m³", (0.0, 100.0), ColorScheme::Sequential),
    config(MetricKey::SulphurDioxide, "SO₂", "μg/m³", (0.0, 100.0), ColorScheme::Sequential),
    config(MetricKey::Ozone, "O₃", "μg/m³", (0.0, 200.0), ColorScheme::Sequential),
];
