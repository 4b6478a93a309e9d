//! Discrete legend bands for the map key.

use serde::Serialize;

use super::sequential::sequential_color;
use crate::variables::{MetricKey, VariableConfig};

/// One entry of a discrete legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AqiBand {
    pub min: f64,
    pub max: f64,
    pub color: String,
    pub label: String,
}

/// The standard US AQI categories: `(min, max, color, label)`.
pub const AQI_BANDS: [(f64, f64, &str, &str); 6] = [
    (0.0, 50.0, "#22c55e", "Good"),
    (51.0, 100.0, "#eab308", "Moderate"),
    (101.0, 150.0, "#f97316", "USG"),
    (151.0, 200.0, "#ef4444", "Unhealthy"),
    (201.0, 300.0, "#a855f7", "Very Unhealthy"),
    (301.0, 500.0, "#991b1b", "Hazardous"),
];

const GENERATED_LABELS: [&str; 5] = ["Low", "Moderate", "Elevated", "High", "Very High"];

/// Legend for a variable: the fixed AQI table for US AQI, five equal bands
/// over the domain for everything else.
pub fn legend_bands(key: MetricKey) -> Vec<AqiBand> {
    if key == MetricKey::UsAqi {
        return AQI_BANDS
            .iter()
            .map(|&(min, max, color, label)| AqiBand {
                min,
                max,
                color: color.to_string(),
                label: label.to_string(),
            })
            .collect();
    }
    generate_bands(key.config())
}

/// Split the variable's domain into equal-width bands, each colored at its
/// midpoint.
pub fn generate_bands(config: &VariableConfig) -> Vec<AqiBand> {
    let (lo, hi) = config.domain;
    let n = GENERATED_LABELS.len();
    let width = (hi - lo) / n as f64;

    GENERATED_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| AqiBand {
            min: lo + i as f64 * width,
            max: lo + (i + 1) as f64 * width,
            color: sequential_color(Some((i as f64 + 0.5) / n as f64)).to_string(),
            label: label.to_string(),
        })
        .collect()
}
