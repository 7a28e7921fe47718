use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Fire risk category derived from the predicted burned area.
///
/// Buckets are half-open: [0, 1) Low, [1, 10) Medium, [10, 50) High, [50, ∞) Very High.
/// The display strings are in the serving locale.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[strum(serialize = "Rendah")]
    Low,
    #[strum(serialize = "Sedang")]
    Medium,
    #[strum(serialize = "Tinggi")]
    High,
    #[strum(serialize = "Sangat Tinggi")]
    VeryHigh,
}

impl RiskLevel {
    /// Classify a predicted area in hectares
    pub fn from_area(area: f64) -> Self {
        if area < 1.0 {
            RiskLevel::Low
        } else if area < 10.0 {
            RiskLevel::Medium
        } else if area < 50.0 {
            RiskLevel::High
        } else {
            RiskLevel::VeryHigh
        }
    }

    /// Badge color shown next to the level
    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::Low => "green",
            RiskLevel::Medium => "yellow",
            RiskLevel::High => "orange",
            RiskLevel::VeryHigh => "red",
        }
    }

    /// Short label used for metrics
    pub fn metric_label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very_high",
        }
    }
}
