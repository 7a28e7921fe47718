use serde::{Deserialize, Serialize};

/// Number of continuous inputs (fire indices and weather)
pub const N_CONTINUOUS: usize = 8;

/// Number of model features (continuous + encoded month + encoded day)
pub const N_FEATURES: usize = N_CONTINUOUS + 2;

/// Feature column order shared by training and inference.
///
/// Any divergence between the two silently produces wrong predictions, so both
/// sides go through [`Observation::features`].
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "FFMC", "DMC", "DC", "ISI", "temp", "RH", "wind", "rain", "month", "day",
];

/// Default month when the caller omits it
pub const DEFAULT_MONTH: &str = "jan";

/// Default day when the caller omits it
pub const DEFAULT_DAY: &str = "mon";

/// One set of fire-index and weather measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Fine Fuel Moisture Code
    pub ffmc: f64,
    /// Duff Moisture Code
    pub dmc: f64,
    /// Drought Code
    pub dc: f64,
    /// Initial Spread Index
    pub isi: f64,
    /// Temperature (°C)
    pub temp: f64,
    /// Relative humidity (%)
    pub rh: f64,
    /// Wind speed (km/h)
    pub wind: f64,
    /// Rainfall (mm/m²)
    pub rain: f64,
    /// Month abbreviation, e.g. "mar"
    pub month: String,
    /// Day-of-week abbreviation, e.g. "fri"
    pub day: String,
}

impl Observation {
    /// Continuous inputs in feature order
    pub fn continuous(&self) -> [f64; N_CONTINUOUS] {
        [
            self.ffmc, self.dmc, self.dc, self.isi, self.temp, self.rh, self.wind, self.rain,
        ]
    }

    /// Full feature row given the encoded categorical codes
    pub fn features(&self, month_code: usize, day_code: usize) -> [f64; N_FEATURES] {
        let mut row = [0.0; N_FEATURES];
        row[..N_CONTINUOUS].copy_from_slice(&self.continuous());
        row[N_CONTINUOUS] = month_code as f64;
        row[N_CONTINUOUS + 1] = day_code as f64;
        row
    }
}

impl Default for Observation {
    fn default() -> Self {
        Self {
            ffmc: 0.0,
            dmc: 0.0,
            dc: 0.0,
            isi: 0.0,
            temp: 0.0,
            rh: 0.0,
            wind: 0.0,
            rain: 0.0,
            month: DEFAULT_MONTH.to_string(),
            day: DEFAULT_DAY.to_string(),
        }
    }
}

/// Random forest hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of trees
    pub n_trees: usize,

    /// Maximum tree depth
    pub max_depth: u16,

    /// Minimum samples required to split a node
    pub min_samples_split: usize,

    /// Minimum samples per leaf
    pub min_samples_leaf: usize,

    /// Features considered at each split
    pub max_features: usize,

    /// Random seed for bootstrap resampling
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 2,
            max_features: N_FEATURES,
            seed: 42,
        }
    }
}

/// Fraction of rows held out for scoring
pub const TEST_SIZE: f64 = 0.2;

/// Seed for the train/test shuffle
pub const SPLIT_SEED: u64 = 42;

/// Outcome of one training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Coefficient of determination on the held-out partition (log space)
    pub r2_score: f64,

    /// Rows used for fitting
    pub n_train: usize,

    /// Rows held out for scoring
    pub n_test: usize,

    /// Training timestamp
    pub trained_at: chrono::DateTime<chrono::Utc>,
}

/// Model type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    /// Random forest
    RandomForest,
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelType::RandomForest => write!(f, "Random Forest"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_observation() -> Observation {
        Observation {
            ffmc: 86.2,
            dmc: 26.2,
            dc: 94.3,
            isi: 5.1,
            temp: 8.2,
            rh: 51.0,
            wind: 6.7,
            rain: 0.0,
            month: "mar".to_string(),
            day: "fri".to_string(),
        }
    }

    #[test]
    fn test_feature_row_order() {
        let row = sample_observation().features(7, 0);

        assert_eq!(row.len(), FEATURE_NAMES.len());
        assert_eq!(row[0], 86.2);
        assert_eq!(row[4], 8.2);
        assert_eq!(row[5], 51.0);
        assert_eq!(row[7], 0.0);
        assert_eq!(row[8], 7.0);
        assert_eq!(row[9], 0.0);
    }

    #[test]
    fn test_observation_defaults() {
        let obs = Observation::default();
        assert_eq!(obs.continuous(), [0.0; N_CONTINUOUS]);
        assert_eq!(obs.month, "jan");
        assert_eq!(obs.day, "mon");
    }

    #[test]
    fn test_forest_params_default() {
        let params = ForestParams::default();
        assert_eq!(params.n_trees, 100);
        assert_eq!(params.max_depth, 10);
        assert_eq!(params.min_samples_split, 5);
        assert_eq!(params.min_samples_leaf, 2);
        assert_eq!(params.max_features, 10);
        assert_eq!(params.seed, 42);
    }

    #[test]
    fn test_model_type_display() {
        assert_eq!(ModelType::RandomForest.to_string(), "Random Forest");
    }
}
