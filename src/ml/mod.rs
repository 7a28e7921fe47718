/// Machine learning module for burned-area estimation
///
/// This module provides:
/// - CSV dataset loading and seeded train/test splitting
/// - Label encoding of month/day and standard scaling of all features
/// - A random forest regressor fitted on log1p(area)
/// - Artifact persistence (model, scaler, two encoders)
/// - Inference with risk bucketing and a fail-soft model call

pub mod artifacts;
pub mod dataset;
pub mod features;
pub mod input;
pub mod models;
pub mod regressor;
pub mod risk;
pub mod service;
pub mod training;

pub use artifacts::{ArtifactBundle, ArtifactPaths};
pub use dataset::{train_test_indices, FireDataset, REQUIRED_COLUMNS};
pub use features::{LabelEncoder, StandardScaler};
pub use input::{FieldSource, PredictionInput, API_FIELDS, FORM_FIELDS};
pub use models::{
    ForestParams, ModelType, Observation, TrainingReport, FEATURE_NAMES, N_FEATURES,
};
pub use regressor::{r2_score, ForestRegressor, Regressor};
pub use risk::RiskLevel;
pub use service::{AreaPrediction, FirePredictor, PredictorStats};
pub use training::TrainingPipeline;
