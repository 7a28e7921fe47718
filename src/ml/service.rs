use crate::error::{AppError, Result};
use crate::ml::artifacts::{ArtifactBundle, ArtifactPaths};
use crate::ml::features::{LabelEncoder, StandardScaler};
use crate::ml::models::{ModelType, Observation, TrainingReport, N_FEATURES};
use crate::ml::regressor::Regressor;
use crate::ml::risk::RiskLevel;
use crate::ml::training::TrainingPipeline;
use ndarray::{aview1, Axis};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Area estimate for one observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaPrediction {
    /// Burned area in hectares, rounded to 2 decimals
    pub predicted_area: f64,

    /// Risk bucket of the unrounded area
    pub risk_level: RiskLevel,
}

/// Read-only inference over a trained artifact bundle.
///
/// Built once at startup and shared behind an `Arc`; nothing here is mutated after
/// construction.
pub struct FirePredictor {
    regressor: Box<dyn Regressor>,
    scaler: StandardScaler,
    month_encoder: LabelEncoder,
    day_encoder: LabelEncoder,
}

impl FirePredictor {
    pub fn new(
        regressor: Box<dyn Regressor>,
        scaler: StandardScaler,
        month_encoder: LabelEncoder,
        day_encoder: LabelEncoder,
    ) -> Self {
        Self {
            regressor,
            scaler,
            month_encoder,
            day_encoder,
        }
    }

    pub fn from_bundle(bundle: ArtifactBundle) -> Self {
        Self::new(
            Box::new(bundle.model),
            bundle.scaler,
            bundle.month_encoder,
            bundle.day_encoder,
        )
    }

    /// Load a previously trained bundle
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let bundle = ArtifactBundle::load(paths)?;
        if !bundle.model.is_trained() {
            return Err(AppError::Artifact(format!(
                "Model in {:?} has not been fitted",
                paths.model
            )));
        }
        Ok(Self::from_bundle(bundle))
    }

    /// Load the bundle, training it first if it cannot be loaded.
    ///
    /// Runs once at startup. Returns the training report when training happened.
    pub fn bootstrap(
        dataset_path: &Path,
        paths: &ArtifactPaths,
    ) -> Result<(Self, Option<TrainingReport>)> {
        match Self::load(paths) {
            Ok(predictor) => return Ok((predictor, None)),
            Err(e) => warn!(
                "Model artifacts unavailable ({}), training from {:?}",
                e, dataset_path
            ),
        }

        let report = TrainingPipeline::new().run(dataset_path, paths)?;
        info!(
            "Model trained successfully with R² score: {:.4}",
            report.r2_score
        );

        let predictor = Self::load(paths)?;
        Ok((predictor, Some(report)))
    }

    /// Encode the categorical fields and assemble the feature row
    pub fn encode(&self, observation: &Observation) -> Result<[f64; N_FEATURES]> {
        let month_code = self.month_encoder.transform(&observation.month)?;
        let day_code = self.day_encoder.transform(&observation.day)?;
        Ok(observation.features(month_code, day_code))
    }

    /// Estimate the burned area and its risk bucket.
    ///
    /// Fails only on unknown month/day values. Failures inside scaling or the model
    /// call degrade to an area of 0.
    pub fn predict(&self, observation: &Observation) -> Result<AreaPrediction> {
        let features = self.encode(observation)?;
        let area = self.predict_area(&features);

        let prediction = AreaPrediction {
            predicted_area: round_to_cents(area),
            risk_level: RiskLevel::from_area(area),
        };
        debug!(
            month = %observation.month,
            day = %observation.day,
            predicted_area = prediction.predicted_area,
            risk_level = %prediction.risk_level,
            "Prediction computed"
        );

        Ok(prediction)
    }

    /// Scaled model prediction in hectares, clamped at zero
    pub fn predict_area(&self, features: &[f64; N_FEATURES]) -> f64 {
        match self.try_predict_area(features) {
            Ok(area) => area,
            Err(e) => {
                warn!("Error in prediction, falling back to 0: {}", e);
                crate::metrics::MODEL_FALLBACKS_TOTAL.inc();
                0.0
            }
        }
    }

    fn try_predict_area(&self, features: &[f64; N_FEATURES]) -> Result<f64> {
        let scaled = self.scaler.transform_row(aview1(features))?;
        let batch = scaled.insert_axis(Axis(0));

        let log_area = self
            .regressor
            .predict(&batch)?
            .get(0)
            .copied()
            .ok_or_else(|| AppError::Model("Model returned no prediction".to_string()))?;

        // NaN collapses to 0 through f64::max
        Ok(log_area.exp_m1().max(0.0))
    }

    pub fn month_encoder(&self) -> &LabelEncoder {
        &self.month_encoder
    }

    pub fn day_encoder(&self) -> &LabelEncoder {
        &self.day_encoder
    }

    /// Summary for health reporting
    pub fn stats(&self) -> PredictorStats {
        PredictorStats {
            model_type: self.regressor.model_type(),
            is_trained: self.regressor.is_trained(),
            n_features: self.scaler.n_features(),
            months: self.month_encoder.classes().to_vec(),
            days: self.day_encoder.classes().to_vec(),
        }
    }
}

/// Loaded model summary
#[derive(Debug, Clone, Serialize)]
pub struct PredictorStats {
    pub model_type: ModelType,
    pub is_trained: bool,
    pub n_features: usize,
    pub months: Vec<String>,
    pub days: Vec<String>,
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
