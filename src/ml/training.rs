use crate::error::{AppError, Result};
use crate::ml::artifacts::{ArtifactBundle, ArtifactPaths};
use crate::ml::dataset::{train_test_indices, FireDataset};
use crate::ml::features::{LabelEncoder, StandardScaler};
use crate::ml::models::{ForestParams, TrainingReport, N_FEATURES, SPLIT_SEED, TEST_SIZE};
use crate::ml::regressor::{r2_score, ForestRegressor, Regressor};
use ndarray::{Array1, Array2, Axis};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Batch training: encode, scale, split, fit, persist
#[derive(Debug, Clone, Default)]
pub struct TrainingPipeline {
    params: ForestParams,
}

impl TrainingPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the forest hyperparameters
    pub fn with_params(mut self, params: ForestParams) -> Self {
        self.params = params;
        self
    }

    /// Train from a CSV file and persist the four artifacts
    pub fn run<P: AsRef<Path>>(&self, dataset_path: P, paths: &ArtifactPaths) -> Result<TrainingReport> {
        let dataset = FireDataset::from_path(dataset_path)?;
        let (bundle, report) = self.fit(&dataset)?;
        bundle.save(paths)?;
        Ok(report)
    }

    /// Fit every artifact on an in-memory dataset
    pub fn fit(&self, dataset: &FireDataset) -> Result<(ArtifactBundle, TrainingReport)> {
        let started = Instant::now();
        let n_samples = dataset.len();
        info!("Training on {} observations", n_samples);

        if let Some(area) = dataset.areas.iter().find(|a| !(**a >= 0.0)) {
            return Err(AppError::Dataset(format!(
                "Burned area must be non-negative, found {}",
                area
            )));
        }

        // 1. Categorical encoders
        let month_encoder =
            LabelEncoder::fit("month", dataset.observations.iter().map(|o| o.month.as_str()))?;
        let day_encoder =
            LabelEncoder::fit("day", dataset.observations.iter().map(|o| o.day.as_str()))?;

        // 2. Feature matrix
        let mut features = Array2::zeros((n_samples, N_FEATURES));
        for (i, obs) in dataset.observations.iter().enumerate() {
            let row = obs.features(
                month_encoder.transform(&obs.month)?,
                day_encoder.transform(&obs.day)?,
            );
            for (j, value) in row.iter().enumerate() {
                features[[i, j]] = *value;
            }
        }

        // 3. Log target
        let targets: Array1<f64> = dataset.areas.iter().map(|a| a.ln_1p()).collect();

        // 4. Scaling
        let scaler = StandardScaler::fit(&features)?;
        let scaled = scaler.transform(&features)?;

        // 5. Split
        let (train_idx, test_idx) = train_test_indices(n_samples, TEST_SIZE, SPLIT_SEED);
        let x_train = scaled.select(Axis(0), &train_idx);
        let y_train = targets.select(Axis(0), &train_idx);
        let x_test = scaled.select(Axis(0), &test_idx);
        let y_test = targets.select(Axis(0), &test_idx);
        debug!(
            "Split into {} training and {} held-out rows",
            train_idx.len(),
            test_idx.len()
        );

        // 6. Forest
        let mut model = ForestRegressor::new(self.params.clone());
        model.fit(&x_train, &y_train)?;

        let r2 = if test_idx.is_empty() {
            0.0
        } else {
            r2_score(&y_test, &model.predict(&x_test)?)
        };

        let report = TrainingReport {
            r2_score: r2,
            n_train: train_idx.len(),
            n_test: test_idx.len(),
            trained_at: chrono::Utc::now(),
        };

        info!(
            r2_score = report.r2_score,
            n_train = report.n_train,
            n_test = report.n_test,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Model trained"
        );

        Ok((
            ArtifactBundle {
                model,
                scaler,
                month_encoder,
                day_encoder,
            },
            report,
        ))
    }
}
