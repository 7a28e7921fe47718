use crate::error::{AppError, Result};
use crate::ml::models::{ForestParams, ModelType};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

/// Trait for regressors
pub trait Regressor: Send + Sync {
    /// Fit on scaled features against log-space targets
    fn fit(&mut self, features: &Array2<f64>, targets: &Array1<f64>) -> Result<()>;

    /// Predict log-space targets
    fn predict(&self, features: &Array2<f64>) -> Result<Array1<f64>>;

    /// Get model type
    fn model_type(&self) -> ModelType;

    /// Check if model is trained
    fn is_trained(&self) -> bool;
}

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest regressor backed by smartcore
#[derive(Serialize, Deserialize)]
pub struct ForestRegressor {
    /// Hyperparameters the forest was (or will be) fitted with
    params: ForestParams,

    /// Fitted forest
    model: Option<Forest>,

    /// Number of features seen during fit
    n_features: usize,
}

impl ForestRegressor {
    pub fn new(params: ForestParams) -> Self {
        Self {
            params,
            model: None,
            n_features: 0,
        }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    fn ndarray_to_densematrix(arr: &Array2<f64>) -> DenseMatrix<f64> {
        let shape = arr.shape();
        let data: Vec<f64> = arr.iter().copied().collect();
        DenseMatrix::new(shape[0], shape[1], data, false)
    }

    fn smartcore_params(&self) -> RandomForestRegressorParameters {
        RandomForestRegressorParameters::default()
            .with_n_trees(self.params.n_trees)
            .with_max_depth(self.params.max_depth)
            .with_min_samples_split(self.params.min_samples_split)
            .with_min_samples_leaf(self.params.min_samples_leaf)
            .with_m(self.params.max_features)
            .with_seed(self.params.seed)
    }
}

impl Regressor for ForestRegressor {
    fn fit(&mut self, features: &Array2<f64>, targets: &Array1<f64>) -> Result<()> {
        if features.nrows() != targets.len() {
            return Err(AppError::Model(format!(
                "Feature rows ({}) and targets ({}) differ in length",
                features.nrows(),
                targets.len()
            )));
        }
        if features.nrows() == 0 {
            return Err(AppError::Model("Cannot fit on zero rows".to_string()));
        }

        let x = Self::ndarray_to_densematrix(features);
        let y: Vec<f64> = targets.to_vec();

        let model = RandomForestRegressor::fit(&x, &y, self.smartcore_params())
            .map_err(|e| AppError::Model(format!("Failed to train random forest: {}", e)))?;

        self.model = Some(model);
        self.n_features = features.ncols();

        Ok(())
    }

    fn predict(&self, features: &Array2<f64>) -> Result<Array1<f64>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| AppError::Model("Model not trained".to_string()))?;

        if features.ncols() != self.n_features {
            return Err(AppError::Model(format!(
                "Model was fitted on {} features but received {}",
                self.n_features,
                features.ncols()
            )));
        }

        let x = Self::ndarray_to_densematrix(features);
        let predictions = model
            .predict(&x)
            .map_err(|e| AppError::Model(format!("Prediction failed: {}", e)))?;

        Ok(Array1::from_vec(predictions))
    }

    fn model_type(&self) -> ModelType {
        ModelType::RandomForest
    }

    fn is_trained(&self) -> bool {
        self.model.is_some()
    }
}

/// Coefficient of determination.
///
/// A constant target scores 1.0 when predicted exactly and 0.0 otherwise.
pub fn r2_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let n = y_true.len();
    if n == 0 || n != y_pred.len() {
        return 0.0;
    }

    let mean = y_true.sum() / n as f64;
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }

    1.0 - ss_res / ss_tot
}
