use crate::error::{AppError, Result};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Label encoder for one categorical column.
///
/// Codes are the positions of the distinct training values in lexicographic order, so
/// the mapping is reproducible from the training data alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    /// Column this encoder was fitted on, used in error messages
    field: String,

    /// Sorted vocabulary; index is the code
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit an encoder on every value observed in a column
    pub fn fit<I, S>(field: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let vocabulary: BTreeSet<String> = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect();

        if vocabulary.is_empty() {
            return Err(AppError::Dataset(format!(
                "Cannot fit encoder for '{}' on an empty column",
                field
            )));
        }

        Ok(Self {
            field: field.to_string(),
            classes: vocabulary.into_iter().collect(),
        })
    }

    /// Encode a value seen during training
    pub fn transform(&self, value: &str) -> Result<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .map_err(|_| AppError::Encoding {
                field: self.field.clone(),
                value: value.to_string(),
            })
    }

    /// Encode a whole column
    pub fn transform_all<S: AsRef<str>>(&self, values: &[S]) -> Result<Vec<usize>> {
        values.iter().map(|v| self.transform(v.as_ref())).collect()
    }

    /// Decode a code back into its category string
    pub fn inverse_transform(&self, code: usize) -> Result<&str> {
        self.classes.get(code).map(String::as_str).ok_or_else(|| {
            AppError::Validation(format!(
                "Code {} is out of range for '{}' ({} classes)",
                code,
                self.field,
                self.classes.len()
            ))
        })
    }

    /// Vocabulary in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}

/// Standardizes features to zero mean and unit variance.
///
/// Uses the population variance. Constant columns keep a scale of 1 so they map to
/// zero instead of NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Learn per-column mean and scale
    pub fn fit(features: &Array2<f64>) -> Result<Self> {
        if features.nrows() == 0 {
            return Err(AppError::Model(
                "Cannot fit scaler on an empty feature matrix".to_string(),
            ));
        }

        let mean = features
            .mean_axis(Axis(0))
            .ok_or_else(|| AppError::Model("Failed to compute feature means".to_string()))?;

        let scale = features
            .var_axis(Axis(0), 0.0)
            .mapv(|variance| {
                let std = variance.sqrt();
                if std > f64::EPSILON {
                    std
                } else {
                    1.0
                }
            });

        Ok(Self { mean, scale })
    }

    /// Scale a feature matrix with the fitted statistics
    pub fn transform(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(features.ncols())?;
        Ok((features - &self.mean) / &self.scale)
    }

    /// Scale a single feature row
    pub fn transform_row(&self, row: ArrayView1<f64>) -> Result<Array1<f64>> {
        self.check_width(row.len())?;
        Ok((&row - &self.mean) / &self.scale)
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn check_width(&self, width: usize) -> Result<()> {
        if width != self.mean.len() {
            return Err(AppError::Model(format!(
                "Scaler was fitted on {} features but received {}",
                self.mean.len(),
                width
            )));
        }
        Ok(())
    }
}
