use crate::error::{AppError, Result};
use crate::ml::features::{LabelEncoder, StandardScaler};
use crate::ml::regressor::ForestRegressor;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Locations of the four independently stored artifacts
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub month_encoder: PathBuf,
    pub day_encoder: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside a directory
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join("forestfire_model.bin"),
            scaler: dir.join("scaler.bin"),
            month_encoder: dir.join("month_encoder.bin"),
            day_encoder: dir.join("day_encoder.bin"),
        }
    }

    /// Paths in save order
    pub fn all(&self) -> [&Path; 4] {
        [
            self.model.as_path(),
            self.scaler.as_path(),
            self.month_encoder.as_path(),
            self.day_encoder.as_path(),
        ]
    }

    /// True when every artifact file exists
    pub fn all_exist(&self) -> bool {
        self.all().iter().all(|p| p.is_file())
    }
}

/// Model, scaler and both encoders from one training run.
///
/// Nothing ties the four files together on disk; loading artifacts from different
/// runs goes undetected.
pub struct ArtifactBundle {
    pub model: ForestRegressor,
    pub scaler: StandardScaler,
    pub month_encoder: LabelEncoder,
    pub day_encoder: LabelEncoder,
}

impl ArtifactBundle {
    /// Persist each artifact to its own file
    pub fn save(&self, paths: &ArtifactPaths) -> Result<()> {
        write_artifact(&paths.model, &self.model)?;
        write_artifact(&paths.scaler, &self.scaler)?;
        write_artifact(&paths.month_encoder, &self.month_encoder)?;
        write_artifact(&paths.day_encoder, &self.day_encoder)?;

        info!("Saved model artifacts to {:?}", paths.model.parent());
        Ok(())
    }

    /// Load all four artifacts
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let bundle = Self {
            model: read_artifact(&paths.model)?,
            scaler: read_artifact(&paths.scaler)?,
            month_encoder: read_artifact(&paths.month_encoder)?,
            day_encoder: read_artifact(&paths.day_encoder)?,
        };

        info!(
            "Loaded model artifacts ({} months, {} days)",
            bundle.month_encoder.n_classes(),
            bundle.day_encoder.n_classes()
        );
        Ok(bundle)
    }
}

/// Serialize to a temporary sibling, fsync, then rename over the target
fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = bincode::serialize(value).map_err(|e| {
        AppError::Artifact(format!("Failed to serialize {:?}: {}", path, e))
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;

    debug!("Wrote {} bytes to {:?}", bytes.len(), path);
    Ok(())
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path)
        .map_err(|e| AppError::Artifact(format!("Failed to read {:?}: {}", path, e)))?;

    bincode::deserialize(&bytes).map_err(|e| {
        AppError::Artifact(format!("Failed to deserialize {:?}: {}", path, e))
    })
}
