use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ml::ArtifactPaths;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Model artifact and dataset locations
    pub model: ModelConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: FOREST_FIRE)
            .add_source(
                config::Environment::with_prefix("FOREST_FIRE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            model: ModelConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Directory holding the four trained artifacts
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,

    /// Labeled CSV used when the bundle has to be trained at startup
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    #[serde(default = "default_model_file")]
    pub model_file: String,

    #[serde(default = "default_scaler_file")]
    pub scaler_file: String,

    #[serde(default = "default_month_encoder_file")]
    pub month_encoder_file: String,

    #[serde(default = "default_day_encoder_file")]
    pub day_encoder_file: String,
}

impl ModelConfig {
    /// Resolve the on-disk location of every artifact
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: self.artifact_dir.join(&self.model_file),
            scaler: self.artifact_dir.join(&self.scaler_file),
            month_encoder: self.artifact_dir.join(&self.month_encoder_file),
            day_encoder: self.artifact_dir.join(&self.day_encoder_file),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_dir: default_artifact_dir(),
            dataset_path: default_dataset_path(),
            model_file: default_model_file(),
            scaler_file: default_scaler_file(),
            month_encoder_file: default_month_encoder_file(),
            day_encoder_file: default_day_encoder_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub prometheus_enabled: bool,

    /// Service name
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            prometheus_enabled: true,
            service_name: default_service_name(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("forestfires.csv")
}

fn default_model_file() -> String {
    "forestfire_model.bin".to_string()
}

fn default_scaler_file() -> String {
    "scaler.bin".to_string()
}

fn default_month_encoder_file() -> String {
    "month_encoder.bin".to_string()
}

fn default_day_encoder_file() -> String {
    "day_encoder.bin".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "forestfire-predictor".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        assert_eq!(default_port(), 5000);
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_model_file(), "forestfire_model.bin");
        assert!(default_true());
    }

    #[test]
    fn test_embedded_defaults_parse() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.model.dataset_path, PathBuf::from("forestfires.csv"));
        assert!(config.observability.prometheus_enabled);
    }

    #[test]
    fn test_artifact_paths_join_directory() {
        let model = ModelConfig {
            artifact_dir: PathBuf::from("/var/lib/forestfire"),
            ..ModelConfig::default()
        };

        let paths = model.artifact_paths();
        assert_eq!(
            paths.model,
            PathBuf::from("/var/lib/forestfire/forestfire_model.bin")
        );
        assert_eq!(
            paths.day_encoder,
            PathBuf::from("/var/lib/forestfire/day_encoder.bin")
        );
    }
}
