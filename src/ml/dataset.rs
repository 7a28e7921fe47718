use crate::error::{AppError, Result};
use crate::ml::models::Observation;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Columns a training CSV must carry
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "FFMC", "DMC", "DC", "ISI", "temp", "RH", "wind", "rain", "month", "day", "area",
];

#[derive(Debug, Deserialize)]
struct FireRecord {
    #[serde(rename = "FFMC")]
    ffmc: f64,
    #[serde(rename = "DMC")]
    dmc: f64,
    #[serde(rename = "DC")]
    dc: f64,
    #[serde(rename = "ISI")]
    isi: f64,
    temp: f64,
    #[serde(rename = "RH")]
    rh: f64,
    wind: f64,
    rain: f64,
    month: String,
    day: String,
    area: f64,
}

/// Labeled observations with their burned area (ha)
#[derive(Debug, Clone, Default)]
pub struct FireDataset {
    pub observations: Vec<Observation>,
    pub areas: Vec<f64>,
}

impl FireDataset {
    /// Read a CSV file with a header row
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            AppError::Dataset(format!("Failed to open dataset {:?}: {}", path, e))
        })?;

        let dataset = Self::from_reader(file)?;
        info!(
            "Loaded {} observations from {:?}",
            dataset.len(),
            path
        );
        Ok(dataset)
    }

    /// Read CSV data from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(AppError::Dataset(format!(
                    "Missing required column '{}'",
                    column
                )));
            }
        }

        let mut dataset = FireDataset::default();
        for (line, record) in csv_reader.deserialize::<FireRecord>().enumerate() {
            // Header is line 1
            let record = record.map_err(|e| {
                AppError::Dataset(format!("Invalid row at line {}: {}", line + 2, e))
            })?;

            dataset.areas.push(record.area);
            dataset.observations.push(Observation {
                ffmc: record.ffmc,
                dmc: record.dmc,
                dc: record.dc,
                isi: record.isi,
                temp: record.temp,
                rh: record.rh,
                wind: record.wind,
                rain: record.rain,
                month: record.month,
                day: record.day,
            });
        }

        if dataset.is_empty() {
            return Err(AppError::Dataset("Dataset contains no rows".to_string()));
        }

        debug!("Parsed {} dataset rows", dataset.len());
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Shuffled train/test index split.
///
/// The test partition holds `ceil(n * test_size)` rows; the shuffle is seeded so the
/// split, and therefore the reported score, is reproducible.
pub fn train_test_indices(n_samples: usize, test_size: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let n_test = ((n_samples as f64) * test_size).ceil() as usize;
    let n_test = n_test.min(n_samples);

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test = indices[..n_test].to_vec();
    let train = indices[n_test..].to_vec();
    (train, test)
}
