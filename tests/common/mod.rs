//! Common test utilities
//!
//! Builds a deterministic synthetic fire dataset and a small trained model so the
//! integration tests never depend on a real CSV on disk.

#![allow(dead_code)]

use forestfire_predictor::{
    api::{build_router, AppState},
    ml::{ArtifactPaths, FirePredictor, ForestParams, TrainingPipeline, TrainingReport},
};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

pub const DAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

pub const HEADER: &str = "X,Y,month,day,FFMC,DMC,DC,ISI,temp,RH,wind,rain,area";

/// Synthetic rows in the column layout of the public forest fires dataset.
///
/// Hot, dry, windy rows burn more; roughly half of the rows burn nothing.
pub fn synthetic_csv(rows: usize) -> String {
    let mut csv = String::from(HEADER);
    csv.push('\n');

    for i in 0..rows {
        let month = MONTHS[i % MONTHS.len()];
        let day = DAYS[(i / 3) % DAYS.len()];
        let step = (i % 17) as f64;

        let ffmc = 80.0 + (i % 15) as f64;
        let dmc = 20.0 + step * 9.5;
        let dc = 90.0 + (i % 23) as f64 * 30.0;
        let isi = 2.0 + (i % 11) as f64 * 1.3;
        let temp = 5.0 + (i % 13) as f64 * 2.2;
        let rh = 20.0 + (i % 9) as f64 * 8.0;
        let wind = 0.9 + (i % 7) as f64 * 1.1;
        let rain = if i % 19 == 0 { 0.8 } else { 0.0 };

        let dryness = temp * wind / rh;
        let area = if dryness < 1.0 {
            0.0
        } else {
            ((dryness - 1.0) * 12.0 + isi).round()
        };

        writeln!(
            csv,
            "{},{},{},{},{:.1},{:.1},{:.1},{:.1},{:.1},{:.0},{:.1},{:.1},{:.2}",
            1 + i % 9,
            2 + i % 7,
            month,
            day,
            ffmc,
            dmc,
            dc,
            isi,
            temp,
            rh,
            wind,
            rain,
            area
        )
        .unwrap();
    }

    csv
}

/// Write the synthetic dataset into `dir` and return its path
pub fn write_dataset(dir: &Path, rows: usize) -> PathBuf {
    let path = dir.join("forestfires.csv");
    std::fs::write(&path, synthetic_csv(rows)).unwrap();
    path
}

/// Smaller forest so tests stay fast
pub fn test_params() -> ForestParams {
    ForestParams {
        n_trees: 20,
        ..ForestParams::default()
    }
}

/// A trained artifact bundle inside a temporary directory
pub struct TrainedModel {
    pub dir: TempDir,
    pub dataset: PathBuf,
    pub paths: ArtifactPaths,
    pub report: TrainingReport,
}

pub fn train_model(rows: usize) -> TrainedModel {
    let dir = TempDir::new().unwrap();
    let dataset = write_dataset(dir.path(), rows);
    let paths = ArtifactPaths::in_dir(dir.path().join("artifacts"));

    let report = TrainingPipeline::new()
        .with_params(test_params())
        .run(&dataset, &paths)
        .unwrap();

    TrainedModel {
        dir,
        dataset,
        paths,
        report,
    }
}

/// Router over a freshly trained model; the TempDir must outlive the router
pub fn test_app() -> (axum::Router, TrainedModel) {
    let model = train_model(240);
    let predictor = FirePredictor::load(&model.paths).unwrap();
    let app = build_router(AppState::new(Arc::new(predictor)));
    (app, model)
}
