use anyhow::Context;
use clap::{Parser, Subcommand};
use forestfire_predictor::{
    config::Config,
    ml::{ArtifactPaths, FirePredictor, Observation, TrainingPipeline},
};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "forestfire-cli")]
#[command(about = "Forest fire burned-area predictor CLI", long_about = None)]
struct Cli {
    /// Directory holding the model artifacts (defaults to the configured one)
    #[arg(short, long, global = true)]
    artifact_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the model and write the artifact bundle
    Train {
        /// Labeled CSV dataset (defaults to the configured one)
        #[arg(short, long)]
        dataset: Option<PathBuf>,
    },

    /// Predict the burned area for one observation
    Predict {
        #[arg(long, default_value_t = 0.0)]
        ffmc: f64,

        #[arg(long, default_value_t = 0.0)]
        dmc: f64,

        #[arg(long, default_value_t = 0.0)]
        dc: f64,

        #[arg(long, default_value_t = 0.0)]
        isi: f64,

        /// Temperature in °C
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        temp: f64,

        /// Relative humidity in %
        #[arg(long, default_value_t = 0.0)]
        rh: f64,

        /// Wind speed in km/h
        #[arg(long, default_value_t = 0.0)]
        wind: f64,

        /// Rain in mm
        #[arg(long, default_value_t = 0.0)]
        rain: f64,

        #[arg(long, default_value = "jan")]
        month: String,

        #[arg(long, default_value = "mon")]
        day: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forestfire_predictor=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load().unwrap_or_default();
    if let Some(dir) = cli.artifact_dir {
        config.model.artifact_dir = dir;
    }
    let paths: ArtifactPaths = config.model.artifact_paths();

    match cli.command {
        Commands::Train { dataset } => {
            let dataset = dataset.unwrap_or(config.model.dataset_path);
            let report = TrainingPipeline::new()
                .run(&dataset, &paths)
                .with_context(|| format!("training from {:?} failed", dataset))?;

            println!("Model training selesai! R² Score: {:.4}", report.r2_score);
            println!(
                "Train samples: {}, test samples: {}",
                report.n_train, report.n_test
            );
        }

        Commands::Predict {
            ffmc,
            dmc,
            dc,
            isi,
            temp,
            rh,
            wind,
            rain,
            month,
            day,
        } => {
            let predictor = FirePredictor::load(&paths)
                .context("model artifacts not found, run `forestfire-cli train` first")?;

            let observation = Observation {
                ffmc,
                dmc,
                dc,
                isi,
                temp,
                rh,
                wind,
                rain,
                month,
                day,
            };
            let prediction = predictor.predict(&observation)?;

            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "predicted_area": prediction.predicted_area,
                    "unit": forestfire_predictor::locale::AREA_UNIT,
                    "risk_level": prediction.risk_level.to_string(),
                    "risk_color": prediction.risk_level.color(),
                }))?
            );
        }
    }

    Ok(())
}
