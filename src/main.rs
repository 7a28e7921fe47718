use forestfire_predictor::{
    api::{build_router, AppState},
    config::Config,
    metrics::{MODEL_LOADED, TRAINING_R2_SCORE},
    ml::FirePredictor,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "forestfire_predictor={},tower_http=info",
            config.observability.log_level
        )
        .into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        "Starting {} v{}",
        config.observability.service_name,
        env!("CARGO_PKG_VERSION")
    );

    // Initialize Prometheus metrics
    if config.observability.prometheus_enabled {
        if let Err(e) = forestfire_predictor::metrics::init_metrics() {
            tracing::warn!("Failed to initialize metrics: {}", e);
            tracing::warn!("Continuing without metrics");
        }
    } else {
        tracing::info!("Prometheus metrics disabled in configuration");
    }

    // Load the model, training it first if the artifacts are missing
    let paths = config.model.artifact_paths();
    let dataset_path = config.model.dataset_path.clone();
    tracing::info!("Loading model artifacts from {:?}", config.model.artifact_dir);

    let (predictor, report) =
        tokio::task::spawn_blocking(move || FirePredictor::bootstrap(&dataset_path, &paths))
            .await?
            .map_err(|e| {
                tracing::error!("Model bootstrap failed: {}", e);
                e
            })?;

    match report {
        Some(report) => {
            TRAINING_R2_SCORE.set(report.r2_score);
            tracing::info!(
                r2_score = report.r2_score,
                n_train = report.n_train,
                n_test = report.n_test,
                "Model trained at startup"
            );
        }
        None => tracing::info!("Model artifacts loaded"),
    }
    MODEL_LOADED.set(1.0);

    let app = build_router(AppState::new(Arc::new(predictor)));

    // Start HTTP server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("HTTP server listening on http://{}", addr);
    tracing::info!("   Prediction form: http://{}/", addr);
    tracing::info!("   JSON API: http://{}/api/predict", addr);
    tracing::info!("   Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
