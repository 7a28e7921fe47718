/// Prometheus metrics for the prediction service.
///
/// Tracks:
/// - Prediction requests per endpoint and outcome
/// - Prediction latency
/// - Predicted risk levels
/// - Fail-soft fallbacks inside the model call
/// - Bootstrap training score and model load state
///
/// # Example
/// ```no_run
/// use forestfire_predictor::metrics::PREDICTIONS_TOTAL;
///
/// PREDICTIONS_TOTAL
///     .with_label_values(&["api", "success"])
///     .inc();
/// ```

use lazy_static::lazy_static;
use prometheus::{
    core::Collector, Counter, CounterVec, Gauge, GaugeVec, HistogramOpts, HistogramVec, Opts,
    Registry,
};

const NAMESPACE: &str = "forestfire_predictor";

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Total prediction requests
    ///
    /// Labels: endpoint (form, api), outcome (success, validation_error, encoding_error, error)
    pub static ref PREDICTIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("predictions_total", "Total number of prediction requests")
            .namespace(NAMESPACE),
        &["endpoint", "outcome"]
    ).expect("Failed to create PREDICTIONS_TOTAL metric");

    /// Prediction latency in seconds
    ///
    /// Labels: endpoint
    pub static ref PREDICTION_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "prediction_duration_seconds",
            "Time spent parsing, encoding and predicting one request"
        )
        .namespace(NAMESPACE)
        .buckets(vec![0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1]),
        &["endpoint"]
    ).expect("Failed to create PREDICTION_DURATION_SECONDS metric");

    /// Predictions by risk level
    ///
    /// Labels: risk_level
    pub static ref PREDICTED_RISK_TOTAL: CounterVec = CounterVec::new(
        Opts::new("predicted_risk_total", "Predictions per risk level")
            .namespace(NAMESPACE),
        &["risk_level"]
    ).expect("Failed to create PREDICTED_RISK_TOTAL metric");

    /// Model calls that failed and were reported as zero area
    pub static ref MODEL_FALLBACKS_TOTAL: Counter = Counter::with_opts(
        Opts::new("model_fallbacks_total", "Model calls degraded to a zero prediction")
            .namespace(NAMESPACE)
    ).expect("Failed to create MODEL_FALLBACKS_TOTAL metric");

    /// R² on the held-out partition of the last startup training run
    pub static ref TRAINING_R2_SCORE: Gauge = Gauge::with_opts(
        Opts::new("training_r2_score", "Held-out R² of the bootstrap training run")
            .namespace(NAMESPACE)
    ).expect("Failed to create TRAINING_R2_SCORE metric");

    /// 1 once the artifact bundle is loaded
    pub static ref MODEL_LOADED: Gauge = Gauge::with_opts(
        Opts::new("model_loaded", "Whether the artifact bundle is loaded")
            .namespace(NAMESPACE)
    ).expect("Failed to create MODEL_LOADED metric");

    /// Build information
    ///
    /// Labels: version
    pub static ref BUILD_INFO: GaugeVec = GaugeVec::new(
        Opts::new("build_info", "Build information").namespace(NAMESPACE),
        &["version"]
    ).expect("Failed to create BUILD_INFO metric");
}

fn register<C: Collector + Clone + 'static>(collector: &C) -> Result<(), prometheus::Error> {
    match PROMETHEUS_REGISTRY.register(Box::new(collector.clone())) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    register(&*PREDICTIONS_TOTAL)?;
    register(&*PREDICTION_DURATION_SECONDS)?;
    register(&*PREDICTED_RISK_TOTAL)?;
    register(&*MODEL_FALLBACKS_TOTAL)?;
    register(&*TRAINING_R2_SCORE)?;
    register(&*MODEL_LOADED)?;
    register(&*BUILD_INFO)?;

    BUILD_INFO
        .with_label_values(&[env!("CARGO_PKG_VERSION")])
        .set(1.0);

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

/// Generate Prometheus text format metrics
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}
