use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::locale::{self, AREA_UNIT, DAY_NAMES, MONTH_NAMES};
use crate::metrics::{PREDICTED_RISK_TOTAL, PREDICTIONS_TOTAL, PREDICTION_DURATION_SECONDS};
use crate::ml::{AreaPrediction, PredictionInput, PredictorStats, RiskLevel};
use axum::{
    body::Bytes,
    extract::{Form, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;

const ENDPOINT_FORM: &str = "form";
const ENDPOINT_API: &str = "api";

const INDEX_TEMPLATE: &str = include_str!("index.html");

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.predictor.stats(),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: PredictorStats,
}

/// Prediction form page
pub async fn index() -> Html<String> {
    Html(render_index())
}

fn render_index() -> String {
    fn options(table: &[(&str, &str)]) -> String {
        table
            .iter()
            .map(|(code, name)| format!("<option value=\"{}\">{}</option>", code, name))
            .collect::<Vec<_>>()
            .join("\n              ")
    }

    INDEX_TEMPLATE
        .replace("{{MONTH_OPTIONS}}", &options(&MONTH_NAMES))
        .replace("{{DAY_OPTIONS}}", &options(&DAY_NAMES))
}

/// Form prediction.
///
/// Always answers 200; failures are reported through `success: false` and a
/// user-facing message.
pub async fn predict_form(
    State(state): State<AppState>,
    form: Option<Form<HashMap<String, String>>>,
) -> Response {
    let started = Instant::now();
    let fields = form.map(|Form(fields)| fields).unwrap_or_default();

    let result = PredictionInput::from_form(&fields).and_then(|input| {
        let prediction = state.predictor.predict(&input.observation)?;
        Ok(FormPredictionResponse::new(&input, &prediction))
    });
    record_outcome(ENDPOINT_FORM, started, result.as_ref().map(|r| r.risk));

    match result {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            tracing::debug!(error = %e, "Form prediction failed");
            Json(ErrorResponse::new(e.user_message())).into_response()
        }
    }
}

/// JSON API prediction
pub async fn predict_api(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiPredictionResponse>> {
    let started = Instant::now();

    let result = api_prediction(&state, &body);
    record_outcome(ENDPOINT_API, started, result.as_ref().map(|(_, risk)| *risk));

    result.map(|(response, _)| Json(response))
}

fn api_prediction(state: &AppState, body: &[u8]) -> Result<(ApiPredictionResponse, RiskLevel)> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid JSON body: {}", e)))?;

    let input = PredictionInput::from_json(&value)?;
    let prediction = state.predictor.predict(&input.observation)?;

    Ok((
        ApiPredictionResponse {
            success: true,
            predicted_area: prediction.predicted_area,
            unit: AREA_UNIT,
            lat: input.lat,
            lon: input.lon,
        },
        prediction.risk_level,
    ))
}

fn record_outcome(endpoint: &str, started: Instant, result: std::result::Result<RiskLevel, &AppError>) {
    let outcome = match result {
        Ok(risk) => {
            PREDICTED_RISK_TOTAL
                .with_label_values(&[risk.metric_label()])
                .inc();
            "success"
        }
        Err(AppError::Validation(_)) => "validation_error",
        Err(AppError::Encoding { .. }) => "encoding_error",
        Err(_) => "error",
    };

    PREDICTIONS_TOTAL
        .with_label_values(&[endpoint, outcome])
        .inc();
    PREDICTION_DURATION_SECONDS
        .with_label_values(&[endpoint])
        .observe(started.elapsed().as_secs_f64());
}

/// Form prediction response
#[derive(Debug, Serialize)]
pub struct FormPredictionResponse {
    pub success: bool,
    pub predicted_area: f64,
    pub risk_level: String,
    pub risk_color: &'static str,
    /// Localized month name
    pub month: String,
    /// Localized day name
    pub day: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub input_data: InputDisplay,
    #[serde(skip)]
    risk: RiskLevel,
}

impl FormPredictionResponse {
    fn new(input: &PredictionInput, prediction: &AreaPrediction) -> Self {
        let obs = &input.observation;
        Self {
            success: true,
            predicted_area: prediction.predicted_area,
            risk_level: prediction.risk_level.to_string(),
            risk_color: prediction.risk_level.color(),
            month: locale::month_name(&obs.month).to_string(),
            day: locale::day_name(&obs.day).to_string(),
            lat: input.lat,
            lon: input.lon,
            input_data: InputDisplay {
                ffmc: obs.ffmc,
                dmc: obs.dmc,
                dc: obs.dc,
                isi: obs.isi,
                temp: format!("{}°C", display_number(obs.temp)),
                rh: format!("{}%", display_number(obs.rh)),
                wind: format!("{} km/h", display_number(obs.wind)),
                rain: format!("{} mm", display_number(obs.rain)),
            },
            risk: prediction.risk_level,
        }
    }
}

/// Echo of the submitted values, formatted for display
#[derive(Debug, Serialize)]
pub struct InputDisplay {
    #[serde(rename = "FFMC")]
    pub ffmc: f64,
    #[serde(rename = "DMC")]
    pub dmc: f64,
    #[serde(rename = "DC")]
    pub dc: f64,
    #[serde(rename = "ISI")]
    pub isi: f64,
    #[serde(rename = "Suhu")]
    pub temp: String,
    #[serde(rename = "Kelembaban")]
    pub rh: String,
    #[serde(rename = "Angin")]
    pub wind: String,
    #[serde(rename = "Hujan")]
    pub rain: String,
}

/// Whole numbers keep one decimal ("51.0"), others print as-is ("8.2")
fn display_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// JSON API prediction response
#[derive(Debug, Serialize)]
pub struct ApiPredictionResponse {
    pub success: bool,
    pub predicted_area: f64,
    pub unit: &'static str,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: String) -> Self {
        Self {
            success: false,
            error,
        }
    }
}

/// Prometheus metrics endpoint
///
/// Returns metrics in Prometheus text exposition format
pub async fn metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        crate::metrics::gather_metrics(),
    )
}
