/// HTTP tests for the prediction endpoints
///
/// Every test trains a small model into a temporary directory and drives the router
/// with `oneshot`, so no port is bound.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use common::test_app;
use serde_json::{json, Value};
use tower::ServiceExt;

const SAMPLE_FORM: &str =
    "ffmc=86.2&dmc=26.2&dc=94.3&isi=5.1&temp=8.2&rh=51&wind=6.7&rain=0&month=mar&day=fri&lat=-6.2&lon=106.8";

fn sample_api_body() -> Value {
    json!({
        "FFMC": 86.2, "DMC": 26.2, "DC": 94.3, "ISI": 5.1,
        "temp": 8.2, "RH": 51, "wind": 6.7, "rain": 0.0,
        "month": "mar", "day": "fri",
        "lat": -6.2, "lon": 106.8
    })
}

async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn post_form(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_api_predict_end_to_end() {
    let (app, _model) = test_app();

    let (status, body) = post_json(app, "/api/predict", &sample_api_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["unit"], "hektar");
    assert!(body["predicted_area"].as_f64().unwrap() >= 0.0);
    assert_eq!(body["lat"], -6.2);
    assert_eq!(body["lon"], 106.8);
}

#[tokio::test]
async fn test_api_predict_is_deterministic() {
    let (app, _model) = test_app();

    let (_, first) = post_json(app.clone(), "/api/predict", &sample_api_body()).await;
    let (_, second) = post_json(app, "/api/predict", &sample_api_body()).await;

    assert_eq!(first["predicted_area"], second["predicted_area"]);
}

#[tokio::test]
async fn test_api_missing_fields_use_defaults() {
    let (app, _model) = test_app();

    let (status, body) = post_json(app.clone(), "/api/predict", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["lat"].is_null());
    assert!(body["lon"].is_null());

    // Absent values equal explicit zeros with jan/mon
    let explicit = json!({
        "FFMC": 0, "DMC": 0, "DC": 0, "ISI": 0, "temp": 0, "RH": 0, "wind": 0, "rain": 0,
        "month": "jan", "day": "mon"
    });
    let (_, explicit_body) = post_json(app, "/api/predict", &explicit).await;
    assert_eq!(body["predicted_area"], explicit_body["predicted_area"]);
}

#[tokio::test]
async fn test_api_malformed_number() {
    let (app, _model) = test_app();

    let mut request = sample_api_body();
    request["temp"] = json!("abc");
    let (status, body) = post_json(app, "/api/predict", &request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_api_unknown_month() {
    let (app, _model) = test_app();

    let mut request = sample_api_body();
    request["month"] = json!("xyz");
    let (status, body) = post_json(app, "/api/predict", &request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "ENCODING_ERROR");
    assert!(body["error"].as_str().unwrap().contains("xyz"));
}

#[tokio::test]
async fn test_api_invalid_json() {
    let (app, _model) = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_form_predict_end_to_end() {
    let (app, _model) = test_app();

    let (status, body) = post_form(app, SAMPLE_FORM).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["month"], "Maret");
    assert_eq!(body["day"], "Jumat");
    assert_eq!(body["lat"], -6.2);
    assert_eq!(body["lon"], 106.8);

    let area = body["predicted_area"].as_f64().unwrap();
    assert!(area >= 0.0);

    let (level, color) = (
        body["risk_level"].as_str().unwrap(),
        body["risk_color"].as_str().unwrap(),
    );
    let expected_color = match level {
        "Rendah" => "green",
        "Sedang" => "yellow",
        "Tinggi" => "orange",
        "Sangat Tinggi" => "red",
        other => panic!("unexpected risk level {}", other),
    };
    assert_eq!(color, expected_color);

    let input = &body["input_data"];
    assert_eq!(input["FFMC"], 86.2);
    assert_eq!(input["Suhu"], "8.2°C");
    assert_eq!(input["Kelembaban"], "51.0%");
    assert_eq!(input["Angin"], "6.7 km/h");
    assert_eq!(input["Hujan"], "0.0 mm");
}

#[tokio::test]
async fn test_form_malformed_number_still_200() {
    let (app, _model) = test_app();

    let (status, body) = post_form(app, "temp=abc&month=mar&day=fri").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "Input tidak valid. Harap masukkan angka yang benar."
    );
}

#[tokio::test]
async fn test_form_unknown_day() {
    let (app, _model) = test_app();

    let (status, body) = post_form(app, "month=mar&day=funday").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Terjadi kesalahan: "));
}

#[tokio::test]
async fn test_form_empty_body_uses_defaults() {
    let (app, _model) = test_app();

    let (status, body) = post_form(app, "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["month"], "Januari");
    assert_eq!(body["day"], "Senin");
    assert!(body["lat"].is_null());
}

#[tokio::test]
async fn test_index_page() {
    let (app, _model) = test_app();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("<form"));
    assert!(html.contains("Desember"));
}

#[tokio::test]
async fn test_health_reports_model() {
    let (app, _model) = test_app();

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model"]["is_trained"], true);
    assert_eq!(body["model"]["n_features"], 10);
    assert_eq!(body["model"]["months"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_metrics_count_predictions() {
    forestfire_predictor::metrics::init_metrics().unwrap();
    let (app, _model) = test_app();

    post_json(app.clone(), "/api/predict", &sample_api_body()).await;

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("forestfire_predictor_predictions_total"));
    assert!(text.contains("endpoint=\"api\""));
}
