mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use credit_scoring::api;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

async fn app() -> axum::Router {
    api::router(Arc::new(common::scorer().await))
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_predict(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn test_root_reports_liveness() {
    let (status, body) = send(app().await, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Credit Scoring API is running!");
}

#[tokio::test]
async fn test_model_info_lists_expected_columns() {
    let (status, body) = send(
        app().await,
        Request::get("/model-info").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_type"], "LogisticRegression");
    assert_eq!(body["message"], "Model is loaded and ready");
    let columns = body["expected_columns"].as_array().unwrap();
    assert_eq!(columns.len(), 13);
    assert_eq!(columns[0], "age");
    assert_eq!(columns[12], "repayment_frequency");
}

#[tokio::test]
async fn test_predict_well_formed_payloads() {
    for (payload, expected) in [
        (common::low_risk_applicant(), 0),
        (common::high_risk_applicant(), 1),
    ] {
        let (status, body) = send(app().await, post_predict(payload.to_string())).await;
        assert_eq!(status, StatusCode::OK);

        let prediction = body["prediction"].as_u64().unwrap();
        assert_eq!(prediction, expected);
        let good = body["probability_good"].as_f64().unwrap();
        let bad = body["probability_bad"].as_f64().unwrap();
        assert!((good + bad - 1.0).abs() < 1e-9);
        let label = if expected == 0 { "Low Risk" } else { "High Risk" };
        assert_eq!(body["risk_level"], label);
    }
}

#[tokio::test]
async fn test_predict_missing_field_returns_400() {
    let mut payload = common::low_risk_applicant();
    payload.as_object_mut().unwrap().remove("unpaid_amount");

    let (status, body) = send(app().await, post_predict(payload.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Missing required field: unpaid_amount");
}

#[tokio::test]
async fn test_predict_malformed_json_returns_400() {
    let (status, body) = send(app().await, post_predict("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("Serialization error"));

    let mut payload = common::low_risk_applicant();
    payload["income"] = Value::String("plenty".into());
    let (status, _) = send(app().await, post_predict(payload.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let request = Request::get("/")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app().await.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
