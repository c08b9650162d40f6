mod common;

use credit_scoring::core::Scorer;
use credit_scoring::{ApiClient, ScoringError};
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn test_client_round_trips_against_mock_api() {
    let server = MockServer::start();

    let health = server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200)
            .json_body(json!({"message": "Credit Scoring API is running!"}));
    });
    let info = server.mock(|when, then| {
        when.method(GET).path("/model-info");
        then.status(200).json_body(json!({
            "expected_columns": ["age", "income"],
            "model_type": "LogisticRegression",
            "message": "Model is loaded and ready"
        }));
    });
    let predict = server.mock(|when, then| {
        when.method(POST)
            .path("/predict")
            .header("content-type", "application/json")
            .json_body_partial(r#"{"credit_type": "Term Loan"}"#);
        then.status(200).json_body(json!({
            "prediction": 0,
            "probability_good": 0.91,
            "probability_bad": 0.09,
            "risk_level": "Low Risk"
        }));
    });

    let client = ApiClient::new(&server.base_url()).unwrap();
    assert_eq!(client.health().await.unwrap(), "Credit Scoring API is running!");

    let model_info = Scorer::model_info(&client).await.unwrap();
    assert_eq!(model_info.expected_columns, vec!["age", "income"]);

    let prediction = client.predict(&common::low_risk_applicant()).await.unwrap();
    assert_eq!(prediction.prediction, 0);
    assert_eq!(prediction.risk_level, "Low Risk");

    health.assert();
    info.assert();
    predict.assert();
}

#[tokio::test]
async fn test_client_surfaces_error_detail() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/predict");
        then.status(400)
            .json_body(json!({"detail": "Missing required field: age"}));
    });

    let client = ApiClient::new(&server.base_url()).unwrap();
    let err = client.predict(&json!({})).await.unwrap_err();

    mock.assert();
    match err {
        ScoringError::RemoteError { status, detail } => {
            assert_eq!(status, 400);
            assert_eq!(detail, "Missing required field: age");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_client_against_live_router() {
    let scorer = std::sync::Arc::new(common::scorer().await);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, credit_scoring::api::router(scorer))
            .await
            .unwrap();
    });

    let client = ApiClient::new(&format!("http://{}", addr)).unwrap();
    let prediction = client.predict(&common::high_risk_applicant()).await.unwrap();
    assert_eq!(prediction.prediction, 1);
    assert!((prediction.probability_good + prediction.probability_bad - 1.0).abs() < 1e-9);

    let mut payload = common::high_risk_applicant();
    payload.as_object_mut().unwrap().remove("age");
    let err = client.predict(&payload).await.unwrap_err();
    assert!(err.to_string().contains("Missing required field: age"));
}
