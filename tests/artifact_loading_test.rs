mod common;

use credit_scoring::core::features::APPLICANT_FIELDS;
use credit_scoring::core::Scorer;
use credit_scoring::{AppConfig, CreditScorer, LocalArtifactStore, ScoringError};
use serde_json::json;
use tempfile::TempDir;

fn write_artifacts(dir: &TempDir, model: &serde_json::Value, columns: &serde_json::Value) -> AppConfig {
    std::fs::write(dir.path().join("model.json"), model.to_string()).unwrap();
    std::fs::write(dir.path().join("columns.json"), columns.to_string()).unwrap();

    let mut config = AppConfig::default();
    config.artifacts.model_path = "model.json".to_string();
    config.artifacts.columns_path = "columns.json".to_string();
    config
}

fn forest_model() -> serde_json::Value {
    json!({
        "model_type": "RandomForestClassifier",
        "preprocessor": {
            "numeric": [
                {"column": "num_late_payments_current", "mean": 0.0, "scale": 1.0},
                {"column": "unpaid_amount", "mean": 0.0, "scale": 1.0}
            ],
            "categorical": [
                {"column": "has_guarantee", "categories": ["False", "True"]}
            ]
        },
        "estimator": {"kind": "random_forest", "trees": [
            {"nodes": [
                {"feature": 0, "threshold": 1.5, "left": 1, "right": 2},
                {"value": 0.1},
                {"value": 0.8}
            ]},
            {"nodes": [
                {"feature": 3, "threshold": 0.5, "left": 1, "right": 2},
                {"value": 0.7},
                {"value": 0.2}
            ]}
        ]}
    })
}

#[tokio::test]
async fn test_shipped_artifacts_cover_every_applicant_field() {
    let scorer = common::scorer().await;
    assert_eq!(scorer.expected_columns(), APPLICANT_FIELDS.as_slice());
    assert_eq!(scorer.model_type(), "LogisticRegression");

    let info = Scorer::model_info(&scorer).await.unwrap();
    assert_eq!(info.expected_columns.len(), APPLICANT_FIELDS.len());
}

#[tokio::test]
async fn test_loads_forest_with_mapped_columns() {
    let dir = TempDir::new().unwrap();
    // 物件形式的欄位清單
    let config = write_artifacts(
        &dir,
        &forest_model(),
        &json!({"has_guarantee": "object", "num_late_payments_current": "int64", "unpaid_amount": "float64"}),
    );

    let scorer = CreditScorer::load(&LocalArtifactStore::new(dir.path()), &config)
        .await
        .unwrap();
    assert_eq!(
        scorer.expected_columns(),
        ["has_guarantee", "num_late_payments_current", "unpaid_amount"]
    );

    let safe = scorer.predict_value(&common::low_risk_applicant()).unwrap();
    assert_eq!(safe.prediction, 0);
    assert!((safe.probability_bad - 0.15).abs() < 1e-9);

    let risky = scorer.predict_value(&common::high_risk_applicant()).unwrap();
    assert_eq!(risky.prediction, 1);
    assert!((risky.probability_bad - 0.75).abs() < 1e-9);
}

#[tokio::test]
async fn test_rejects_mismatched_columns() {
    let dir = TempDir::new().unwrap();
    let config = write_artifacts(&dir, &forest_model(), &json!(["has_guarantee", "age"]));

    let err = CreditScorer::load(&LocalArtifactStore::new(dir.path()), &config)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ScoringError::ArtifactError { .. }));
    assert!(err.to_string().contains("age"));
}

#[tokio::test]
async fn test_rejects_unreadable_artifacts() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("model.json"), "\u{80}pickle").unwrap();
    std::fs::write(dir.path().join("columns.json"), "[\"age\"]").unwrap();

    let mut config = AppConfig::default();
    config.artifacts.model_path = "model.json".to_string();
    config.artifacts.columns_path = "columns.json".to_string();

    let store = LocalArtifactStore::new(dir.path());
    let err = CreditScorer::load(&store, &config).await.err().unwrap();
    assert!(err.to_string().contains("invalid model JSON"));

    config.artifacts.model_path = "absent.json".to_string();
    assert!(CreditScorer::load(&store, &config).await.is_err());
}
