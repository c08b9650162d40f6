#![allow(dead_code)]

use credit_scoring::{AppConfig, CreditScorer, LocalArtifactStore};
use serde_json::{json, Value};
use std::path::PathBuf;

pub fn artifacts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("artifacts")
}

pub fn config() -> AppConfig {
    let mut config = AppConfig::default();
    config.artifacts.model_path = artifacts_dir()
        .join("credit_scoring_model.json")
        .to_string_lossy()
        .into_owned();
    config.artifacts.columns_path = artifacts_dir()
        .join("model_columns.json")
        .to_string_lossy()
        .into_owned();
    config
}

pub async fn scorer() -> CreditScorer {
    CreditScorer::load(&LocalArtifactStore::default(), &config())
        .await
        .unwrap()
}

pub fn low_risk_applicant() -> Value {
    json!({
        "age": 45,
        "income": 90000,
        "loan_amount": 10000,
        "interest_rate": 4.5,
        "turnover": 250000,
        "customer_tenure": 12,
        "num_late_payments_current": 0,
        "unpaid_amount": 0,
        "industry_sector": "Services",
        "credit_type": "Term Loan",
        "has_guarantee": "True",
        "guarantee_type": "Collateral",
        "repayment_frequency": "Monthly"
    })
}

pub fn high_risk_applicant() -> Value {
    json!({
        "age": 22,
        "income": 18000,
        "loan_amount": 60000,
        "interest_rate": 19.5,
        "turnover": 20000,
        "customer_tenure": 0,
        "num_late_payments_current": 6,
        "unpaid_amount": 15000,
        "industry_sector": "Construction",
        "credit_type": "Credit Card",
        "has_guarantee": false,
        "guarantee_type": "None",
        "repayment_frequency": "Annually"
    })
}
