use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One loan applicant as the model was trained on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantInput {
    pub age: f64,
    pub income: f64,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub turnover: f64,
    pub customer_tenure: f64,
    pub num_late_payments_current: f64,
    pub unpaid_amount: f64,
    pub industry_sector: String,
    pub credit_type: String,
    /// Normalized to `"True"` / `"False"`.
    pub has_guarantee: String,
    pub guarantee_type: String,
    pub repayment_frequency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Number(n) => write!(f, "{}", n),
            FeatureValue::Text(s) => f.write_str(s),
        }
    }
}

/// A single-row table whose column order matches the model's expected columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRow {
    cells: Vec<(String, FeatureValue)>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: impl Into<String>, value: FeatureValue) {
        self.cells.push((column.into(), value));
    }

    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &FeatureValue> {
        self.cells.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// The REST response body for `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub prediction: u8,
    pub probability_good: f64,
    pub probability_bad: f64,
    pub risk_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::Low => "Low",
            RiskBand::Medium => "Medium",
            RiskBand::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Approved,
    Review,
    Rejected,
}

/// Prediction plus the score card heuristics, as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub prediction: u8,
    pub probability_good: f64,
    pub probability_bad: f64,
    /// Probability of default.
    pub probability: f64,
    pub credit_score: u32,
    pub risk_level: RiskBand,
    pub status: ApplicationStatus,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub expected_columns: Vec<String>,
    pub model_type: String,
    pub message: String,
}

/// A prediction kept in the dashboard session history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub input: ApplicantInput,
    pub result: Prediction,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionStats {
    pub total: usize,
    pub high_risk: usize,
    pub low_risk: usize,
    pub high_risk_percentage: f64,
    pub low_risk_percentage: f64,
    pub average_probability_good: f64,
    pub average_probability_bad: f64,
}
