use crate::core::{ApplicantInput, ApplicationStatus, RiskBand};

pub const DEFAULT_LOW_RISK_THRESHOLD: f64 = 0.3;
pub const DEFAULT_HIGH_RISK_THRESHOLD: f64 = 0.7;

const MIN_CREDIT_SCORE: f64 = 300.0;
const CREDIT_SCORE_SPAN: f64 = 550.0;
const RECOMMENDATION_THRESHOLD: f64 = 0.5;
const MAX_LOAN_TO_INCOME: f64 = 0.3;

/// Label attached to the REST prediction.
pub fn risk_label(prediction: u8) -> &'static str {
    if prediction == 0 {
        "Low Risk"
    } else {
        "High Risk"
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    pub low: f64,
    pub high: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_RISK_THRESHOLD,
            high: DEFAULT_HIGH_RISK_THRESHOLD,
        }
    }
}

impl RiskThresholds {
    pub fn band(&self, probability_bad: f64) -> RiskBand {
        if probability_bad < self.low {
            RiskBand::Low
        } else if probability_bad < self.high {
            RiskBand::Medium
        } else {
            RiskBand::High
        }
    }
}

/// Maps the default probability onto the 300..=850 score range.
pub fn credit_score(probability_bad: f64) -> u32 {
    let p = probability_bad.clamp(0.0, 1.0);
    (MIN_CREDIT_SCORE + (1.0 - p) * CREDIT_SCORE_SPAN) as u32
}

pub fn application_status(band: RiskBand) -> ApplicationStatus {
    match band {
        RiskBand::Low => ApplicationStatus::Approved,
        RiskBand::Medium => ApplicationStatus::Review,
        RiskBand::High => ApplicationStatus::Rejected,
    }
}

pub fn recommendations(input: &ApplicantInput, probability_bad: f64) -> Vec<String> {
    let mut out = Vec::new();
    if probability_bad <= RECOMMENDATION_THRESHOLD {
        return out;
    }

    if input.income > 0.0 && input.loan_amount / input.income > MAX_LOAN_TO_INCOME {
        out.push("Consider reducing loan amount relative to annual income".to_string());
    }
    if input.num_late_payments_current > 0.0 {
        out.push("Bring current late payments up to date".to_string());
    }
    if input.unpaid_amount > 0.0 {
        out.push("Settle the outstanding unpaid amount".to_string());
    }
    if !input.has_guarantee() {
        out.push("Provide a guarantee such as collateral or a personal guarantor".to_string());
    }
    out
}
