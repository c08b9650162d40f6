//! Shapes a loosely typed applicant payload into the row layout the model
//! was trained on.

use crate::core::{ApplicantInput, FeatureRow, FeatureValue};
use crate::utils::error::{Result, ScoringError};
use serde_json::{Map, Value};

/// Every applicant field, in training order.
pub const APPLICANT_FIELDS: [&str; 13] = [
    "age",
    "income",
    "loan_amount",
    "interest_rate",
    "turnover",
    "customer_tenure",
    "num_late_payments_current",
    "unpaid_amount",
    "industry_sector",
    "credit_type",
    "has_guarantee",
    "guarantee_type",
    "repayment_frequency",
];

fn required<'a>(obj: &'a Map<String, Value>, field: &str) -> Result<&'a Value> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(ScoringError::MissingFieldError {
            field: field.to_string(),
        }),
        Some(value) => Ok(value),
    }
}

fn number_field(obj: &Map<String, Value>, field: &str) -> Result<f64> {
    let value = match required(obj, field)? {
        Value::Number(n) => n.as_f64().ok_or_else(|| {
            ScoringError::invalid_input(format!("field '{}' is not representable as f64", field))
        })?,
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            ScoringError::invalid_input(format!("field '{}' must be numeric, got '{}'", field, s))
        })?,
        other => {
            return Err(ScoringError::invalid_input(format!(
                "field '{}' must be numeric, got {}",
                field, other
            )))
        }
    };

    if !value.is_finite() {
        return Err(ScoringError::invalid_input(format!(
            "field '{}' must be a finite number",
            field
        )));
    }
    Ok(value)
}

fn text_field(obj: &Map<String, Value>, field: &str) -> Result<String> {
    match required(obj, field)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(ScoringError::invalid_input(format!(
            "field '{}' must be text, got {}",
            field, other
        ))),
    }
}

/// 訓練資料中 has_guarantee 是 "True" / "False" 字串
fn guarantee_field(obj: &Map<String, Value>) -> Result<String> {
    let flag = match required(obj, "has_guarantee")? {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        other => {
            return Err(ScoringError::invalid_input(format!(
                "field 'has_guarantee' must be a boolean or string, got {}",
                other
            )))
        }
    };
    Ok(if flag { "True" } else { "False" }.to_string())
}

/// Parses a request payload. Missing or null fields are reported by name;
/// unknown keys are ignored.
pub fn parse_applicant(payload: &Value) -> Result<ApplicantInput> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ScoringError::invalid_input("expected a JSON object of applicant fields"))?;

    Ok(ApplicantInput {
        age: number_field(obj, "age")?,
        income: number_field(obj, "income")?,
        loan_amount: number_field(obj, "loan_amount")?,
        interest_rate: number_field(obj, "interest_rate")?,
        turnover: number_field(obj, "turnover")?,
        customer_tenure: number_field(obj, "customer_tenure")?,
        num_late_payments_current: number_field(obj, "num_late_payments_current")?,
        unpaid_amount: number_field(obj, "unpaid_amount")?,
        industry_sector: text_field(obj, "industry_sector")?,
        credit_type: text_field(obj, "credit_type")?,
        has_guarantee: guarantee_field(obj)?,
        guarantee_type: text_field(obj, "guarantee_type")?,
        repayment_frequency: text_field(obj, "repayment_frequency")?,
    })
}

impl ApplicantInput {
    pub fn value_of(&self, column: &str) -> Option<FeatureValue> {
        let value = match column {
            "age" => FeatureValue::Number(self.age),
            "income" => FeatureValue::Number(self.income),
            "loan_amount" => FeatureValue::Number(self.loan_amount),
            "interest_rate" => FeatureValue::Number(self.interest_rate),
            "turnover" => FeatureValue::Number(self.turnover),
            "customer_tenure" => FeatureValue::Number(self.customer_tenure),
            "num_late_payments_current" => FeatureValue::Number(self.num_late_payments_current),
            "unpaid_amount" => FeatureValue::Number(self.unpaid_amount),
            "industry_sector" => FeatureValue::Text(self.industry_sector.clone()),
            "credit_type" => FeatureValue::Text(self.credit_type.clone()),
            "has_guarantee" => FeatureValue::Text(self.has_guarantee.clone()),
            "guarantee_type" => FeatureValue::Text(self.guarantee_type.clone()),
            "repayment_frequency" => FeatureValue::Text(self.repayment_frequency.clone()),
            _ => return None,
        };
        Some(value)
    }

    pub fn has_guarantee(&self) -> bool {
        self.has_guarantee == "True"
    }

    pub fn to_payload(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Lays the applicant out in exactly the order of `expected_columns`.
pub fn build_row(input: &ApplicantInput, expected_columns: &[String]) -> Result<FeatureRow> {
    let mut row = FeatureRow::new();
    for column in expected_columns {
        let value = input.value_of(column).ok_or_else(|| ScoringError::InferenceError {
            message: format!(
                "model expects column '{}' which is not an applicant field",
                column
            ),
        })?;
        row.push(column.clone(), value);
    }
    Ok(row)
}
