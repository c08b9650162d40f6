use crate::core::engine::CreditScorer;
use crate::core::features::{parse_applicant, APPLICANT_FIELDS};
use crate::utils::error::{Result, ScoringError};
use serde_json::{Map, Value};
use std::io::{Read, Write};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub rows: usize,
    pub high_risk: usize,
}

const RESULT_COLUMNS: [&str; 5] = [
    "prediction",
    "probability_good",
    "probability_bad",
    "risk_level",
    "credit_score",
];

/// Scores every applicant row of a CSV file. The first failing row aborts
/// the batch and is reported by its 1-based data row number. Rows scored
/// before the failure have already reached `output`, so callers writing to
/// a shared stream should buffer it.
pub fn score_csv<R: Read, W: Write>(scorer: &CreditScorer, input: R, output: W) -> Result<BatchSummary> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers()?.clone();

    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(APPLICANT_FIELDS.iter().chain(RESULT_COLUMNS.iter()))?;

    let mut summary = BatchSummary::default();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let row_number = idx + 1;

        // 空白儲存格視為缺值
        let payload: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| {
                let value = if v.trim().is_empty() {
                    Value::Null
                } else {
                    Value::String(v.to_string())
                };
                (h.trim().to_string(), value)
            })
            .collect();

        let input = parse_applicant(&Value::Object(payload))
            .map_err(|e| ScoringError::batch_row(row_number, e))?;
        let assessment = scorer
            .assess_input(&input)
            .map_err(|e| ScoringError::batch_row(row_number, e))?;

        let mut fields: Vec<String> = APPLICANT_FIELDS
            .iter()
            .map(|f| input.value_of(f).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        fields.push(assessment.prediction.to_string());
        fields.push(format!("{:.6}", assessment.probability_good));
        fields.push(format!("{:.6}", assessment.probability_bad));
        fields.push(crate::core::scoring::risk_label(assessment.prediction).to_string());
        fields.push(assessment.credit_score.to_string());
        writer.write_record(&fields)?;

        summary.rows += 1;
        if assessment.prediction == 1 {
            summary.high_risk += 1;
        }
    }

    writer.flush()?;
    scorer.monitor().log_stats("Batch scored");
    tracing::info!(
        "Scored {} rows ({} high risk)",
        summary.rows,
        summary.high_risk
    );
    Ok(summary)
}

