use crate::core::features::APPLICANT_FIELDS;
use crate::core::{ApplicantInput, Prediction, PredictionRecord, PredictionStats};
use crate::utils::error::{Result, ScoringError};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::VecDeque;
use tokio::sync::RwLock;

/// Oldest records are dropped beyond this many.
pub const DEFAULT_CAPACITY: usize = 1000;

const EXPORT_RESULT_COLUMNS: [&str; 4] = [
    "prediction",
    "probability_good",
    "probability_bad",
    "risk_level",
];

/// Predictions made during one dashboard session, oldest first. Holds at
/// most `capacity` records.
#[derive(Debug)]
pub struct PredictionHistory {
    records: RwLock<VecDeque<PredictionRecord>>,
    capacity: usize,
}

impl Default for PredictionHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl PredictionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub async fn save(&self, input: ApplicantInput, result: Prediction) -> PredictionRecord {
        let record = PredictionRecord {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            input,
            result,
        };
        let mut records = self.records.write().await;
        while records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record.clone());
        tracing::debug!("Saved prediction {} to history", record.id);
        record
    }

    pub async fn all(&self) -> Vec<PredictionRecord> {
        self.records.read().await.iter().cloned().collect()
    }

    /// Newest first.
    pub async fn recent(&self, limit: usize) -> Vec<PredictionRecord> {
        self.records
            .read()
            .await
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Inclusive on both ends.
    pub async fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<PredictionRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| r.timestamp >= start && r.timestamp <= end)
            .cloned()
            .collect()
    }

    pub async fn stats(&self) -> PredictionStats {
        let records = self.records.read().await;
        if records.is_empty() {
            return PredictionStats::default();
        }

        let total = records.len();
        let high_risk = records.iter().filter(|r| r.result.prediction == 1).count();
        let low_risk = records.iter().filter(|r| r.result.prediction == 0).count();
        let n = total as f64;

        PredictionStats {
            total,
            high_risk,
            low_risk,
            high_risk_percentage: high_risk as f64 / n * 100.0,
            low_risk_percentage: low_risk as f64 / n * 100.0,
            average_probability_good: records.iter().map(|r| r.result.probability_good).sum::<f64>() / n,
            average_probability_bad: records.iter().map(|r| r.result.probability_bad).sum::<f64>() / n,
        }
    }

    /// Returns whether a record was removed.
    pub async fn delete(&self, id: &str) -> bool {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        records.len() != before
    }

    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

/// id, timestamp, applicant fields, then the prediction.
pub fn export_csv(records: &[PredictionRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(
        ["id", "timestamp"]
            .iter()
            .chain(APPLICANT_FIELDS.iter())
            .chain(EXPORT_RESULT_COLUMNS.iter()),
    )?;

    for record in records {
        let mut fields = vec![
            record.id.clone(),
            record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        ];
        fields.extend(
            APPLICANT_FIELDS
                .iter()
                .map(|f| record.input.value_of(f).map(|v| v.to_string()).unwrap_or_default()),
        );
        fields.push(record.result.prediction.to_string());
        fields.push(format!("{:.6}", record.result.probability_good));
        fields.push(format!("{:.6}", record.result.probability_bad));
        fields.push(record.result.risk_level.clone());
        writer.write_record(&fields)?;
    }

    writer
        .into_inner()
        .map_err(|e| ScoringError::IoError(e.into_error()))
}
