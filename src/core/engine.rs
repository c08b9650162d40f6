use crate::core::artifact::ModelArtifact;
use crate::core::columns::ColumnsArtifact;
use crate::core::features::{build_row, parse_applicant};
use crate::core::scoring::{self, RiskThresholds};
use crate::core::{
    ApplicantInput, ArtifactStore, Assessment, ConfigProvider, FeatureRow, ModelInfo, Prediction,
    Scorer,
};
use crate::utils::error::{Result, ScoringError};
use crate::utils::monitor::ProcessMonitor;
use async_trait::async_trait;
use serde_json::Value;

/// The loaded model and its expected columns. Read-only after construction,
/// so one instance is shared by every request.
pub struct CreditScorer {
    model: ModelArtifact,
    columns: Vec<String>,
    thresholds: RiskThresholds,
    monitor: ProcessMonitor,
}

impl CreditScorer {
    pub async fn load<S: ArtifactStore, C: ConfigProvider>(store: &S, config: &C) -> Result<Self> {
        tracing::info!("📦 Loading model from: {}", config.model_path());
        let model_bytes = store.read_file(config.model_path()).await?;
        let model = ModelArtifact::from_slice(config.model_path(), &model_bytes)?;
        tracing::info!(
            "Model loaded successfully ({}, estimator: {})",
            model.model_type,
            model.estimator.kind()
        );

        let columns_bytes = store.read_file(config.columns_path()).await?;
        let columns = ColumnsArtifact::from_slice(config.columns_path(), &columns_bytes)?;
        tracing::info!("Model column structure: {:?}", columns.expected_columns());

        let thresholds = RiskThresholds {
            low: config.low_risk_threshold(),
            high: config.high_risk_threshold(),
        };
        Self::from_artifacts(model, columns, thresholds)
    }

    pub fn from_artifacts(
        model: ModelArtifact,
        columns: ColumnsArtifact,
        thresholds: RiskThresholds,
    ) -> Result<Self> {
        model
            .validate()
            .map_err(|e| ScoringError::artifact("model", e))?;
        let columns = columns.expected_columns();

        // 欄位清單與前處理器必須互相對應
        if let Some(unknown) = columns.iter().find(|c| !model.preprocessor.knows_column(c)) {
            return Err(ScoringError::artifact(
                "model_columns",
                format!("column '{}' is not handled by the model preprocessor", unknown),
            ));
        }
        let declared = model
            .preprocessor
            .numeric
            .iter()
            .map(|c| &c.column)
            .chain(model.preprocessor.categorical.iter().map(|c| &c.column));
        for column in declared {
            if !columns.contains(column) {
                return Err(ScoringError::artifact(
                    "model_columns",
                    format!("preprocessor column '{}' is missing from the column list", column),
                ));
            }
        }

        Ok(Self {
            model,
            columns,
            thresholds,
            monitor: ProcessMonitor::default(),
        })
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = ProcessMonitor::new(enabled);
        self.monitor.log_stats("Artifacts loaded");
        self
    }

    pub fn expected_columns(&self) -> &[String] {
        &self.columns
    }

    pub fn model_type(&self) -> &str {
        &self.model.model_type
    }

    pub fn monitor(&self) -> &ProcessMonitor {
        &self.monitor
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            expected_columns: self.columns.clone(),
            model_type: self.model.model_type.clone(),
            message: "Model is loaded and ready".to_string(),
        }
    }

    /// Payload → typed applicant → row in the model's column order.
    pub fn prepare(&self, payload: &Value) -> Result<(ApplicantInput, FeatureRow)> {
        let input = parse_applicant(payload)?;
        let row = build_row(&input, &self.columns)?;
        tracing::debug!(
            "Final row columns: {:?}",
            row.columns().collect::<Vec<_>>()
        );
        tracing::debug!(
            "Final row values: {:?}",
            row.values().map(|v| v.to_string()).collect::<Vec<_>>()
        );
        Ok((input, row))
    }

    fn probabilities(&self, row: &FeatureRow) -> Result<(u8, [f64; 2])> {
        let proba = self.model.predict_proba(row)?;
        let prediction = if proba[1] > proba[0] { 1 } else { 0 };
        Ok((prediction, proba))
    }

    fn prediction_for_row(&self, row: &FeatureRow) -> Result<Prediction> {
        let (prediction, [good, bad]) = self.probabilities(row)?;
        Ok(Prediction {
            prediction,
            probability_good: good,
            probability_bad: bad,
            risk_level: scoring::risk_label(prediction).to_string(),
        })
    }

    pub fn predict_value(&self, payload: &Value) -> Result<Prediction> {
        let (_, row) = self.prepare(payload)?;
        self.prediction_for_row(&row)
    }

    pub fn assess_input(&self, input: &ApplicantInput) -> Result<Assessment> {
        let row = build_row(input, &self.columns)?;
        let (prediction, [good, bad]) = self.probabilities(&row)?;
        let band = self.thresholds.band(bad);
        Ok(Assessment {
            prediction,
            probability_good: good,
            probability_bad: bad,
            probability: bad,
            credit_score: scoring::credit_score(bad),
            risk_level: band,
            status: scoring::application_status(band),
            recommendations: scoring::recommendations(input, bad),
        })
    }

    pub fn assess(&self, payload: &Value) -> Result<Assessment> {
        let (input, _) = self.prepare(payload)?;
        self.assess_input(&input)
    }
}

#[async_trait]
impl Scorer for CreditScorer {
    async fn model_info(&self) -> Result<ModelInfo> {
        Ok(self.info())
    }

    async fn predict(&self, payload: &Value) -> Result<Prediction> {
        self.predict_value(payload)
    }
}
