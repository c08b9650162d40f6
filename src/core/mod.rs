pub mod artifact;
pub mod batch;
pub mod columns;
pub mod engine;
pub mod features;
pub mod history;
pub mod scoring;

pub use crate::domain::model::{
    ApplicantInput, ApplicationStatus, Assessment, FeatureRow, FeatureValue, ModelInfo,
    Prediction, PredictionRecord, PredictionStats, RiskBand,
};
pub use crate::domain::ports::{ArtifactStore, ConfigProvider, Scorer};
pub use crate::utils::error::Result;
