use crate::domain::model::{ModelInfo, Prediction};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where the serialized artifacts come from.
pub trait ArtifactStore: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn model_path(&self) -> &str;
    fn columns_path(&self) -> &str;
    fn low_risk_threshold(&self) -> f64;
    fn high_risk_threshold(&self) -> f64;
}

/// Anything that can score an applicant payload: the in-process model or a
/// remote scoring API.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn model_info(&self) -> Result<ModelInfo>;
    async fn predict(&self, payload: &serde_json::Value) -> Result<Prediction>;
}
