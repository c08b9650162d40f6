use crate::utils::error::{Result, ScoringError};
use serde::Deserialize;

/// The companion columns artifact: either a list of names or an object whose
/// keys are the names.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ColumnsArtifact {
    List(Vec<String>),
    Map(serde_json::Map<String, serde_json::Value>),
}

impl ColumnsArtifact {
    pub fn from_slice(path: &str, bytes: &[u8]) -> Result<Self> {
        let columns: ColumnsArtifact = serde_json::from_slice(bytes).map_err(|e| {
            ScoringError::artifact(
                path,
                format!("expected a JSON array or object of column names: {}", e),
            )
        })?;
        if columns.expected_columns().is_empty() {
            return Err(ScoringError::artifact(path, "column list is empty"));
        }
        Ok(columns)
    }

    pub fn expected_columns(&self) -> Vec<String> {
        match self {
            ColumnsArtifact::List(names) => names.clone(),
            // serde_json 的 preserve_order 保留鍵的順序
            ColumnsArtifact::Map(map) => map.keys().cloned().collect(),
        }
    }
}
