use crate::core::{ModelInfo, Prediction, Scorer};
use crate::utils::error::{Result, ScoringError};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

/// Client for the scoring REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    message: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        crate::utils::validation::validate_url("api_url", base_url)?;
        let mut base_url = Url::parse(base_url).map_err(|e| ScoringError::ConfigError {
            message: format!("invalid API URL: {}", e),
        })?;
        // join() 會取代最後一段路徑，先補上結尾斜線
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            client: Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|e| ScoringError::ConfigError {
            message: format!("invalid endpoint '{}': {}", path, e),
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.detail)
            .unwrap_or(body);
        Err(ScoringError::RemoteError {
            status: status.as_u16(),
            detail,
        })
    }

    /// `GET /`
    pub async fn health(&self) -> Result<String> {
        let response = self.client.get(self.endpoint("")?).send().await?;
        Ok(Self::decode::<HealthBody>(response).await?.message)
    }

    /// `GET /model-info`
    pub async fn fetch_model_info(&self) -> Result<ModelInfo> {
        let response = self.client.get(self.endpoint("model-info")?).send().await?;
        Self::decode(response).await
    }

    /// `POST /predict`
    pub async fn predict(&self, payload: &serde_json::Value) -> Result<Prediction> {
        tracing::debug!("Posting prediction request to {}", self.base_url);
        let response = self
            .client
            .post(self.endpoint("predict")?)
            .json(payload)
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl Scorer for ApiClient {
    async fn model_info(&self) -> Result<ModelInfo> {
        self.fetch_model_info().await
    }

    async fn predict(&self, payload: &serde_json::Value) -> Result<Prediction> {
        ApiClient::predict(self, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_keep_base_path() {
        let client = ApiClient::new("http://localhost:8000/scoring").unwrap();
        assert_eq!(
            client.endpoint("predict").unwrap().as_str(),
            "http://localhost:8000/scoring/predict"
        );

        let client = ApiClient::new("http://localhost:8000").unwrap();
        assert_eq!(
            client.endpoint("model-info").unwrap().as_str(),
            "http://localhost:8000/model-info"
        );
        assert!(ApiClient::new("localhost:8000").is_err());
    }
}
