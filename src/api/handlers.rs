use crate::core::engine::CreditScorer;
use crate::core::{ModelInfo, Prediction};
use crate::utils::error::ScoringError;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Every prediction failure is reported as 400 with a `detail` message.
#[derive(Debug)]
pub struct ApiError(pub ScoringError);

impl From<ScoringError> for ApiError {
    fn from(e: ScoringError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": self.0.to_string() })),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

pub async fn read_root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Credit Scoring API is running!",
    })
}

pub async fn model_info(State(scorer): State<Arc<CreditScorer>>) -> Json<ModelInfo> {
    Json(scorer.info())
}

pub async fn predict(
    State(scorer): State<Arc<CreditScorer>>,
    body: Bytes,
) -> Result<Json<Prediction>, ApiError> {
    let result = serde_json::from_slice::<Value>(&body)
        .map_err(ScoringError::from)
        .and_then(|payload| {
            debug!("Received data: {}", payload);
            scorer.predict_value(&payload)
        });

    match result {
        Ok(prediction) => {
            debug!(
                "Prediction {} (p_bad = {:.4})",
                prediction.prediction, prediction.probability_bad
            );
            Ok(Json(prediction))
        }
        Err(e) if e.is_client_error() => {
            warn!("Prediction rejected: {}", e);
            Err(ApiError(e))
        }
        Err(e) => {
            error!(
                "❌ Prediction failed: {} (Category: {:?})",
                e,
                e.category()
            );
            Err(ApiError(e))
        }
    }
}
