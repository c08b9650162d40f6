//! Browser dashboard: home, prediction form and sample charts behind a
//! sidebar, plus an in-memory history of the predictions made here.

pub mod pages;

use crate::core::features::parse_applicant;
use crate::core::history::{self, PredictionHistory};
use crate::core::{Prediction, PredictionRecord, PredictionStats, Scorer};
use crate::utils::error::{Result, ScoringError};
use crate::utils::validation::validate_range;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

const RECENT_LIMIT: usize = 10;

#[derive(Clone)]
pub struct DashboardState {
    pub scorer: Arc<dyn Scorer>,
    pub history: Arc<PredictionHistory>,
}

impl DashboardState {
    pub fn new(scorer: Arc<dyn Scorer>) -> Self {
        Self {
            scorer,
            history: Arc::new(PredictionHistory::new()),
        }
    }
}

pub fn router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict", get(prediction_form).post(submit_prediction))
        .route("/visualizations", get(visualizations))
        .route("/history", get(history_json))
        .route("/history/export", get(export_history))
        .route("/history/clear", post(clear_history))
        .route("/history/:id/delete", post(delete_history))
        .with_state(state)
}

async fn home(State(state): State<DashboardState>) -> Html<String> {
    let stats = state.history.stats().await;
    let recent = state.history.recent(RECENT_LIMIT).await;
    Html(pages::home(&stats, &recent))
}

async fn prediction_form() -> Html<String> {
    Html(pages::prediction_page(&HashMap::new(), None))
}

async fn visualizations() -> Html<String> {
    Html(pages::visualizations())
}

/// Same bounds the form inputs declare.
fn check_form_ranges(payload: &Map<String, Value>) -> Result<()> {
    for (field, _, min, max, _, _) in pages::NUMBER_INPUTS {
        let Some(value) = payload.get(field).and_then(Value::as_str) else {
            continue;
        };
        if let Ok(number) = value.trim().parse::<f64>() {
            validate_range(field, number, min, max.unwrap_or(f64::MAX)).map_err(|e| {
                ScoringError::invalid_input(e.to_string())
            })?;
        }
    }
    Ok(())
}

async fn score_form(state: &DashboardState, form: &HashMap<String, String>) -> Result<Prediction> {
    let payload: Map<String, Value> = form
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    check_form_ranges(&payload)?;

    let payload = Value::Object(payload);
    let input = parse_applicant(&payload)?;
    let prediction = state.scorer.predict(&input.to_payload()).await?;
    state.history.save(input, prediction.clone()).await;
    Ok(prediction)
}

async fn submit_prediction(
    State(state): State<DashboardState>,
    Form(form): Form<HashMap<String, String>>,
) -> Html<String> {
    match score_form(&state, &form).await {
        Ok(prediction) => {
            tracing::info!(
                "Dashboard prediction: {} ({:.2}% default)",
                prediction.risk_level,
                prediction.probability_bad * 100.0
            );
            Html(pages::prediction_page(&form, Some(Ok(&prediction))))
        }
        Err(e) => {
            tracing::warn!("Dashboard prediction failed: {}", e);
            Html(pages::prediction_page(&form, Some(Err(e.to_string()))))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub stats: PredictionStats,
    pub predictions: Vec<PredictionRecord>,
}

impl HistoryQuery {
    async fn select(&self, history: &PredictionHistory) -> Vec<PredictionRecord> {
        match (self.start, self.end) {
            (None, None) => history.all().await,
            (start, end) => {
                let start = start.unwrap_or(DateTime::<Utc>::MIN_UTC);
                let end = end.unwrap_or(DateTime::<Utc>::MAX_UTC);
                history.between(start, end).await
            }
        }
    }
}

async fn history_json(
    State(state): State<DashboardState>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let predictions = query.select(&state.history).await;
    Json(HistoryResponse {
        stats: state.history.stats().await,
        predictions,
    })
}

async fn export_history(
    State(state): State<DashboardState>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let records = query.select(&state.history).await;
    match history::export_csv(&records) {
        Ok(body) => {
            tracing::info!("📤 Exported {} predictions", records.len());
            let disposition = format!(
                "attachment; filename=\"predictions_{}.csv\"",
                Utc::now().format("%Y%m%dT%H%M%SZ")
            );
            (
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                body,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("❌ History export failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn clear_history(State(state): State<DashboardState>) -> impl IntoResponse {
    state.history.clear().await;
    tracing::info!("Prediction history cleared");
    Redirect::to("/")
}

async fn delete_history(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if !state.history.delete(&id).await {
        tracing::warn!("No prediction with id {} in history", id);
    }
    Redirect::to("/")
}
