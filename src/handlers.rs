use crate::config::Config;
use crate::errors::AppError;
use crate::models::*;
use crate::services::LeadService;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Lead loading, scoring and filtering.
    pub leads: LeadService,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let leads = LeadService::from_config(&config);
        Self { config, leads }
    }
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /api/leads
///
/// Lists scored leads, optionally filtered by `industry`, `region` and
/// `min_score`. A missing or unreadable data file yields `[]`.
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<LeadRecord>>, AppError> {
    let filters = LeadFilters::from_query_pairs(params);
    tracing::info!("GET /api/leads - filters: {:?}", filters);

    let service = state.leads.clone();
    let leads = tokio::task::spawn_blocking(move || service.list_leads(&filters)).await?;

    Ok(Json(leads))
}

/// POST /api/score
///
/// Scores an arbitrary JSON object. An absent or unparseable body is scored
/// as `{}`.
pub async fn score_lead(body: Bytes) -> Json<ScoreResponse> {
    let payload: Value = serde_json::from_slice(&body).unwrap_or_else(|e| {
        if !body.is_empty() {
            tracing::debug!("Unparseable score payload, scoring defaults: {}", e);
        }
        Value::Object(LeadRecord::new())
    });

    let score = LeadService::score_submitted(&payload);
    tracing::info!("POST /api/score - score: {}", score);

    Json(ScoreResponse { score })
}

/// GET /api/insights
///
/// Score histogram of the leads matching the same filters as `/api/leads`.
pub async fn score_insights(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<ScoreDistribution>, AppError> {
    let filters = LeadFilters::from_query_pairs(params);
    tracing::info!("GET /api/insights - filters: {:?}", filters);

    let service = state.leads.clone();
    let distribution =
        tokio::task::spawn_blocking(move || service.score_distribution(&filters)).await?;

    Ok(Json(distribution))
}

/// GET /api/leads/export
///
/// Downloads the filtered, scored leads as `top_leads.csv`.
pub async fn export_leads(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, AppError> {
    let filters = LeadFilters::from_query_pairs(params);
    tracing::info!("GET /api/leads/export - filters: {:?}", filters);

    let service = state.leads.clone();
    let csv = tokio::task::spawn_blocking(move || service.export_csv(&filters)).await??;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"top_leads.csv\"",
            ),
        ],
        csv,
    ))
}
