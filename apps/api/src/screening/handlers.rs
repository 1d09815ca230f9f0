//! Axum route handlers for the Screening API.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Candidate, Decision, ScoredCandidate};
use crate::screening::filter::{PipelineFilter, StatusFilter};
use crate::screening::scoring::{apply_decisions, score_candidates};
use crate::screening::service::load_candidates;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub candidates: Vec<Candidate>,
    /// Decision tags owned by the caller's screening session, by candidate key.
    #[serde(default)]
    pub decisions: HashMap<String, Decision>,
    #[serde(flatten)]
    pub filter: PipelineFilter,
}

#[derive(Debug, Serialize)]
pub struct FilterResponse {
    pub total: usize,
    pub visible: usize,
    pub candidates: Vec<ScoredCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct CampaignQuery {
    #[serde(default)]
    pub min_score: i64,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub refresh: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screening/score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<Vec<ScoredCandidate>>, AppError> {
    Ok(Json(score_candidates(
        state.scorer.as_ref(),
        request.candidates,
    )))
}

/// POST /api/v1/screening/filter
///
/// Scores the posted list, layers the caller's decisions on top and returns
/// the visible subset in input order.
pub async fn handle_filter(
    State(state): State<AppState>,
    Json(request): Json<FilterRequest>,
) -> Result<Json<FilterResponse>, AppError> {
    let mut scored = score_candidates(state.scorer.as_ref(), request.candidates);
    apply_decisions(&mut scored, &request.decisions);

    let candidates = request.filter.apply(&scored);
    Ok(Json(FilterResponse {
        total: scored.len(),
        visible: candidates.len(),
        candidates,
    }))
}

/// GET /api/v1/campaigns/:campaign_id/candidates
///
/// Cached fetch from the talent source, then score and filter. No decisions
/// exist server-side, so the status filter is always `all`.
pub async fn handle_campaign_candidates(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
    Query(params): Query<CampaignQuery>,
) -> Result<Json<FilterResponse>, AppError> {
    if campaign_id.trim().is_empty() {
        return Err(AppError::Validation("campaign_id cannot be empty".to_string()));
    }

    let candidates = load_candidates(&state, &campaign_id, params.refresh).await?;
    let scored = score_candidates(state.scorer.as_ref(), candidates);

    let filter = PipelineFilter {
        min_score: params.min_score,
        search: params.search,
        status: StatusFilter::All,
    };
    let visible = filter.apply(&scored);

    Ok(Json(FilterResponse {
        total: scored.len(),
        visible: visible.len(),
        candidates: visible,
    }))
}
