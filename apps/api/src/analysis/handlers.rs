//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::rubric::RubricEntry;
use crate::analysis::scorer::{ResumeScorer, ScoredAnalysis};
use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMode {
    Rubric,
    Ai,
}

impl ScoringMode {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "rubric" => Ok(Self::Rubric),
            "ai" => Ok(Self::Ai),
            other => Err(AppError::Validation(format!(
                "unknown mode '{other}', expected 'rubric' or 'ai'"
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricResponse {
    pub checks: Vec<RubricEntry>,
    pub total_weight: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze?mode=rubric|ai
///
/// Scores a resume document. Without `mode` the configured default scorer
/// is used. `mode=ai` on a deployment without AI scoring answers with the
/// rubric result.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeQuery>,
    Json(document): Json<ResumeDocument>,
) -> Result<Json<ScoredAnalysis>, AppError> {
    let mode = query.mode.as_deref().map(ScoringMode::parse).transpose()?;

    let scorer: &dyn ResumeScorer = match mode {
        None => state.scorer.as_ref(),
        Some(ScoringMode::Rubric) => state.rubric_scorer.as_ref(),
        Some(ScoringMode::Ai) => match &state.ai_scorer {
            Some(ai) => ai.as_ref(),
            None => {
                warn!("mode=ai requested but AI scoring is not configured");
                state.rubric_scorer.as_ref()
            }
        },
    };

    let scored = scorer.score(&document).await?;
    info!(
        "Analysis complete: score={}, status={:?}, backend={}",
        scored.result.score, scored.result.status, scored.scorer_backend
    );

    Ok(Json(scored))
}

/// GET /api/v1/rubric
///
/// The active check descriptors, for clients that render the rubric.
pub async fn handle_rubric(State(state): State<AppState>) -> Json<RubricResponse> {
    let rubric = state.analyzer.rubric();
    Json(RubricResponse {
        checks: rubric.entries(),
        total_weight: rubric.total_weight(),
    })
}
