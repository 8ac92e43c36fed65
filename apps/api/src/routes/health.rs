use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version and the scoring setup in effect.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let ai_scoring = state.config.enable_ai_scoring && state.ai_scorer.is_some();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-analyzer",
        "ai_scoring": ai_scoring,
        "ai_timeout_ms": state.config.ai_timeout_ms,
        "default_backend": if ai_scoring { "ai" } else { "rubric" }
    }))
}
