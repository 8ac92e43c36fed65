//! Scorer backends — pluggable, trait-based front door to the analyzer.
//!
//! Default: `RubricScorer` (deterministic engine, always available).
//! Optional: `AiAssistedScorer` (LLM first, raced against a timeout, falls
//! back to the rubric on any failure).
//!
//! `AppState` holds `Arc<dyn ResumeScorer>`, picked at startup from config.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::engine::Analyzer;
use crate::analysis::prompts::{build_analysis_prompt, ANALYSIS_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::analysis::{AnalysisResult, Check, CheckStatus, PlanItem, Priority, ScoreStatus};
use crate::models::resume::ResumeDocument;

pub const RUBRIC_BACKEND: &str = "rubric";
pub const AI_BACKEND: &str = "ai";

/// An analysis plus the backend that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredAnalysis {
    pub result: AnalysisResult,
    pub scorer_backend: String,
}

#[async_trait]
pub trait ResumeScorer: Send + Sync {
    async fn score(&self, document: &ResumeDocument) -> Result<ScoredAnalysis, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// RubricScorer
// ────────────────────────────────────────────────────────────────────────────

/// Runs the deterministic analyzer on the blocking pool.
#[derive(Clone)]
pub struct RubricScorer {
    analyzer: Arc<Analyzer>,
}

impl RubricScorer {
    pub fn new(analyzer: Arc<Analyzer>) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl ResumeScorer for RubricScorer {
    async fn score(&self, document: &ResumeDocument) -> Result<ScoredAnalysis, AppError> {
        let analyzer = Arc::clone(&self.analyzer);
        let document = document.clone();
        let result = tokio::task::spawn_blocking(move || analyzer.analyze(&document))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("analysis task failed: {e}")))?;

        Ok(ScoredAnalysis {
            result,
            scorer_backend: RUBRIC_BACKEND.to_string(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AI collaborator
// ────────────────────────────────────────────────────────────────────────────

/// One feedback item as returned by the AI collaborator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiFeedback {
    #[serde(default)]
    pub id: Option<String>,
    pub label: String,
    pub status: CheckStatus,
    pub message: String,
    #[serde(default)]
    pub priority: Option<Priority>,
}

/// Raw AI payload. Only shape-checked here; `into_result` validates values.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAssessment {
    pub score: f64,
    pub status: ScoreStatus,
    #[serde(default)]
    pub feedback: Vec<AiFeedback>,
    #[serde(default)]
    pub missing_keywords: Option<Vec<String>>,
    #[serde(default)]
    pub improvement_plan: Option<Vec<PlanItem>>,
}

impl AiAssessment {
    /// Converts to an `AnalysisResult`, filling absent extensions from the
    /// deterministic `baseline`. Rejects out-of-range or empty payloads.
    pub fn into_result(
        self,
        baseline: &AnalysisResult,
        keyword_limit: usize,
    ) -> Result<AnalysisResult, AppError> {
        if !self.score.is_finite() || !(0.0..=100.0).contains(&self.score) {
            return Err(AppError::Llm(format!("score out of range: {}", self.score)));
        }
        if self.feedback.is_empty() {
            return Err(AppError::Llm("empty feedback list".to_string()));
        }

        let mut seen = HashSet::new();
        let checks = self
            .feedback
            .into_iter()
            .enumerate()
            .map(|(i, f)| {
                let base = f
                    .id
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(|| slug(&f.label));
                let id = if seen.insert(base.clone()) {
                    base
                } else {
                    format!("{base}-{i}")
                };
                Check {
                    id,
                    label: f.label,
                    status: f.status,
                    message: f.message,
                    weight: 1.0,
                    priority: f.priority.unwrap_or(Priority::Important),
                }
            })
            .collect();

        let mut missing_keywords = self
            .missing_keywords
            .unwrap_or_else(|| baseline.missing_keywords.clone());
        missing_keywords.truncate(keyword_limit);

        let mut improvement_plan = self
            .improvement_plan
            .unwrap_or_else(|| baseline.improvement_plan.clone());
        improvement_plan.sort_by_key(|item| item.impact);

        Ok(AnalysisResult {
            score: self.score.round() as u8,
            status: self.status,
            checks,
            missing_keywords,
            improvement_plan,
        })
    }
}

/// The external AI scoring service.
#[async_trait]
pub trait AiCollaborator: Send + Sync {
    async fn assess(&self, document: &ResumeDocument) -> Result<AiAssessment, LlmError>;
}

/// `AiCollaborator` backed by the LLM client.
pub struct LlmCollaborator(pub LlmClient);

#[async_trait]
impl AiCollaborator for LlmCollaborator {
    async fn assess(&self, document: &ResumeDocument) -> Result<AiAssessment, LlmError> {
        let prompt = build_analysis_prompt(document)?;
        self.0.call_json::<AiAssessment>(&prompt, ANALYSIS_SYSTEM).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AiAssistedScorer
// ────────────────────────────────────────────────────────────────────────────

/// AI first, rubric always. The AI call is raced against `timeout`; dropping
/// the timed-out future cancels the in-flight request.
pub struct AiAssistedScorer {
    collaborator: Arc<dyn AiCollaborator>,
    fallback: RubricScorer,
    timeout: Duration,
    keyword_limit: usize,
}

impl AiAssistedScorer {
    pub fn new(
        collaborator: Arc<dyn AiCollaborator>,
        fallback: RubricScorer,
        timeout: Duration,
        keyword_limit: usize,
    ) -> Self {
        Self {
            collaborator,
            fallback,
            timeout,
            keyword_limit,
        }
    }
}

#[async_trait]
impl ResumeScorer for AiAssistedScorer {
    async fn score(&self, document: &ResumeDocument) -> Result<ScoredAnalysis, AppError> {
        let deterministic = self.fallback.score(document).await?;

        let assessment =
            match tokio::time::timeout(self.timeout, self.collaborator.assess(document)).await {
                Ok(Ok(assessment)) => assessment,
                Ok(Err(e)) => {
                    warn!("AI scoring failed, using rubric result: {e}");
                    return Ok(deterministic);
                }
                Err(_) => {
                    warn!(
                        "AI scoring timed out after {}ms, using rubric result",
                        self.timeout.as_millis()
                    );
                    return Ok(deterministic);
                }
            };

        match assessment.into_result(&deterministic.result, self.keyword_limit) {
            Ok(result) => {
                info!("AI scoring succeeded: score={}", result.score);
                Ok(ScoredAnalysis {
                    result,
                    scorer_backend: AI_BACKEND.to_string(),
                })
            }
            Err(e) => {
                warn!("AI scoring returned an unusable payload, using rubric result: {e}");
                Ok(deterministic)
            }
        }
    }
}

fn slug(label: &str) -> String {
    let slug = label
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    if slug.is_empty() {
        "feedback".to_string()
    } else {
        slug
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::Impact;

    enum Stub {
        Ok(&'static str),
        Fail,
        Hang,
    }

    #[async_trait]
    impl AiCollaborator for Stub {
        async fn assess(&self, _document: &ResumeDocument) -> Result<AiAssessment, LlmError> {
            match self {
                Stub::Ok(json) => Ok(serde_json::from_str(json)?),
                Stub::Fail => Err(LlmError::EmptyContent),
                Stub::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(LlmError::EmptyContent)
                }
            }
        }
    }

    fn rubric() -> RubricScorer {
        RubricScorer::new(Arc::new(Analyzer::default()))
    }

    fn ai_scorer(stub: Stub) -> AiAssistedScorer {
        AiAssistedScorer::new(Arc::new(stub), rubric(), Duration::from_millis(50), 6)
    }

    const VALID: &str = r#"{
        "score": 72.4,
        "status": "good",
        "feedback": [
            {"label": "Impact statements", "status": "warning", "message": "Add numbers"},
            {"label": "Impact statements", "status": "pass", "message": "Dup label"}
        ],
        "improvementPlan": [
            {"action": "polish headline", "impact": "low"},
            {"action": "quantify results", "impact": "high"}
        ]
    }"#;

    #[tokio::test]
    async fn test_rubric_scorer_labels_backend() {
        let scored = rubric().score(&ResumeDocument::default()).await.unwrap();
        assert_eq!(scored.scorer_backend, RUBRIC_BACKEND);
        assert_eq!(scored.result.score, 0);
    }

    #[tokio::test]
    async fn test_ai_result_used_when_valid() {
        let scored = ai_scorer(Stub::Ok(VALID))
            .score(&ResumeDocument::default())
            .await
            .unwrap();
        assert_eq!(scored.scorer_backend, AI_BACKEND);
        assert_eq!(scored.result.score, 72);
        assert_eq!(scored.result.status, ScoreStatus::Good);
        assert_eq!(scored.result.checks[0].id, "impact_statements");
        assert_ne!(scored.result.checks[0].id, scored.result.checks[1].id);
        assert_eq!(scored.result.improvement_plan[0].impact, Impact::High);
        // Keywords absent in the AI payload come from the rubric run.
        assert!(!scored.result.missing_keywords.is_empty());
    }

    #[tokio::test]
    async fn test_falls_back_on_collaborator_error() {
        let scored = ai_scorer(Stub::Fail)
            .score(&ResumeDocument::default())
            .await
            .unwrap();
        assert_eq!(scored.scorer_backend, RUBRIC_BACKEND);
    }

    #[tokio::test]
    async fn test_falls_back_on_malformed_payload() {
        let scored = ai_scorer(Stub::Ok(r#"{"score": "high"}"#))
            .score(&ResumeDocument::default())
            .await
            .unwrap();
        assert_eq!(scored.scorer_backend, RUBRIC_BACKEND);
    }

    #[tokio::test]
    async fn test_falls_back_on_out_of_range_score() {
        let json = r#"{"score": 140, "status": "excellent",
            "feedback": [{"label": "x", "status": "pass", "message": "ok"}]}"#;
        let scored = ai_scorer(Stub::Ok(json))
            .score(&ResumeDocument::default())
            .await
            .unwrap();
        assert_eq!(scored.scorer_backend, RUBRIC_BACKEND);
    }

    #[tokio::test]
    async fn test_falls_back_on_empty_feedback() {
        let json = r#"{"score": 90, "status": "excellent", "feedback": []}"#;
        let scored = ai_scorer(Stub::Ok(json))
            .score(&ResumeDocument::default())
            .await
            .unwrap();
        assert_eq!(scored.scorer_backend, RUBRIC_BACKEND);
    }

    #[tokio::test]
    async fn test_falls_back_on_timeout() {
        let deterministic = rubric().score(&ResumeDocument::default()).await.unwrap();
        let scored = ai_scorer(Stub::Hang)
            .score(&ResumeDocument::default())
            .await
            .unwrap();
        assert_eq!(scored, deterministic);
    }

    #[test]
    fn test_ai_keywords_are_capped() {
        let json = r#"{"score": 60, "status": "needs_improvement",
            "feedback": [{"label": "x", "status": "fail", "message": "m", "priority": 1}],
            "missingKeywords": ["a","b","c","d","e","f","g","h","i"]}"#;
        let assessment: AiAssessment = serde_json::from_str(json).unwrap();
        let baseline = crate::analysis::engine::analyze(&ResumeDocument::default());
        let result = assessment.into_result(&baseline, 6).unwrap();
        assert_eq!(result.missing_keywords.len(), 6);
        assert_eq!(result.checks[0].priority, Priority::Critical);
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Impact Statements!"), "impact_statements");
        assert_eq!(slug("  "), "feedback");
    }
}
