use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use crate::analysis::engine::{Analyzer, AnalyzerSettings};
use crate::analysis::scorer::{AiAssistedScorer, LlmCollaborator, ResumeScorer, RubricScorer};
use crate::config::Config;
use crate::llm_client::{self, LlmClient};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Deterministic engine; also the source of the published rubric.
    pub analyzer: Arc<Analyzer>,
    /// Scorer used when the request names no mode. Swap via ENABLE_AI_SCORING.
    pub scorer: Arc<dyn ResumeScorer>,
    pub rubric_scorer: Arc<dyn ResumeScorer>,
    /// Present only when an API key is configured.
    pub ai_scorer: Option<Arc<dyn ResumeScorer>>,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self> {
        let analyzer = Arc::new(Analyzer::with_settings(AnalyzerSettings {
            min_content_chars: config.min_content_chars,
            keyword_limit: config.missing_keyword_limit,
            plan_limit: config.plan_limit,
        }));
        let rubric = RubricScorer::new(Arc::clone(&analyzer));
        let rubric_scorer: Arc<dyn ResumeScorer> = Arc::new(rubric.clone());

        let ai_scorer: Option<Arc<dyn ResumeScorer>> = match &config.anthropic_api_key {
            Some(key) => {
                let timeout = Duration::from_millis(config.ai_timeout_ms);
                let llm = LlmClient::new(key.clone(), timeout)?;
                info!("LLM client initialized (model: {})", llm_client::MODEL);
                Some(Arc::new(AiAssistedScorer::new(
                    Arc::new(LlmCollaborator(llm)),
                    rubric,
                    timeout,
                    config.missing_keyword_limit,
                )))
            }
            None => None,
        };

        let scorer = match (&ai_scorer, config.enable_ai_scoring) {
            (Some(ai), true) => Arc::clone(ai),
            (None, true) => {
                warn!("ENABLE_AI_SCORING is set but ANTHROPIC_API_KEY is missing; using rubric scorer");
                Arc::clone(&rubric_scorer)
            }
            _ => Arc::clone(&rubric_scorer),
        };

        Ok(Self {
            config,
            analyzer,
            scorer,
            rubric_scorer,
            ai_scorer,
        })
    }
}
