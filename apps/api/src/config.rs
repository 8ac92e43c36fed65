use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub anthropic_api_key: Option<String>,
    /// Use the AI-assisted scorer by default. Requires `ANTHROPIC_API_KEY`.
    pub enable_ai_scoring: bool,
    pub ai_timeout_ms: u64,
    /// Clamped to 5..=8.
    pub missing_keyword_limit: usize,
    pub plan_limit: usize,
    pub min_content_chars: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            enable_ai_scoring: parse_env("ENABLE_AI_SCORING", false)?,
            ai_timeout_ms: parse_env("AI_TIMEOUT_MS", 8000)?,
            missing_keyword_limit: parse_env("MISSING_KEYWORD_LIMIT", 6usize)?.clamp(5, 8),
            plan_limit: parse_env("PLAN_LIMIT", 5)?,
            min_content_chars: parse_env("MIN_CONTENT_CHARS", 200)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
