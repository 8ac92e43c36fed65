// Resume Analyzer: deterministic ATS-compatibility scoring.
// normalizer → patterns/relevance tables → rubric checks → aggregate,
// keyword gaps and improvement plan. `scorer` wraps the engine for the API,
// optionally putting an LLM in front of it via llm_client.

pub mod aggregate;
pub mod checks;
pub mod engine;
pub mod handlers;
pub mod keywords;
pub mod normalizer;
pub mod patterns;
pub mod plan;
pub mod prompts;
pub mod relevance;
pub mod rubric;
pub mod scorer;
