// LLM prompt constants for AI-assisted analysis.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{EVIDENCE_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::LlmError;
use crate::models::resume::ResumeDocument;

/// System prompt for resume review.
pub const ANALYSIS_SYSTEM: &str = JSON_ONLY_SYSTEM;

/// Review prompt. Replace `{resume_json}` and `{evidence}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Review the following resume for applicant tracking system (ATS) compatibility and overall quality.

Return a JSON object with this EXACT schema (no extra fields):
{
  "score": 74,
  "status": "good",
  "feedback": [
    {
      "id": "metrics",
      "label": "Quantified Achievements",
      "status": "warning",
      "message": "Only one bullet includes a measurable result.",
      "priority": 2
    }
  ],
  "missingKeywords": ["Docker", "CI/CD"],
  "improvementPlan": [
    {"action": "Add numbers to at least three experience bullets", "impact": "high"}
  ]
}

Rules:
- "score" is an integer from 0 to 100.
- "status" is one of: "excellent" (85+), "good" (70-84), "needs_improvement" (50-69), "poor" (below 50).
- Each feedback "status" is one of: "pass", "warning", "fail".
- Each feedback "priority" is 1 (critical), 2 (important) or 3 (nice to have).
- "missingKeywords" lists at most 8 keywords that fit the candidate's field but are absent from the resume.
- "improvementPlan" items use "impact" of "high", "medium" or "low", most impactful first.
- Cover at least: contact details, summary, experience, skills, action verbs, quantified results.

{evidence}

RESUME (JSON):
{resume_json}
"#;

pub fn build_analysis_prompt(document: &ResumeDocument) -> Result<String, LlmError> {
    let resume_json = serde_json::to_string_pretty(document)?;
    Ok(ANALYSIS_PROMPT_TEMPLATE
        .replace("{evidence}", EVIDENCE_INSTRUCTION)
        .replace("{resume_json}", &resume_json))
}
