// Cross-cutting prompt fragments. Feature-specific prompts live next to
// the feature (see analysis/prompts.rs).

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps the reviewer honest about what the document actually says.
pub const EVIDENCE_INSTRUCTION: &str = "\
    CRITICAL: Judge only what is written in the resume. \
    Do NOT assume skills, employers or achievements that are not stated. \
    Every feedback message must point at something present or missing in the document.";
