use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
}

/// Rubric priority. Serialized as the bare integer 1, 2 or 3.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(into = "u8", try_from = "u8")]
pub enum Priority {
    /// Contact, summary, experience, skills.
    Critical = 1,
    Important = 2,
    NiceToHave = 3,
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p as u8
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Priority::Critical),
            2 => Ok(Priority::Important),
            3 => Ok(Priority::NiceToHave),
            other => Err(format!("priority must be 1, 2 or 3 (got {other})")),
        }
    }
}

/// One evaluated rubric rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Check {
    pub id: String,
    pub label: String,
    pub status: CheckStatus,
    pub message: String,
    pub weight: f64,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStatus {
    Excellent,
    Good,
    NeedsImprovement,
    Poor,
}

/// Ordered high → low so a derived sort ranks the plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanItem {
    pub action: String,
    pub impact: Impact,
}

/// The only externally visible artifact of an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub score: u8,
    pub status: ScoreStatus,
    pub checks: Vec<Check>,
    pub missing_keywords: Vec<String>,
    pub improvement_plan: Vec<PlanItem>,
}
