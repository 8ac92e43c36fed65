//! Improvement Plan Builder — non-passing checks become ranked actions.

use crate::analysis::rubric::Evaluation;
use crate::models::analysis::{CheckStatus, Impact, PlanItem, Priority};

/// Impact grows with priority and with distance from Pass:
/// priority rank (1–3) plus one step for a Warning, mapped 1 → high,
/// 2 → medium, 3+ → low. Passing checks have no impact.
pub fn impact_for(status: CheckStatus, priority: Priority) -> Option<Impact> {
    let distance = match status {
        CheckStatus::Pass => return None,
        CheckStatus::Fail => 0,
        CheckStatus::Warning => 1,
    };
    Some(match priority as u8 + distance {
        1 => Impact::High,
        2 => Impact::Medium,
        _ => Impact::Low,
    })
}

/// Every action of every Warning/Fail check, stably sorted high → low and
/// truncated to `limit`. Truncation never touches the score.
pub fn build_plan(evaluations: &[Evaluation], limit: usize) -> Vec<PlanItem> {
    let mut plan: Vec<PlanItem> = Vec::new();

    for evaluation in evaluations {
        let Some(impact) = impact_for(evaluation.check.status, evaluation.check.priority) else {
            continue;
        };
        for action in &evaluation.actions {
            if plan.iter().any(|item| &item.action == action) {
                continue;
            }
            plan.push(PlanItem {
                action: action.clone(),
                impact,
            });
        }
    }

    plan.sort_by_key(|item| item.impact);
    plan.truncate(limit);
    plan
}
