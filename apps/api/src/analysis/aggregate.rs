//! Score Aggregator — partial credit over the declared weights.
//!
//! Pass earns the full weight, Warning half, Fail nothing. The same rule
//! applies to every check.

use crate::models::analysis::{Check, CheckStatus, ScoreStatus};

pub fn earned_weight(status: CheckStatus, weight: f64) -> f64 {
    match status {
        CheckStatus::Pass => weight,
        CheckStatus::Warning => weight / 2.0,
        CheckStatus::Fail => 0.0,
    }
}

/// `round(100 × Σ earned / Σ declared)` and its status bucket.
/// An empty check list scores 0.
pub fn aggregate(checks: &[Check]) -> (u8, ScoreStatus) {
    let total: f64 = checks.iter().map(|c| c.weight).sum();
    let earned: f64 = checks
        .iter()
        .map(|c| earned_weight(c.status, c.weight))
        .sum();

    let score = if total > 0.0 {
        ((earned / total) * 100.0).round().clamp(0.0, 100.0) as u8
    } else {
        0
    };

    (score, status_for_score(score))
}

/// Inclusive lower bounds: 85 excellent, 70 good, 50 needs improvement.
pub fn status_for_score(score: u8) -> ScoreStatus {
    match score {
        85.. => ScoreStatus::Excellent,
        70..=84 => ScoreStatus::Good,
        50..=69 => ScoreStatus::NeedsImprovement,
        _ => ScoreStatus::Poor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::Priority;

    fn check(status: CheckStatus, weight: f64) -> Check {
        Check {
            id: "c".to_string(),
            label: "C".to_string(),
            status,
            message: String::new(),
            weight,
            priority: Priority::Important,
        }
    }

    #[test]
    fn test_partial_credit_rule() {
        assert_eq!(earned_weight(CheckStatus::Pass, 10.0), 10.0);
        assert_eq!(earned_weight(CheckStatus::Warning, 10.0), 5.0);
        assert_eq!(earned_weight(CheckStatus::Fail, 10.0), 0.0);
    }

    #[test]
    fn test_all_pass_is_100() {
        let checks = vec![check(CheckStatus::Pass, 15.0), check(CheckStatus::Pass, 3.0)];
        assert_eq!(aggregate(&checks), (100, ScoreStatus::Excellent));
    }

    #[test]
    fn test_all_fail_is_0() {
        let checks = vec![check(CheckStatus::Fail, 15.0), check(CheckStatus::Fail, 3.0)];
        assert_eq!(aggregate(&checks), (0, ScoreStatus::Poor));
    }

    #[test]
    fn test_score_rounds_to_nearest() {
        // 2 / 3 = 66.67 → 67
        let checks = vec![
            check(CheckStatus::Pass, 1.0),
            check(CheckStatus::Warning, 1.0),
            check(CheckStatus::Warning, 1.0),
        ];
        assert_eq!(aggregate(&checks), (67, ScoreStatus::NeedsImprovement));
    }

    #[test]
    fn test_empty_checks_score_zero() {
        assert_eq!(aggregate(&[]), (0, ScoreStatus::Poor));
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(status_for_score(100), ScoreStatus::Excellent);
        assert_eq!(status_for_score(85), ScoreStatus::Excellent);
        assert_eq!(status_for_score(84), ScoreStatus::Good);
        assert_eq!(status_for_score(70), ScoreStatus::Good);
        assert_eq!(status_for_score(69), ScoreStatus::NeedsImprovement);
        assert_eq!(status_for_score(50), ScoreStatus::NeedsImprovement);
        assert_eq!(status_for_score(49), ScoreStatus::Poor);
        assert_eq!(status_for_score(0), ScoreStatus::Poor);
    }

    #[test]
    fn test_improving_one_check_never_lowers_score() {
        let weights = [15.0, 20.0, 8.0, 5.0, 3.0];
        let statuses = [CheckStatus::Fail, CheckStatus::Warning, CheckStatus::Pass];
        let base: Vec<Check> = weights
            .iter()
            .map(|w| check(CheckStatus::Warning, *w))
            .collect();

        for i in 0..weights.len() {
            let mut previous = None;
            for status in statuses {
                let mut checks = base.clone();
                checks[i].status = status;
                let (score, _) = aggregate(&checks);
                if let Some(prev) = previous {
                    assert!(score >= prev, "check {i}: {score} < {prev}");
                }
                previous = Some(score);
            }
        }
    }
}
