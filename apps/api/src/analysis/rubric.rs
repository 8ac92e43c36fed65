//! Rubric — the declarative table of checks.
//!
//! Each `CheckDescriptor` pairs an id, label, weight and priority with a pure
//! evaluator. Weight and priority are independent fields; the aggregator only
//! ever reads weights, the plan builder only ever reads priorities.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::analysis::checks;
use crate::analysis::normalizer::NormalizedContent;
use crate::analysis::patterns::PatternLibrary;
use crate::models::analysis::{Check, CheckStatus, Priority};
use crate::models::resume::ResumeDocument;

/// Numeric cut-offs for every check. Defaults follow the published rubric;
/// they are tuning constants, not invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    pub summary_min_chars: usize,
    pub summary_max_chars: usize,
    pub summary_warning_chars: usize,
    pub experience_entries: usize,
    pub experience_description_chars: usize,
    pub skills_pass: usize,
    pub skills_warning: usize,
    pub skill_categories: usize,
    pub verbs_pass: usize,
    pub verbs_warning: usize,
    pub metrics_pass: usize,
    pub bullets_per_entry_pass: f64,
    pub bullets_per_entry_warning: f64,
    pub weak_phrases_warning: usize,
    pub description_avg_pass: usize,
    pub description_avg_warning: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            summary_min_chars: 100,
            summary_max_chars: 400,
            summary_warning_chars: 50,
            experience_entries: 2,
            experience_description_chars: 50,
            skills_pass: 8,
            skills_warning: 4,
            skill_categories: 2,
            verbs_pass: 6,
            verbs_warning: 3,
            metrics_pass: 4,
            bullets_per_entry_pass: 3.0,
            bullets_per_entry_warning: 1.0,
            weak_phrases_warning: 2,
            description_avg_pass: 200,
            description_avg_warning: 100,
        }
    }
}

/// Facts derived once per run from the normalized blob and shared by checks.
#[derive(Debug, Clone, Default)]
pub struct DerivedFacts {
    pub matched_verbs: BTreeSet<String>,
    pub metric_count: usize,
    pub weak_phrases: Vec<(String, usize)>,
    pub summary_has_years: bool,
}

impl DerivedFacts {
    pub fn derive(content: &NormalizedContent, library: &PatternLibrary) -> Self {
        Self {
            matched_verbs: library.matched_verbs(&content.text),
            metric_count: library.metric_count(&content.text),
            weak_phrases: library.weak_phrase_hits(&content.text),
            summary_has_years: library.has_years_of_experience(&content.summary),
        }
    }

    pub fn weak_phrase_total(&self) -> usize {
        self.weak_phrases.iter().map(|(_, n)| n).sum()
    }
}

/// Everything an evaluator may look at. Borrowed, never mutated.
pub struct CheckInput<'a> {
    pub document: &'a ResumeDocument,
    pub content: &'a NormalizedContent,
    pub facts: &'a DerivedFacts,
    pub library: &'a PatternLibrary,
    pub thresholds: &'a Thresholds,
}

/// What an evaluator decides: a status, a message, and the concrete actions
/// that would move the check towards Pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub status: CheckStatus,
    pub message: String,
    pub actions: Vec<String>,
}

impl Outcome {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Pass,
            message: message.into(),
            actions: Vec::new(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Warning,
            message: message.into(),
            actions: Vec::new(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Fail,
            message: message.into(),
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions.extend(actions.into_iter().map(Into::into));
        self
    }
}

pub type Evaluator = fn(&CheckInput<'_>) -> Outcome;

#[derive(Clone)]
pub struct CheckDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub weight: f64,
    pub priority: Priority,
    pub evaluate: Evaluator,
}

impl std::fmt::Debug for CheckDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckDescriptor")
            .field("id", &self.id)
            .field("weight", &self.weight)
            .field("priority", &self.priority)
            .finish()
    }
}

/// A check result plus the actions the plan builder turns into plan items.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub check: Check,
    pub actions: Vec<String>,
}

impl CheckDescriptor {
    pub fn run(&self, input: &CheckInput<'_>) -> Evaluation {
        let outcome = (self.evaluate)(input);
        Evaluation {
            check: Check {
                id: self.id.to_string(),
                label: self.label.to_string(),
                status: outcome.status,
                message: outcome.message,
                weight: self.weight,
                priority: self.priority,
            },
            actions: outcome.actions,
        }
    }
}

/// Serializable view of one descriptor, for clients rendering the rubric.
#[derive(Debug, Clone, Serialize)]
pub struct RubricEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub weight: f64,
    pub priority: Priority,
}

#[derive(Debug, Clone)]
pub struct Rubric {
    pub descriptors: Vec<CheckDescriptor>,
    pub thresholds: Thresholds,
}

impl Rubric {
    pub fn new(descriptors: Vec<CheckDescriptor>, thresholds: Thresholds) -> Self {
        Self {
            descriptors,
            thresholds,
        }
    }

    /// The fifteen standard checks, grouped by priority.
    pub fn standard() -> Self {
        Self::with_thresholds(Thresholds::default())
    }

    pub fn with_thresholds(thresholds: Thresholds) -> Self {
        use Priority::*;

        fn d(
            id: &'static str,
            label: &'static str,
            weight: f64,
            priority: Priority,
            evaluate: Evaluator,
        ) -> CheckDescriptor {
            CheckDescriptor {
                id,
                label,
                weight,
                priority,
                evaluate,
            }
        }

        Self::new(
            vec![
                d("contact", "Contact Information", 15.0, Critical, checks::contact),
                d("summary", "Professional Summary", 15.0, Critical, checks::summary),
                d("experience", "Work Experience", 20.0, Critical, checks::experience),
                d("skills", "Skills Section", 15.0, Critical, checks::skills),
                d("action_verbs", "Action Verbs", 10.0, Important, checks::action_verbs),
                d("metrics", "Quantifiable Achievements", 12.0, Important, checks::metrics),
                d("structure", "Bullet Structure", 8.0, Important, checks::structure),
                d("language", "Language Quality", 5.0, Important, checks::language),
                d("description_depth", "Description Depth", 8.0, Important, checks::description_depth),
                d("dates", "Date Consistency", 5.0, Important, checks::dates),
                d("education", "Education", 3.0, NiceToHave, checks::education),
                d("links", "Professional Links", 3.0, NiceToHave, checks::links),
                d("certifications", "Certifications", 2.0, NiceToHave, checks::certifications),
                d("projects", "Projects", 4.0, NiceToHave, checks::projects),
                d("headline", "Headline", 3.0, NiceToHave, checks::headline),
            ],
            thresholds,
        )
    }

    pub fn total_weight(&self) -> f64 {
        self.descriptors.iter().map(|d| d.weight).sum()
    }

    pub fn by_priority(&self, priority: Priority) -> impl Iterator<Item = &CheckDescriptor> {
        self.descriptors.iter().filter(move |d| d.priority == priority)
    }

    pub fn entries(&self) -> Vec<RubricEntry> {
        self.descriptors
            .iter()
            .map(|d| RubricEntry {
                id: d.id,
                label: d.label,
                weight: d.weight,
                priority: d.priority,
            })
            .collect()
    }
}

impl Default for Rubric {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_check_ids_are_unique() {
        let rubric = Rubric::standard();
        let ids: HashSet<_> = rubric.descriptors.iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), rubric.descriptors.len());
    }

    #[test]
    fn test_weights_are_positive() {
        assert!(Rubric::standard().descriptors.iter().all(|d| d.weight > 0.0));
    }

    #[test]
    fn test_critical_checks_carry_half_the_weight() {
        let rubric = Rubric::standard();
        let critical: f64 = rubric.by_priority(Priority::Critical).map(|d| d.weight).sum();
        assert!(
            critical / rubric.total_weight() >= 0.5,
            "critical share was {}",
            critical / rubric.total_weight()
        );
    }

    #[test]
    fn test_critical_checks_are_the_four_core_sections() {
        let rubric = Rubric::standard();
        let ids: Vec<_> = rubric.by_priority(Priority::Critical).map(|d| d.id).collect();
        assert_eq!(ids, vec!["contact", "summary", "experience", "skills"]);
    }

    #[test]
    fn test_total_weight_is_constant() {
        assert_eq!(Rubric::standard().total_weight(), Rubric::standard().total_weight());
        assert_eq!(Rubric::standard().total_weight(), 128.0);
    }

    #[test]
    fn test_entries_mirror_descriptors() {
        let rubric = Rubric::standard();
        let entries = rubric.entries();
        assert_eq!(entries.len(), 15);
        assert_eq!(entries[0].id, "contact");
        assert_eq!(entries[0].priority, Priority::Critical);
    }
}
