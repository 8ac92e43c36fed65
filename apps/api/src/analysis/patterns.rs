//! Pattern Library — action verbs, weak phrases, metric and placeholder
//! detectors. All tables are data handed to the engine; check logic never
//! names a verb or a phrase directly.

use std::collections::{BTreeSet, HashSet};

use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbTheme {
    Leadership,
    Achievement,
    Technical,
    ProblemSolving,
    Collaboration,
    Delivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Percentage,
    Currency,
    Multiplier,
    CountedEntity,
    Comparative,
}

impl MetricKind {
    pub fn label(self) -> &'static str {
        match self {
            MetricKind::Percentage => "percentages",
            MetricKind::Currency => "amounts",
            MetricKind::Multiplier => "multipliers",
            MetricKind::CountedEntity => "counts",
            MetricKind::Comparative => "before/after comparisons",
        }
    }
}

const ACTION_VERBS: &[(VerbTheme, &[&str])] = &[
    (
        VerbTheme::Leadership,
        &[
            "led", "managed", "directed", "mentored", "supervised", "coordinated", "headed",
            "oversaw", "spearheaded", "orchestrated",
        ],
    ),
    (
        VerbTheme::Achievement,
        &[
            "achieved", "increased", "improved", "reduced", "exceeded", "accelerated", "boosted",
            "generated", "saved", "doubled",
        ],
    ),
    (
        VerbTheme::Technical,
        &[
            "built", "developed", "engineered", "designed", "architected", "implemented",
            "automated", "deployed", "integrated", "programmed", "migrated", "optimized",
        ],
    ),
    (
        VerbTheme::ProblemSolving,
        &[
            "resolved", "debugged", "diagnosed", "analyzed", "troubleshot", "streamlined",
            "refactored", "overhauled", "solved", "investigated",
        ],
    ),
    (
        VerbTheme::Collaboration,
        &[
            "collaborated", "partnered", "facilitated", "negotiated", "presented", "trained",
            "communicated", "advised",
        ],
    ),
    (
        VerbTheme::Delivery,
        &[
            "launched", "shipped", "released", "delivered", "executed", "established", "created",
            "initiated", "introduced",
        ],
    ),
];

const WEAK_PHRASES: &[&str] = &[
    "responsible for",
    "helped with",
    "assisted in",
    "assisted with",
    "worked on",
    "was involved in",
    "participated in",
    "duties included",
    "tasked with",
];

const METRIC_PATTERNS: &[(MetricKind, &str)] = &[
    (MetricKind::Percentage, r"\d+(?:\.\d+)?\s?%"),
    (
        MetricKind::Currency,
        r"[$€£]\s?\d[\d,]*(?:\.\d+)?\s?(?:k|m|b|million|billion)?\b",
    ),
    (MetricKind::Multiplier, r"\b\d+(?:\.\d+)?x\b"),
    (
        MetricKind::CountedEntity,
        r"\b\d[\d,.]*[km]?\+?\s+(?:users|customers|clients|team members|engineers|developers|people|projects|applications|services|requests|downloads|members|stakeholders|students)\b",
    ),
    (
        MetricKind::Comparative,
        r"\b(?:increased|reduced|improved|decreased|boosted|cut|grew|accelerated|lowered)\b[^.]{0,40}?\bby\s+\d",
    ),
];

const YEARS_PATTERN: &str = r"\b\d+\+?\s*(?:years?|yrs?)\b";

const PLACEHOLDER_MARKERS: &[&str] = &[
    "lorem ipsum",
    "dolor sit amet",
    "your name here",
    "your company here",
    "job title here",
    "insert text here",
    "placeholder text",
    "sample description",
    "[your ",
];

#[derive(Debug, Clone)]
struct MetricPattern {
    kind: MetricKind,
    regex: Regex,
}

/// Swappable detection tables. `builtin()` is the default English set.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    action_verbs: Vec<(VerbTheme, Vec<String>)>,
    weak_phrases: Vec<String>,
    metric_patterns: Vec<MetricPattern>,
    years_pattern: Regex,
    placeholder_markers: Vec<String>,
}

impl PatternLibrary {
    /// Compiles a library from caller-supplied tables. Terms are lowercased;
    /// regex patterns run against lowercase text.
    pub fn new(
        action_verbs: Vec<(VerbTheme, Vec<String>)>,
        weak_phrases: Vec<String>,
        metric_patterns: &[(MetricKind, &str)],
        years_pattern: &str,
        placeholder_markers: Vec<String>,
    ) -> Result<Self, regex::Error> {
        let metric_patterns = metric_patterns
            .iter()
            .map(|(kind, pattern)| {
                Ok(MetricPattern {
                    kind: *kind,
                    regex: Regex::new(pattern)?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self {
            action_verbs: action_verbs
                .into_iter()
                .map(|(theme, verbs)| (theme, verbs.iter().map(|v| v.to_lowercase()).collect()))
                .collect(),
            weak_phrases: weak_phrases.iter().map(|p| p.to_lowercase()).collect(),
            metric_patterns,
            years_pattern: Regex::new(years_pattern)?,
            placeholder_markers: placeholder_markers.iter().map(|m| m.to_lowercase()).collect(),
        })
    }

    pub fn builtin() -> Self {
        Self::new(
            ACTION_VERBS
                .iter()
                .map(|(theme, verbs)| (*theme, verbs.iter().map(|v| v.to_string()).collect()))
                .collect(),
            WEAK_PHRASES.iter().map(|p| p.to_string()).collect(),
            METRIC_PATTERNS,
            YEARS_PATTERN,
            PLACEHOLDER_MARKERS.iter().map(|m| m.to_string()).collect(),
        )
        .expect("built-in pattern tables compile")
    }

    pub fn verbs(&self) -> impl Iterator<Item = &str> {
        self.action_verbs
            .iter()
            .flat_map(|(_, verbs)| verbs.iter().map(String::as_str))
    }

    pub fn verbs_for(&self, theme: VerbTheme) -> &[String] {
        self.action_verbs
            .iter()
            .find(|(t, _)| *t == theme)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    /// Distinct action verbs present as whole words in `text` (lowercase).
    pub fn matched_verbs(&self, text: &str) -> BTreeSet<String> {
        let words: HashSet<&str> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        self.verbs()
            .filter(|v| words.contains(v))
            .map(str::to_string)
            .collect()
    }

    /// Weak phrases found in `text`, with their occurrence counts.
    pub fn weak_phrase_hits(&self, text: &str) -> Vec<(String, usize)> {
        self.weak_phrases
            .iter()
            .map(|p| (p.clone(), count_term(text, p)))
            .filter(|(_, n)| *n > 0)
            .collect()
    }

    /// Sum of matches over every metric pattern. Uncapped.
    pub fn metric_count(&self, text: &str) -> usize {
        self.metric_patterns
            .iter()
            .map(|p| p.regex.find_iter(text).count())
            .sum()
    }

    pub fn metric_kinds_found(&self, text: &str) -> Vec<MetricKind> {
        self.metric_patterns
            .iter()
            .filter(|p| p.regex.is_match(text))
            .map(|p| p.kind)
            .collect()
    }

    /// True for "5 years", "10+ yrs" and similar.
    pub fn has_years_of_experience(&self, text: &str) -> bool {
        self.years_pattern.is_match(&text.to_lowercase())
    }

    pub fn placeholder_marker(&self, text: &str) -> Option<&str> {
        self.placeholder_markers
            .iter()
            .find(|m| text.contains(m.as_str()))
            .map(String::as_str)
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Whole-term containment. Boundaries are only enforced on edges where the
/// term itself starts or ends with an alphanumeric character, so "ci/cd"
/// and "c++" match as expected.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    count_term(haystack, term) > 0
}

pub fn count_term(haystack: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }
    let starts_alnum = term.chars().next().is_some_and(char::is_alphanumeric);
    let ends_alnum = term.chars().last().is_some_and(char::is_alphanumeric);

    haystack
        .match_indices(term)
        .filter(|(idx, _)| {
            let before_ok = !starts_alnum
                || haystack[..*idx]
                    .chars()
                    .last()
                    .map_or(true, |c| !c.is_alphanumeric());
            let after_ok = !ends_alnum
                || haystack[idx + term.len()..]
                    .chars()
                    .next()
                    .map_or(true, |c| !c.is_alphanumeric());
            before_ok && after_ok
        })
        .count()
}
