//! Analysis Orchestrator — the single public entry point of the engine.
//!
//! Flow: normalize → derive facts → content guard → run rubric →
//!       aggregate → keyword gaps → improvement plan.
//!
//! Pure and total: no I/O, no clock, no shared mutable state. Identical
//! input yields an identical `AnalysisResult`.

use once_cell::sync::Lazy;
use tracing::debug;

use crate::analysis::aggregate::aggregate;
use crate::analysis::keywords::find_missing_keywords;
use crate::analysis::normalizer::{normalize_document, NormalizedContent};
use crate::analysis::patterns::PatternLibrary;
use crate::analysis::plan::build_plan;
use crate::analysis::relevance::RelevanceGraph;
use crate::analysis::rubric::{CheckInput, DerivedFacts, Evaluation, Rubric};
use crate::models::analysis::{AnalysisResult, Check, CheckStatus, Priority, ScoreStatus};
use crate::models::resume::ResumeDocument;

/// Suggested in place of keywords when the content is unusable.
pub const REQUIRED_SECTIONS: &[&str] = &[
    "Contact Information",
    "Professional Summary",
    "Work Experience",
    "Skills",
];

#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    /// Blob length below which the content is treated as invalid.
    pub min_content_chars: usize,
    pub keyword_limit: usize,
    pub plan_limit: usize,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            min_content_chars: 200,
            keyword_limit: 6,
            plan_limit: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ContentProblem {
    Placeholder(String),
    TooShort(usize),
}

/// Holds the injected tables; cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Analyzer {
    library: PatternLibrary,
    graph: RelevanceGraph,
    rubric: Rubric,
    settings: AnalyzerSettings,
}

static DEFAULT_ANALYZER: Lazy<Analyzer> = Lazy::new(Analyzer::default);

/// Analyzes a document with the built-in tables and default settings.
pub fn analyze(document: &ResumeDocument) -> AnalysisResult {
    DEFAULT_ANALYZER.analyze(document)
}

impl Analyzer {
    pub fn new(
        library: PatternLibrary,
        graph: RelevanceGraph,
        rubric: Rubric,
        settings: AnalyzerSettings,
    ) -> Self {
        Self {
            library,
            graph,
            rubric,
            settings,
        }
    }

    /// Built-in tables with custom limits.
    pub fn with_settings(settings: AnalyzerSettings) -> Self {
        Self::new(
            PatternLibrary::builtin(),
            RelevanceGraph::builtin(),
            Rubric::standard(),
            settings,
        )
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    pub fn analyze(&self, document: &ResumeDocument) -> AnalysisResult {
        let content = normalize_document(document);
        let facts = DerivedFacts::derive(&content, &self.library);
        let input = CheckInput {
            document,
            content: &content,
            facts: &facts,
            library: &self.library,
            thresholds: &self.rubric.thresholds,
        };

        if let Some(problem) = self.content_problem(document, &content) {
            debug!("Resume content rejected: {:?}", problem);
            return self.invalid_result(&problem, &input);
        }

        let evaluations: Vec<Evaluation> = self
            .rubric
            .descriptors
            .iter()
            .map(|descriptor| descriptor.run(&input))
            .collect();
        let checks: Vec<Check> = evaluations.iter().map(|e| e.check.clone()).collect();

        let (score, status) = aggregate(&checks);
        let missing_keywords =
            find_missing_keywords(&self.graph, &content, self.settings.keyword_limit);
        let improvement_plan = build_plan(&evaluations, self.settings.plan_limit);

        debug!(
            "Resume analyzed: score={} status={:?} failing={} missing_keywords={}",
            score,
            status,
            checks.iter().filter(|c| c.status != CheckStatus::Pass).count(),
            missing_keywords.len()
        );

        AnalysisResult {
            score,
            status,
            checks,
            missing_keywords,
            improvement_plan,
        }
    }

    fn content_problem(
        &self,
        document: &ResumeDocument,
        content: &NormalizedContent,
    ) -> Option<ContentProblem> {
        let marker = self
            .library
            .placeholder_marker(&content.text)
            .or_else(|| self.library.placeholder_marker(&short_fields(document)));
        if let Some(marker) = marker {
            return Some(ContentProblem::Placeholder(marker.to_string()));
        }
        let len = content.char_len();
        if len < self.settings.min_content_chars {
            return Some(ContentProblem::TooShort(len));
        }
        None
    }

    /// Score 0, the content check first, then the critical checks so the
    /// user still sees which core sections are missing.
    fn invalid_result(&self, problem: &ContentProblem, input: &CheckInput<'_>) -> AnalysisResult {
        let (message, action) = match problem {
            ContentProblem::Placeholder(marker) => (
                format!("Placeholder text detected (\"{marker}\")"),
                "Replace placeholder text with your real experience and summary".to_string(),
            ),
            ContentProblem::TooShort(len) => (
                format!(
                    "Not enough content to analyze ({len} of at least {} characters)",
                    self.settings.min_content_chars
                ),
                "Add a summary and describe your experience and projects".to_string(),
            ),
        };

        let mut evaluations = vec![Evaluation {
            check: Check {
                id: "content".to_string(),
                label: "Invalid Content".to_string(),
                status: CheckStatus::Fail,
                message,
                weight: 1.0,
                priority: Priority::Critical,
            },
            actions: vec![action],
        }];
        evaluations.extend(
            self.rubric
                .by_priority(Priority::Critical)
                .map(|descriptor| descriptor.run(input)),
        );

        AnalysisResult {
            score: 0,
            status: ScoreStatus::Poor,
            checks: evaluations.iter().map(|e| e.check.clone()).collect(),
            missing_keywords: REQUIRED_SECTIONS.iter().map(|s| s.to_string()).collect(),
            improvement_plan: build_plan(&evaluations, self.settings.plan_limit),
        }
    }
}

/// Lowercased one-line fields where template values tend to survive:
/// profile strings plus entry titles and organisations.
fn short_fields(document: &ResumeDocument) -> String {
    let p = &document.profile;
    let profile = [
        &p.first_name,
        &p.last_name,
        &p.headline,
        &p.email,
        &p.phone,
        &p.location,
        &p.website,
        &p.linkedin,
        &p.github,
    ];
    let experience = document
        .experience
        .iter()
        .flat_map(|e| [&e.title, &e.company, &e.location]);
    let projects = document.projects.iter().map(|project| &project.title);
    let education = document
        .education
        .iter()
        .flat_map(|e| [&e.institution, &e.degree]);

    profile
        .into_iter()
        .chain(experience)
        .chain(projects)
        .chain(education)
        .filter_map(|f| f.as_deref())
        .collect::<Vec<_>>()
        .join(" | ")
        .to_lowercase()
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::with_settings(AnalyzerSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::Impact;
    use crate::models::resume::{
        CertificationEntry, EducationEntry, ExperienceEntry, Profile, ProjectEntry, SkillGroup,
    };

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn check<'a>(result: &'a AnalysisResult, id: &str) -> &'a Check {
        result
            .checks
            .iter()
            .find(|c| c.id == id)
            .unwrap_or_else(|| panic!("no check {id}"))
    }

    fn role(title: &str, start: &str, end: Option<&str>, current: bool, bullets: &[&str]) -> ExperienceEntry {
        let items: String = bullets.iter().map(|b| format!("<li>{b}</li>")).collect();
        ExperienceEntry {
            title: s(title),
            company: s("Northwind"),
            location: s("Remote"),
            start_date: s(start),
            end_date: end.map(str::to_string),
            current,
            description: Some(format!("<ul>{items}</ul>")),
        }
    }

    fn strong_document() -> ResumeDocument {
        ResumeDocument {
            profile: Profile {
                first_name: s("Ada"),
                last_name: s("Lovelace"),
                headline: s("Senior Backend Engineer"),
                email: s("ada@example.com"),
                phone: s("+44 20 7946 0000"),
                location: s("London, UK"),
                linkedin: s("https://linkedin.com/in/ada"),
                github: s("https://github.com/ada"),
                ..Default::default()
            },
            summary: s(
                "Senior backend engineer with 5+ years of experience designing Rust and Go \
                 services for payments, focused on reliability and fast delivery.",
            ),
            experience: vec![
                role(
                    "Senior Engineer",
                    "2021-02",
                    None,
                    true,
                    &[
                        "Led a team of 6 engineers rebuilding the settlement pipeline in Rust",
                        "Reduced p99 latency by 45% by redesigning the ledger storage layer",
                        "Architected an event-driven reconciliation service processing $2M daily",
                    ],
                ),
                role(
                    "Backend Engineer",
                    "2019-01",
                    Some("2021-01"),
                    false,
                    &[
                        "Built the public REST API used by 1,200 clients across Europe",
                        "Automated release tooling, cutting deploy time from hours to minutes",
                        "Mentored four junior developers through weekly code review and pair programming sessions",
                    ],
                ),
                role(
                    "Software Engineer",
                    "2017-06",
                    Some("2018-12"),
                    false,
                    &[
                        "Launched the merchant onboarding flow that grew signups by 30%",
                        "Optimized PostgreSQL queries, making monthly reports 3x faster",
                        "Collaborated with product and design teams to ship the redesigned billing dashboard",
                    ],
                ),
            ],
            projects: vec![ProjectEntry {
                title: s("ledgerkit"),
                description: s("Open-source double-entry bookkeeping library in Rust"),
                repo_url: s("https://github.com/ada/ledgerkit"),
                tech_stack: vec!["Rust".to_string()],
                ..Default::default()
            }],
            education: vec![EducationEntry {
                institution: s("University of London"),
                degree: s("BSc"),
                field: s("Computer Science"),
                ..Default::default()
            }],
            certifications: vec![CertificationEntry {
                name: s("AWS Certified Developer"),
                issuer: s("Amazon"),
                ..Default::default()
            }],
            skills: vec![
                SkillGroup {
                    category: s("Languages"),
                    items: ["Rust", "Go", "Python", "SQL", "TypeScript"]
                        .iter()
                        .map(|v| v.to_string())
                        .collect(),
                },
                SkillGroup {
                    category: s("Tools"),
                    items: ["Docker", "Kubernetes", "PostgreSQL", "Kafka", "Terraform"]
                        .iter()
                        .map(|v| v.to_string())
                        .collect(),
                },
            ],
        }
    }

    #[test]
    fn test_empty_document_is_invalid_with_core_checks_failing() {
        let result = analyze(&ResumeDocument::default());
        assert_eq!(result.score, 0);
        assert_eq!(result.status, ScoreStatus::Poor);
        assert_eq!(result.checks[0].id, "content");
        for id in ["contact", "summary", "experience"] {
            assert_eq!(check(&result, id).status, CheckStatus::Fail, "{id}");
        }
        assert_eq!(result.missing_keywords, REQUIRED_SECTIONS.to_vec());
        assert_eq!(result.improvement_plan[0].impact, Impact::High);
    }

    #[test]
    fn test_strong_document_scores_excellent() {
        let result = analyze(&strong_document());
        assert!(result.score >= 85, "score was {}: {:#?}", result.score, result.checks);
        assert_eq!(result.status, ScoreStatus::Excellent);
        for c in result.checks.iter().filter(|c| c.priority == Priority::Critical) {
            assert_eq!(c.status, CheckStatus::Pass, "{}: {}", c.id, c.message);
        }
        assert!(result
            .improvement_plan
            .iter()
            .all(|item| item.impact != Impact::High));
    }

    #[test]
    fn test_missing_keywords_follow_related_terms() {
        let doc = ResumeDocument {
            experience: vec![ExperienceEntry {
                title: s("Frontend Engineer"),
                start_date: s("2022-01"),
                current: true,
                description: s(
                    "Built React dashboards and Node services for the analytics team. Owned the \
                     deployment of every release to AWS and monitored each production rollout. \
                     Improved page load times by 35% and onboarded 40 customers to the platform.",
                ),
                ..Default::default()
            }],
            skills: vec![SkillGroup {
                category: s("Stack"),
                items: vec!["React".to_string(), "Node".to_string(), "TypeScript".to_string()],
            }],
            ..Default::default()
        };

        let result = analyze(&doc);
        assert_ne!(result.checks[0].id, "content", "content was rejected");
        assert!(
            result
                .missing_keywords
                .iter()
                .any(|k| k == "Docker" || k == "CI/CD"),
            "{:?}",
            result.missing_keywords
        );
        assert!(!result.missing_keywords.iter().any(|k| k == "MongoDB"));
        assert!(result.missing_keywords.len() <= 6);
    }

    #[test]
    fn test_placeholder_content_scores_zero() {
        let mut doc = strong_document();
        doc.summary = s("Lorem ipsum dolor sit amet, consectetur adipiscing elit.");
        let result = analyze(&doc);
        assert_eq!(result.score, 0);
        assert_eq!(result.status, ScoreStatus::Poor);
        assert_eq!(result.checks[0].id, "content");
        assert!(result.checks[0].message.contains("Placeholder"));
    }

    #[test]
    fn test_placeholder_in_profile_fields_scores_zero() {
        let mut doc = strong_document();
        doc.profile.first_name = s("Your Name Here");
        let result = analyze(&doc);
        assert_eq!(result.score, 0);
        assert_eq!(result.checks[0].id, "content");
        assert!(result.checks[0].message.contains("your name here"), "{}", result.checks[0].message);

        let mut doc = strong_document();
        doc.experience[1].company = s("Your Company Here");
        assert_eq!(analyze(&doc).score, 0);

        let mut doc = strong_document();
        doc.profile.headline = s("[Your headline]");
        assert_eq!(analyze(&doc).score, 0);
    }

    #[test]
    fn test_current_role_without_end_date_passes_dates() {
        let doc = strong_document();
        assert!(doc.experience[0].current && doc.experience[0].end_date.is_none());
        let result = analyze(&doc);
        assert_eq!(check(&result, "dates").status, CheckStatus::Pass);
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let doc = strong_document();
        let first = analyze(&doc);
        let second = analyze(&doc);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_score_in_range_for_partial_documents() {
        let mut partial = strong_document();
        partial.skills.clear();
        partial.education.clear();
        partial.profile.phone = None;
        let docs = [ResumeDocument::default(), strong_document(), partial];
        for doc in &docs {
            let result = analyze(doc);
            assert!(result.score <= 100);
        }
    }

    #[test]
    fn test_full_rubric_runs_on_valid_content() {
        let result = analyze(&strong_document());
        assert_eq!(result.checks.len(), Rubric::standard().descriptors.len());
    }

    #[test]
    fn test_weaker_document_scores_lower() {
        let strong = analyze(&strong_document());
        let mut weaker = strong_document();
        weaker.skills.truncate(1);
        weaker.skills[0].items.truncate(3);
        let weak = analyze(&weaker);
        assert!(weak.score < strong.score);
        assert_eq!(check(&weak, "skills").status, CheckStatus::Fail);
        assert!(weak
            .improvement_plan
            .iter()
            .any(|p| p.impact == Impact::High && p.action.contains("skills")));
    }

    #[test]
    fn test_custom_min_content_setting() {
        let analyzer = Analyzer::with_settings(AnalyzerSettings {
            min_content_chars: 10_000,
            ..Default::default()
        });
        let result = analyzer.analyze(&strong_document());
        assert_eq!(result.score, 0);
        assert!(result.checks[0].message.contains("Not enough content"));
    }
}
