//! Keyword Relevance Graph — candidate keyword → related terms.
//!
//! A keyword is only ever suggested when one of its related terms already
//! shows up in the resume. The fallback list follows the same rule, with
//! broader signals.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RelevanceEntry {
    /// Normalized (lowercase) keyword.
    pub keyword: String,
    /// Display form when title-casing the keyword would be wrong ("CI/CD").
    pub display: Option<String>,
    /// Other spellings that count as the keyword being present.
    pub aliases: Vec<String>,
    pub related: Vec<String>,
}

impl RelevanceEntry {
    pub fn new(keyword: &str, related: &[&str]) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            display: None,
            aliases: Vec::new(),
            related: related.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    pub fn display_as(mut self, display: &str) -> Self {
        self.display = Some(display.to_string());
        self
    }

    pub fn aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_lowercase()).collect();
        self
    }

    pub fn display_name(&self) -> String {
        self.display
            .clone()
            .unwrap_or_else(|| title_case(&self.keyword))
    }

    /// The keyword followed by its aliases.
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.keyword.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RelevanceGraph {
    /// Iterated in order; earlier entries win when the output is capped.
    pub entries: Vec<RelevanceEntry>,
    /// Generic suggestions appended after graph hits, same relevance rule.
    pub fallback: Vec<RelevanceEntry>,
}

impl RelevanceGraph {
    pub fn new(entries: Vec<RelevanceEntry>, fallback: Vec<RelevanceEntry>) -> Self {
        Self { entries, fallback }
    }

    pub fn builtin() -> Self {
        let entries = vec![
            RelevanceEntry::new(
                "docker",
                &[
                    "kubernetes", "container", "containers", "deployment", "deployments",
                    "devops", "aws", "gcp", "azure", "microservices", "ci/cd", "linux",
                ],
            ),
            RelevanceEntry::new(
                "ci/cd",
                &[
                    "deployment", "deployments", "pipeline", "pipelines", "github actions",
                    "jenkins", "gitlab", "devops", "docker", "automation", "release",
                ],
            )
            .display_as("CI/CD")
            .aliases(&["continuous integration", "continuous delivery", "cicd"]),
            RelevanceEntry::new(
                "kubernetes",
                &["docker", "container", "containers", "microservices", "helm", "eks", "gke", "orchestration"],
            )
            .aliases(&["k8s"]),
            RelevanceEntry::new(
                "testing frameworks",
                &["jest", "testing", "unit tests", "unit testing", "cypress", "pytest", "mocha", "tdd", "qa"],
            ),
            RelevanceEntry::new(
                "typescript",
                &["javascript", "react", "node", "node.js", "angular", "vue", "next.js"],
            )
            .display_as("TypeScript"),
            RelevanceEntry::new(
                "graphql",
                &["rest", "api", "apis", "apollo", "react", "node", "node.js"],
            )
            .display_as("GraphQL"),
            RelevanceEntry::new(
                "next.js",
                &["react", "vercel", "ssr", "server-side rendering", "frontend"],
            )
            .display_as("Next.js")
            .aliases(&["nextjs"]),
            RelevanceEntry::new(
                "tailwind",
                &["css", "react", "frontend", "styled-components", "sass", "responsive design"],
            )
            .aliases(&["tailwindcss"]),
            RelevanceEntry::new(
                "redis",
                &["cache", "caching", "database", "postgresql", "postgres", "mongodb", "sessions", "backend"],
            ),
            RelevanceEntry::new(
                "postgresql",
                &["sql", "database", "databases", "mysql", "prisma", "orm", "sqlite"],
            )
            .display_as("PostgreSQL")
            .aliases(&["postgres"]),
            RelevanceEntry::new(
                "mongodb",
                &["nosql", "mongoose", "database", "databases", "express", "mern"],
            )
            .display_as("MongoDB")
            .aliases(&["mongo"]),
            RelevanceEntry::new(
                "aws",
                &["cloud", "ec2", "s3", "lambda", "serverless", "deployment", "docker"],
            )
            .display_as("AWS")
            .aliases(&["amazon web services"]),
            RelevanceEntry::new(
                "terraform",
                &["infrastructure", "aws", "gcp", "azure", "iac", "devops"],
            ),
            RelevanceEntry::new(
                "rest apis",
                &["api", "backend", "express", "microservices", "http", "node.js"],
            )
            .display_as("REST APIs")
            .aliases(&["rest api", "restful"]),
            RelevanceEntry::new(
                "microservices",
                &["docker", "kubernetes", "distributed", "api gateway", "service mesh", "kafka"],
            ),
        ];

        let fallback = vec![
            RelevanceEntry::new(
                "docker",
                &["software", "developer", "engineer", "backend", "server", "application"],
            ),
            RelevanceEntry::new(
                "ci/cd",
                &["software", "developer", "engineer", "release", "deploy", "git"],
            )
            .display_as("CI/CD")
            .aliases(&["continuous integration", "continuous delivery", "cicd"]),
            RelevanceEntry::new(
                "testing frameworks",
                &["software", "developer", "engineer", "code", "bug", "bugs", "quality"],
            ),
            RelevanceEntry::new(
                "cloud services",
                &["deploy", "deployed", "hosting", "server", "servers", "infrastructure", "backend"],
            )
            .aliases(&["aws", "gcp", "azure", "cloud"]),
            RelevanceEntry::new(
                "agile",
                &["team", "teams", "sprint", "sprints", "stakeholders", "collaborated", "jira"],
            )
            .aliases(&["scrum", "kanban"]),
        ];

        Self::new(entries, fallback)
    }
}

impl Default for RelevanceGraph {
    fn default() -> Self {
        Self::builtin()
    }
}

/// "testing frameworks" → "Testing Frameworks".
pub fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("testing frameworks"), "Testing Frameworks");
        assert_eq!(title_case("docker"), "Docker");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_display_name_prefers_override() {
        let graph = RelevanceGraph::builtin();
        let cicd = graph.entries.iter().find(|e| e.keyword == "ci/cd").unwrap();
        assert_eq!(cicd.display_name(), "CI/CD");
        let docker = graph.entries.iter().find(|e| e.keyword == "docker").unwrap();
        assert_eq!(docker.display_name(), "Docker");
    }

    #[test]
    fn test_every_entry_has_related_terms() {
        let graph = RelevanceGraph::builtin();
        for entry in graph.entries.iter().chain(graph.fallback.iter()) {
            assert!(!entry.related.is_empty(), "{} has no related terms", entry.keyword);
            assert!(
                !entry.related.contains(&entry.keyword),
                "{} lists itself as related",
                entry.keyword
            );
        }
    }

    #[test]
    fn test_mongodb_not_related_to_cloud_terms() {
        let graph = RelevanceGraph::builtin();
        let mongo = graph.entries.iter().find(|e| e.keyword == "mongodb").unwrap();
        for term in ["aws", "deployment", "react", "node"] {
            assert!(!mongo.related.iter().any(|r| r == term));
        }
    }
}
