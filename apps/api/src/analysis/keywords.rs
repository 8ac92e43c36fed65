//! Keyword Gap Analyzer — relevant-but-missing keyword suggestions.
//!
//! A keyword is suggested only if it is absent from the resume in every
//! spelling AND at least one of its related terms is present. Fallback
//! entries go through the same filter.

use std::collections::HashSet;

use crate::analysis::normalizer::NormalizedContent;
use crate::analysis::patterns::contains_term;
use crate::analysis::relevance::{RelevanceEntry, RelevanceGraph};

/// Up to `limit` display-ready keywords, graph hits first, then fallback.
pub fn find_missing_keywords(
    graph: &RelevanceGraph,
    content: &NormalizedContent,
    limit: usize,
) -> Vec<String> {
    let text_tokens = token_canonicals(&content.text);
    let skill_tokens: Vec<Vec<String>> =
        content.skills.iter().map(|s| token_canonicals(s)).collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut missing = Vec::new();

    for entry in graph.entries.iter().chain(graph.fallback.iter()) {
        if missing.len() >= limit {
            break;
        }
        let key = canonical(&entry.keyword);
        if seen.contains(&key) {
            continue;
        }
        if is_present(entry, content, &text_tokens, &skill_tokens) {
            seen.insert(key);
            continue;
        }
        if !is_relevant(entry, content) {
            continue;
        }
        seen.insert(key);
        missing.push(entry.display_name());
    }

    missing
}

/// Present in any spelling, in the blob or in a listed skill. A spelling
/// matches as a whole term, or as one whitespace-delimited token once case
/// and punctuation are ignored ("nextjs" for "Next.js"). Matches never span
/// a gap between words.
fn is_present(
    entry: &RelevanceEntry,
    content: &NormalizedContent,
    text_tokens: &[String],
    skill_tokens: &[Vec<String>],
) -> bool {
    entry.spellings().any(|spelling| {
        let compact = canonical(spelling);
        let token_hit = |tokens: &[String]| !compact.is_empty() && tokens.contains(&compact);

        contains_term(&content.text, spelling)
            || token_hit(text_tokens)
            || content.skills.iter().any(|skill| contains_term(skill, spelling))
            || skill_tokens.iter().any(|tokens| token_hit(tokens.as_slice()))
    })
}

fn token_canonicals(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(canonical)
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_relevant(entry: &RelevanceEntry, content: &NormalizedContent) -> bool {
    entry.related.iter().any(|term| {
        contains_term(&content.text, term) || content.skills.iter().any(|s| contains_term(s, term))
    })
}

/// Lowercase alphanumerics only: "CI/CD" → "cicd", "Next.js" → "nextjs".
fn canonical(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
