//! Content Normalizer — plain-text views over the rich-text fields of a resume.
//!
//! Purely derived: nothing here mutates the document.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::models::resume::ResumeDocument;

static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"));

/// A tag name must follow `<` or `</` directly; `a < b` is prose, not markup.
static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)(?:\s[^<>]*)?/?>").expect("tag pattern is valid")
});

static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:([a-zA-Z]+)|#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6}));")
        .expect("entity pattern is valid")
});

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static BULLET_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:[-*•–▪◦‣]|\d{1,2}[.)])[ \t]+\S").expect("bullet pattern is valid")
});

/// Tags that never break a word when removed.
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "code", "em", "font", "i", "mark", "s", "small", "span", "strong", "sub",
    "sup", "u",
];

/// Tags replaced by a line break.
const BLOCK_TAGS: &[&str] = &[
    "article", "blockquote", "br", "dd", "div", "dl", "dt", "h1", "h2", "h3", "h4", "h5", "h6",
    "hr", "li", "ol", "p", "pre", "section", "table", "tbody", "td", "th", "thead", "tr", "ul",
];

const ENTITIES: &[(&str, &str)] = &[
    ("amp", "&"),
    ("nbsp", " "),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("bull", "•"),
    ("ndash", "–"),
    ("mdash", "—"),
];

/// Plain-text views derived from one document.
#[derive(Debug, Clone, Default)]
pub struct NormalizedContent {
    /// Lowercase blob: summary + experience descriptions + project descriptions.
    pub text: String,
    /// Markup-free summary, original case.
    pub summary: String,
    /// Markup-free description per experience entry, same order as the document.
    pub experience_descriptions: Vec<String>,
    /// Bullet markers per experience entry, counted on the raw rich text.
    pub experience_bullets: Vec<usize>,
    /// Flattened, lowercased, de-duplicated skill names.
    pub skills: BTreeSet<String>,
    /// Skill groups holding at least one non-blank skill.
    pub skill_categories: usize,
}

impl NormalizedContent {
    /// Character count of the blob, used by the invalid-content guard.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Builds every plain-text view the checks and the gap analyzer need.
pub fn normalize_document(doc: &ResumeDocument) -> NormalizedContent {
    let summary = doc.summary.as_deref().map(strip_markup).unwrap_or_default();

    let experience_descriptions: Vec<String> = doc
        .experience
        .iter()
        .map(|e| e.description.as_deref().map(strip_markup).unwrap_or_default())
        .collect();

    let experience_bullets = doc
        .experience
        .iter()
        .map(|e| e.description.as_deref().map(count_bullets).unwrap_or(0))
        .collect();

    let project_descriptions = doc
        .projects
        .iter()
        .filter_map(|p| p.description.as_deref().map(strip_markup));

    let text = std::iter::once(summary.clone())
        .chain(experience_descriptions.iter().cloned())
        .chain(project_descriptions)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let skills: BTreeSet<String> = doc
        .skills
        .iter()
        .flat_map(|g| g.items.iter())
        .map(|s| normalize_text(s))
        .filter(|s| !s.is_empty())
        .collect();

    let skill_categories = doc
        .skills
        .iter()
        .filter(|g| g.items.iter().any(|s| !s.trim().is_empty()))
        .count();

    NormalizedContent {
        text,
        summary,
        experience_descriptions,
        experience_bullets,
        skills,
        skill_categories,
    }
}

/// Removes markup, decodes common entities and collapses whitespace.
/// Case is preserved.
pub fn strip_markup(raw: &str) -> String {
    let blocks = render_blocks(raw, "");
    WHITESPACE_RE.replace_all(&blocks, " ").trim().to_string()
}

/// `strip_markup` followed by lowercasing: the form pattern matchers work on.
pub fn normalize_text(raw: &str) -> String {
    strip_markup(raw).to_lowercase()
}

/// Counts bullet markers in a rich-text field: `<li>` items plus lines that
/// start with a bullet glyph, a dash/asterisk, or `1.` / `1)` numbering.
pub fn count_bullets(raw: &str) -> usize {
    let blocks = render_blocks(raw, "• ");
    BULLET_LINE_RE.find_iter(&blocks).count()
}

/// Turns block-level tags into line breaks, drops inline tags and decodes
/// entities. `<li>` becomes a new line prefixed with `li_marker`.
///
/// Repeated until nothing changes, so escaped markup (`&amp;lt;p&amp;gt;`)
/// ends up in the same form it would have had unescaped and a second pass
/// over the output is a no-op. Each round either shortens the text or
/// removes a `<`, so the loop terminates.
fn render_blocks(raw: &str, li_marker: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let without_comments = COMMENT_RE.replace_all(&current, " ");
        let without_tags = strip_tags(&without_comments, li_marker);
        let next = decode_entities(&without_tags);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn strip_tags(text: &str, li_marker: &str) -> String {
    TAG_RE
        .replace_all(text, |caps: &Captures| {
            let closing = !caps[1].is_empty();
            let name = caps[2].to_ascii_lowercase();
            if name == "li" && !closing {
                format!("\n{li_marker}")
            } else if INLINE_TAGS.contains(&name.as_str()) {
                String::new()
            } else if BLOCK_TAGS.contains(&name.as_str()) {
                "\n".to_string()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Single left-to-right pass: text produced by one replacement is never
/// decoded again within the same pass. Unknown entities are left alone.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let decoded = if let Some(name) = caps.get(1) {
                ENTITIES
                    .iter()
                    .find(|(entity, _)| *entity == name.as_str())
                    .map(|(_, replacement)| replacement.to_string())
            } else if let Some(dec) = caps.get(2) {
                dec.as_str()
                    .parse::<u32>()
                    .ok()
                    .and_then(char::from_u32)
                    .map(String::from)
            } else {
                caps.get(3)
                    .and_then(|hex| u32::from_str_radix(hex.as_str(), 16).ok())
                    .and_then(char::from_u32)
                    .map(String::from)
            };
            decoded.unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
