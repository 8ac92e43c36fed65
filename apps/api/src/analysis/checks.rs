//! Check evaluators. Each is a pure function of the `CheckInput` and returns
//! exactly one `Outcome`; registration (id, weight, priority) lives in
//! `rubric.rs`.

use crate::analysis::patterns::{contains_term, VerbTheme};
use crate::analysis::rubric::{CheckInput, Outcome};
use crate::models::resume::is_present;

// ────────────────────────────────────────────────────────────────────────────
// Priority 1
// ────────────────────────────────────────────────────────────────────────────

pub fn contact(input: &CheckInput<'_>) -> Outcome {
    let profile = &input.document.profile;
    let fields = [
        ("name", profile.has_name()),
        ("email", is_present(&profile.email)),
        ("phone number", is_present(&profile.phone)),
        ("location", is_present(&profile.location)),
    ];
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();
    let present = fields.len() - missing.len();

    let outcome = match present {
        4 => return Outcome::pass("Name, email, phone and location are all present"),
        3 => Outcome::warning(format!("Contact details missing: {}", missing.join(", "))),
        _ => Outcome::fail(format!(
            "Only {present} of 4 contact details present (missing {})",
            missing.join(", ")
        )),
    };
    outcome.with_actions(missing.iter().map(|m| format!("Add your {m} to the profile")))
}

pub fn summary(input: &CheckInput<'_>) -> Outcome {
    let t = input.thresholds;
    let summary = &input.content.summary;
    let len = summary.chars().count();
    let lower = summary.to_lowercase();
    let has_years = input.facts.summary_has_years;
    let has_skill = input.content.skills.iter().any(|s| contains_term(&lower, s));
    let in_range = (t.summary_min_chars..=t.summary_max_chars).contains(&len);

    if in_range && has_years && has_skill {
        return Outcome::pass(format!(
            "Summary is {len} characters and mentions experience and key skills"
        ));
    }

    let mut actions = Vec::new();
    if len < t.summary_min_chars {
        actions.push(format!(
            "Expand your summary to {}–{} characters",
            t.summary_min_chars, t.summary_max_chars
        ));
    } else if len > t.summary_max_chars {
        actions.push(format!(
            "Tighten your summary to under {} characters",
            t.summary_max_chars
        ));
    }
    if !has_years {
        actions.push("Mention your years of experience in the summary (e.g. \"5+ years\")".to_string());
    }
    if !has_skill {
        actions.push("Reference two or three of your core skills in the summary".to_string());
    }

    let outcome = if len == 0 {
        Outcome::fail("No professional summary")
    } else if len >= t.summary_warning_chars {
        Outcome::warning(format!("Summary is {len} characters but could be stronger"))
    } else {
        Outcome::fail(format!("Summary is too short ({len} characters)"))
    };
    outcome.with_actions(actions)
}

pub fn experience(input: &CheckInput<'_>) -> Outcome {
    let t = input.thresholds;
    let count = input.document.experience.len();
    let described = input
        .content
        .experience_descriptions
        .iter()
        .filter(|d| d.chars().count() > t.experience_description_chars)
        .count();

    if count >= t.experience_entries && described >= t.experience_entries {
        Outcome::pass(format!("{count} roles, {described} with detailed descriptions"))
    } else if count >= 1 {
        let mut outcome = Outcome::warning(format!(
            "{count} role(s) listed, {described} with detailed descriptions"
        ));
        if count < t.experience_entries {
            outcome = outcome.with_action("Add more relevant roles, internships or freelance work");
        }
        if described < t.experience_entries {
            outcome = outcome
                .with_action("Describe each role in more detail: scope, technologies and results");
        }
        outcome
    } else {
        Outcome::fail("No work experience listed")
            .with_action("Add your work experience with a description for each role")
    }
}

pub fn skills(input: &CheckInput<'_>) -> Outcome {
    let t = input.thresholds;
    let count = input.content.skills.len();
    let categories = input.content.skill_categories;

    if count >= t.skills_pass && categories >= t.skill_categories {
        Outcome::pass(format!("{count} skills across {categories} categories"))
    } else if count >= t.skills_warning {
        let mut outcome =
            Outcome::warning(format!("{count} skills across {categories} categories"));
        if count < t.skills_pass {
            outcome = outcome.with_action(format!("List at least {} relevant skills", t.skills_pass));
        }
        if categories < t.skill_categories {
            outcome = outcome
                .with_action("Group skills into categories such as Languages, Frameworks and Tools");
        }
        outcome
    } else {
        Outcome::fail(format!("Only {count} skills listed")).with_action(format!(
            "List at least {} relevant skills grouped into categories",
            t.skills_pass
        ))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Priority 2
// ────────────────────────────────────────────────────────────────────────────

pub fn action_verbs(input: &CheckInput<'_>) -> Outcome {
    let t = input.thresholds;
    let found = input.facts.matched_verbs.len();
    if found >= t.verbs_pass {
        return Outcome::pass(format!("{found} distinct action verbs used"));
    }

    let suggestions: Vec<String> = [VerbTheme::Leadership, VerbTheme::Technical, VerbTheme::Achievement]
        .into_iter()
        .filter_map(|theme| {
            input
                .library
                .verbs_for(theme)
                .iter()
                .find(|v| !input.facts.matched_verbs.contains(*v))
        })
        .map(|v| capitalize(v))
        .collect();
    let action = if suggestions.is_empty() {
        "Start each bullet with a strong action verb".to_string()
    } else {
        format!(
            "Start each bullet with a strong action verb such as {}",
            suggestions.join(", ")
        )
    };

    let outcome = if found >= t.verbs_warning {
        Outcome::warning(format!("Only {found} distinct action verbs used"))
    } else {
        Outcome::fail(format!("{found} action verbs found"))
    };
    outcome.with_action(action)
}

pub fn metrics(input: &CheckInput<'_>) -> Outcome {
    let t = input.thresholds;
    let found = input.facts.metric_count;
    if found >= t.metrics_pass {
        let kinds: Vec<&str> = input
            .library
            .metric_kinds_found(&input.content.text)
            .into_iter()
            .map(|k| k.label())
            .collect();
        Outcome::pass(format!(
            "{found} quantified achievements ({})",
            kinds.join(", ")
        ))
    } else if found >= 1 {
        Outcome::warning(format!("Only {found} quantified achievement(s)"))
            .with_action("Quantify more results with percentages, amounts or counts")
    } else {
        Outcome::fail("No quantified achievements found").with_action(
            "Add measurable results (e.g. \"reduced load time by 40%\", \"served 10,000 users\")",
        )
    }
}

pub fn structure(input: &CheckInput<'_>) -> Outcome {
    let t = input.thresholds;
    let entries = input.content.experience_bullets.len();
    if entries == 0 {
        return Outcome::warning("No experience entries to structure")
            .with_action("Use bullet points when you add experience entries");
    }

    let total: usize = input.content.experience_bullets.iter().sum();
    let average = total as f64 / entries as f64;
    if average >= t.bullets_per_entry_pass {
        Outcome::pass(format!("{average:.1} bullet points per role on average"))
    } else if average >= t.bullets_per_entry_warning {
        Outcome::warning(format!("{average:.1} bullet points per role on average"))
            .with_action(format!(
                "Aim for at least {} bullet points per role",
                t.bullets_per_entry_pass
            ))
    } else {
        Outcome::fail("Experience descriptions have no bullet points")
            .with_action("Break experience descriptions into bullet points")
    }
}

pub fn language(input: &CheckInput<'_>) -> Outcome {
    let t = input.thresholds;
    let total = input.facts.weak_phrase_total();
    if total == 0 {
        return Outcome::pass("No weak or passive phrases found");
    }

    let phrases: Vec<String> = input
        .facts
        .weak_phrases
        .iter()
        .take(3)
        .map(|(p, _)| format!("\"{p}\""))
        .collect();
    let action = format!("Replace {} with action verbs", phrases.join(", "));

    let outcome = if total <= t.weak_phrases_warning {
        Outcome::warning(format!("{total} weak phrase(s) found"))
    } else {
        Outcome::fail(format!("{total} weak phrases found"))
    };
    outcome.with_action(action)
}

pub fn description_depth(input: &CheckInput<'_>) -> Outcome {
    let t = input.thresholds;
    let descriptions = &input.content.experience_descriptions;
    let average = if descriptions.is_empty() {
        0
    } else {
        descriptions.iter().map(|d| d.chars().count()).sum::<usize>() / descriptions.len()
    };

    if average >= t.description_avg_pass {
        Outcome::pass(format!("Role descriptions average {average} characters"))
    } else if average >= t.description_avg_warning {
        Outcome::warning(format!("Role descriptions average {average} characters"))
            .with_action("Add more context to each role: scope, stack and outcomes")
    } else {
        Outcome::fail(format!("Role descriptions average only {average} characters"))
            .with_action(format!(
                "Write at least {} characters per role description",
                t.description_avg_pass
            ))
    }
}

pub fn dates(input: &CheckInput<'_>) -> Outcome {
    let entries = &input.document.experience;
    if entries.is_empty() {
        return Outcome::warning("No experience dates to check");
    }

    let undated = entries.iter().filter(|e| !e.is_dated()).count();
    if undated == 0 {
        Outcome::pass("Every role has a start date and an end date or is marked current")
    } else if undated * 2 <= entries.len() {
        Outcome::warning(format!("{undated} role(s) missing dates"))
            .with_action("Add start and end dates to every role (or mark it as current)")
    } else {
        Outcome::fail(format!("{undated} of {} roles missing dates", entries.len()))
            .with_action("Add start and end dates to every role (or mark it as current)")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Priority 3 — presence only, absence is a warning
// ────────────────────────────────────────────────────────────────────────────

pub fn education(input: &CheckInput<'_>) -> Outcome {
    let n = input.document.education.len();
    if n > 0 {
        Outcome::pass(format!("{n} education entr{}", if n == 1 { "y" } else { "ies" }))
    } else {
        Outcome::warning("No education listed").with_action("Add your education or relevant training")
    }
}

pub fn links(input: &CheckInput<'_>) -> Outcome {
    let n = input.document.profile.links().len();
    if n > 0 {
        Outcome::pass(format!("{n} professional link(s)"))
    } else {
        Outcome::warning("No LinkedIn, GitHub or portfolio link")
            .with_action("Add a LinkedIn, GitHub or portfolio link")
    }
}

pub fn certifications(input: &CheckInput<'_>) -> Outcome {
    let n = input.document.certifications.len();
    if n > 0 {
        Outcome::pass(format!("{n} certification(s)"))
    } else {
        Outcome::warning("No certifications listed")
            .with_action("Add relevant certifications if you have any")
    }
}

pub fn projects(input: &CheckInput<'_>) -> Outcome {
    let n = input.document.projects.len();
    if n > 0 {
        Outcome::pass(format!("{n} project(s)"))
    } else {
        Outcome::warning("No projects listed")
            .with_action("Showcase one or two projects with a link and tech stack")
    }
}

pub fn headline(input: &CheckInput<'_>) -> Outcome {
    if is_present(&input.document.profile.headline) {
        Outcome::pass("Headline present")
    } else {
        Outcome::warning("No headline").with_action("Add a headline that states your target role")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
