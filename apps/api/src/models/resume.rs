use serde::{Deserialize, Serialize};

/// The resume document as produced by the editor. Read-only to the analyzer.
///
/// Every list defaults to empty and every scalar to `None`, so `{}` is a valid
/// (empty) document and checks never branch on null-vs-empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub profile: Profile,
    pub summary: Option<String>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<CertificationEntry>,
    pub skills: Vec<SkillGroup>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub headline: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

impl Profile {
    pub fn has_name(&self) -> bool {
        is_present(&self.first_name) || is_present(&self.last_name)
    }

    /// Professional links that are actually filled in.
    pub fn links(&self) -> Vec<&str> {
        [&self.website, &self.linkedin, &self.github]
            .into_iter()
            .filter_map(|l| l.as_deref().map(str::trim))
            .filter(|l| !l.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: bool,
    /// Rich text (may contain HTML list markup).
    pub description: Option<String>,
}

impl ExperienceEntry {
    /// A role is fully dated when it has a start date and either an end date
    /// or is flagged as current.
    pub fn is_dated(&self) -> bool {
        is_present(&self.start_date) && (self.current || is_present(&self.end_date))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub repo_url: Option<String>,
    pub tech_stack: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificationEntry {
    pub name: Option<String>,
    pub issuer: Option<String>,
    pub date: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillGroup {
    pub category: Option<String>,
    pub items: Vec<String>,
}

/// Blank and whitespace-only strings count as absent.
pub fn is_present(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}
