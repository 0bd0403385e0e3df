use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Closed variant sets
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    ShadowHunter,
    IronWarrior,
    AssassinBlade,
    ShadowMonarch,
}

impl Template {
    pub const ALL: [Template; 4] = [
        Template::ShadowHunter,
        Template::IronWarrior,
        Template::AssassinBlade,
        Template::ShadowMonarch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Template::ShadowHunter => "shadow-hunter",
            Template::IronWarrior => "iron-warrior",
            Template::AssassinBlade => "assassin-blade",
            Template::ShadowMonarch => "shadow-monarch",
        }
    }
}

impl FromStr for Template {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown template '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

impl ResumeStatus {
    pub const ALL: [ResumeStatus; 3] = [
        ResumeStatus::Draft,
        ResumeStatus::Active,
        ResumeStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResumeStatus::Draft => "draft",
            ResumeStatus::Active => "active",
            ResumeStatus::Archived => "archived",
        }
    }
}

impl FromStr for ResumeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResumeStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown status '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Advanced,
    Native,
}

// ────────────────────────────────────────────────────────────────────────────
// Document content
// ────────────────────────────────────────────────────────────────────────────
//
// Every content struct defaults its fields so a missing required value reaches
// validation as an empty string and is reported per field.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_current_job: bool,
    pub description: Option<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub gpa: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub name: String,
    pub description: Option<String>,
    pub technologies: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub url: Option<String>,
    pub github_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub technical: Vec<String>,
    pub languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub tools: Vec<String>,
    pub soft: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationEntry {
    pub name: String,
    pub issuer: Option<String>,
    pub date: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageEntry {
    pub name: String,
    pub proficiency: Option<Proficiency>,
}

/// Everything in a résumé that the owner authors. Stored as one JSONB column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeContent {
    pub personal_info: PersonalInfo,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub projects: Vec<ProjectEntry>,
    pub skills: Skills,
    pub certifications: Vec<CertificationEntry>,
    pub achievements: Vec<String>,
    pub languages: Vec<LanguageEntry>,
}

// ────────────────────────────────────────────────────────────────────────────
// Documents
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template: Template,
    #[serde(flatten)]
    pub content: ResumeContent,
    pub status: ResumeStatus,
    pub is_public: bool,
    pub views: i64,
    pub downloads: i64,
    /// Refreshed by content writes only; counter bumps leave it alone.
    pub last_modified: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    /// Refreshed by every write, counters included.
    pub updated_at: DateTime<Utc>,
}

/// Validated insert payload. Owner, id, counters and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewResume {
    pub title: String,
    pub template: Template,
    pub content: ResumeContent,
    pub status: ResumeStatus,
    pub is_public: bool,
}

/// Validated partial update. Only these fields are mutable after creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumePatch {
    pub title: Option<String>,
    pub template: Option<Template>,
    pub personal_info: Option<PersonalInfo>,
    pub experience: Option<Vec<ExperienceEntry>>,
    pub education: Option<Vec<EducationEntry>>,
    pub projects: Option<Vec<ProjectEntry>>,
    pub skills: Option<Skills>,
    pub certifications: Option<Vec<CertificationEntry>>,
    pub achievements: Option<Vec<String>>,
    pub languages: Option<Vec<LanguageEntry>>,
    pub status: Option<ResumeStatus>,
    pub is_public: Option<bool>,
}

impl ResumePatch {
    /// Merges the patch into `resume`. Timestamps are the store's business.
    pub fn apply(self, resume: &mut Resume) {
        let content = &mut resume.content;
        if let Some(title) = self.title {
            resume.title = title;
        }
        if let Some(template) = self.template {
            resume.template = template;
        }
        if let Some(personal_info) = self.personal_info {
            content.personal_info = personal_info;
        }
        if let Some(experience) = self.experience {
            content.experience = experience;
        }
        if let Some(education) = self.education {
            content.education = education;
        }
        if let Some(projects) = self.projects {
            content.projects = projects;
        }
        if let Some(skills) = self.skills {
            content.skills = skills;
        }
        if let Some(certifications) = self.certifications {
            content.certifications = certifications;
        }
        if let Some(achievements) = self.achievements {
            content.achievements = achievements;
        }
        if let Some(languages) = self.languages {
            content.languages = languages;
        }
        if let Some(status) = self.status {
            resume.status = status;
        }
        if let Some(is_public) = self.is_public {
            resume.is_public = is_public;
        }
    }
}

/// Listing filter, already validated and clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeQuery {
    pub page: i64,
    pub limit: i64,
    pub status: Option<ResumeStatus>,
    pub search: Option<String>,
}

impl ResumeQuery {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Exact status match plus case-insensitive title substring.
    pub fn matches(&self, resume: &Resume) -> bool {
        let status_ok = self.status.map_or(true, |s| resume.status == s);
        let search_ok = self.search.as_ref().map_or(true, |needle| {
            resume.title.to_lowercase().contains(&needle.to_lowercase())
        });
        status_ok && search_ok
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumePage {
    pub data: Vec<Resume>,
    pub pagination: Pagination,
}

/// Dashboard card: the document without its content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeSummary {
    pub id: Uuid,
    pub title: String,
    pub template: Template,
    pub status: ResumeStatus,
    pub last_modified: DateTime<Utc>,
    pub views: i64,
    pub downloads: i64,
}

impl From<&Resume> for ResumeSummary {
    fn from(resume: &Resume) -> Self {
        ResumeSummary {
            id: resume.id,
            title: resume.title.clone(),
            template: resume.template,
            status: resume.status,
            last_modified: resume.last_modified,
            views: resume.views,
            downloads: resume.downloads,
        }
    }
}

/// The per-document columns the aggregation reporter scans.
#[derive(Debug, Clone, PartialEq)]
pub struct EngagementRow {
    pub status: ResumeStatus,
    pub views: i64,
    pub downloads: i64,
    pub updated_at: DateTime<Utc>,
}
