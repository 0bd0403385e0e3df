//! Boundary validation for résumé requests.
//!
//! Raw request bodies carry template and status as free strings; they become
//! closed enums here, before anything reaches the service. Every failure is
//! collected, with nested paths such as `experience[1].company`.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::resume::{
    CertificationEntry, EducationEntry, ExperienceEntry, LanguageEntry, NewResume, PersonalInfo,
    ProjectEntry, ResumeContent, ResumePatch, ResumeQuery, ResumeStatus, Skills, Template,
};
use crate::validation::{char_len_between, is_valid_email, FieldErrors};

pub const TITLE_MAX_CHARS: usize = 100;
pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateResumeRequest {
    pub title: Option<String>,
    pub template: Option<String>,
    pub personal_info: Option<PersonalInfo>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub projects: Vec<ProjectEntry>,
    pub skills: Skills,
    pub certifications: Vec<CertificationEntry>,
    pub achievements: Vec<String>,
    pub languages: Vec<LanguageEntry>,
    pub status: Option<String>,
    pub is_public: Option<bool>,
}

/// Anything not named here (owner, id, counters, timestamps) is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateResumeRequest {
    pub title: Option<String>,
    pub template: Option<String>,
    pub personal_info: Option<PersonalInfo>,
    pub experience: Option<Vec<ExperienceEntry>>,
    pub education: Option<Vec<EducationEntry>>,
    pub projects: Option<Vec<ProjectEntry>>,
    pub skills: Option<Skills>,
    pub certifications: Option<Vec<CertificationEntry>>,
    pub achievements: Option<Vec<String>>,
    pub languages: Option<Vec<LanguageEntry>>,
    pub status: Option<String>,
    pub is_public: Option<bool>,
}

/// Query string for the listing endpoint. Numbers arrive as text so a
/// non-numeric value is reported as a field error.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Field checks
// ────────────────────────────────────────────────────────────────────────────

fn check_title(errors: &mut FieldErrors, raw: &str) -> String {
    let title = raw.trim().to_string();
    if !char_len_between(&title, 1, TITLE_MAX_CHARS) {
        errors.push(
            "title",
            format!("Title must be between 1 and {TITLE_MAX_CHARS} characters"),
        );
    }
    title
}

fn check_template(errors: &mut FieldErrors, raw: &str) -> Option<Template> {
    raw.parse::<Template>()
        .map_err(|_| {
            let allowed: Vec<_> = Template::ALL.iter().map(Template::as_str).collect();
            errors.push(
                "template",
                format!("Invalid template selected; expected one of {}", allowed.join(", ")),
            );
        })
        .ok()
}

fn check_status(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<ResumeStatus> {
    raw.parse::<ResumeStatus>()
        .map_err(|_| errors.push(field, "Status must be one of draft, active, archived"))
        .ok()
}

fn require(errors: &mut FieldErrors, field: String, value: &str, label: &str) {
    if value.trim().is_empty() {
        errors.push(field, format!("{label} is required"));
    }
}

fn check_personal_info(errors: &mut FieldErrors, info: PersonalInfo) -> PersonalInfo {
    require(errors, "personal_info.full_name".to_string(), &info.full_name, "Full name");
    if !is_valid_email(info.email.trim()) {
        errors.push("personal_info.email", "Valid email is required");
    }
    PersonalInfo {
        full_name: info.full_name.trim().to_string(),
        email: info.email.trim().to_string(),
        ..info
    }
}

fn check_experience(errors: &mut FieldErrors, entries: &[ExperienceEntry]) {
    for (i, entry) in entries.iter().enumerate() {
        require(errors, format!("experience[{i}].company"), &entry.company, "Company");
        require(errors, format!("experience[{i}].position"), &entry.position, "Position");
        require(errors, format!("experience[{i}].start_date"), &entry.start_date, "Start date");
    }
}

fn check_education(errors: &mut FieldErrors, entries: &[EducationEntry]) {
    for (i, entry) in entries.iter().enumerate() {
        require(errors, format!("education[{i}].institution"), &entry.institution, "Institution");
        require(errors, format!("education[{i}].degree"), &entry.degree, "Degree");
    }
}

fn check_projects(errors: &mut FieldErrors, entries: &[ProjectEntry]) {
    for (i, entry) in entries.iter().enumerate() {
        require(errors, format!("projects[{i}].name"), &entry.name, "Project name");
    }
}

fn check_certifications(errors: &mut FieldErrors, entries: &[CertificationEntry]) {
    for (i, entry) in entries.iter().enumerate() {
        require(errors, format!("certifications[{i}].name"), &entry.name, "Certification name");
    }
}

fn check_languages(errors: &mut FieldErrors, entries: &[LanguageEntry]) {
    for (i, entry) in entries.iter().enumerate() {
        require(errors, format!("languages[{i}].name"), &entry.name, "Language name");
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request validators
// ────────────────────────────────────────────────────────────────────────────

pub fn validate_create(req: CreateResumeRequest) -> Result<NewResume, AppError> {
    let mut errors = FieldErrors::new();

    let title = check_title(&mut errors, req.title.as_deref().unwrap_or_default());
    let template = match req.template.as_deref() {
        Some(raw) => check_template(&mut errors, raw),
        None => {
            errors.push("template", "Template is required");
            None
        }
    };
    let personal_info = match req.personal_info {
        Some(info) => check_personal_info(&mut errors, info),
        None => {
            errors.push("personal_info.full_name", "Full name is required");
            errors.push("personal_info.email", "Valid email is required");
            PersonalInfo::default()
        }
    };
    check_experience(&mut errors, &req.experience);
    check_education(&mut errors, &req.education);
    check_projects(&mut errors, &req.projects);
    check_certifications(&mut errors, &req.certifications);
    check_languages(&mut errors, &req.languages);
    let status = req
        .status
        .as_deref()
        .and_then(|raw| check_status(&mut errors, "status", raw))
        .unwrap_or_default();

    let content = ResumeContent {
        personal_info,
        experience: req.experience,
        education: req.education,
        projects: req.projects,
        skills: req.skills,
        certifications: req.certifications,
        achievements: req.achievements,
        languages: req.languages,
    };

    let new = template.map(|template| NewResume {
        title,
        template,
        content,
        status,
        is_public: req.is_public.unwrap_or(false),
    });
    // A missing template always records an error, so `finish` has already failed by then.
    errors
        .finish(new)?
        .ok_or_else(|| AppError::invalid("template", "Template is required"))
}

pub fn validate_update(req: UpdateResumeRequest) -> Result<ResumePatch, AppError> {
    let mut errors = FieldErrors::new();

    let title = req.title.as_deref().map(|raw| check_title(&mut errors, raw));
    let template = req
        .template
        .as_deref()
        .and_then(|raw| check_template(&mut errors, raw));
    let personal_info = req
        .personal_info
        .map(|info| check_personal_info(&mut errors, info));
    if let Some(entries) = &req.experience {
        check_experience(&mut errors, entries);
    }
    if let Some(entries) = &req.education {
        check_education(&mut errors, entries);
    }
    if let Some(entries) = &req.projects {
        check_projects(&mut errors, entries);
    }
    if let Some(entries) = &req.certifications {
        check_certifications(&mut errors, entries);
    }
    if let Some(entries) = &req.languages {
        check_languages(&mut errors, entries);
    }
    let status = req
        .status
        .as_deref()
        .and_then(|raw| check_status(&mut errors, "status", raw));

    errors.finish(ResumePatch {
        title,
        template,
        personal_info,
        experience: req.experience,
        education: req.education,
        projects: req.projects,
        skills: req.skills,
        certifications: req.certifications,
        achievements: req.achievements,
        languages: req.languages,
        status,
        is_public: req.is_public,
    })
}

fn parse_number(errors: &mut FieldErrors, field: &str, raw: Option<&str>, default: i64) -> i64 {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => default,
        Some(s) => s.parse::<i64>().unwrap_or_else(|_| {
            errors.push(field, format!("{field} must be a whole number"));
            default
        }),
    }
}

/// Page is clamped to at least 1, limit to `1..=MAX_PAGE_LIMIT`. A page whose
/// offset would not fit in an `i64` is rejected.
pub fn validate_list(params: ListParams) -> Result<ResumeQuery, AppError> {
    let mut errors = FieldErrors::new();

    let page = parse_number(&mut errors, "page", params.page.as_deref(), 1).max(1);
    let limit = parse_number(&mut errors, "limit", params.limit.as_deref(), DEFAULT_PAGE_LIMIT)
        .clamp(1, MAX_PAGE_LIMIT);
    let status = params
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .and_then(|raw| check_status(&mut errors, "status", raw));
    let search = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    if (page - 1).checked_mul(limit).is_none() {
        errors.push("page", "page is too large");
    }

    errors.finish(ResumeQuery {
        page,
        limit,
        status,
        search,
    })
}
