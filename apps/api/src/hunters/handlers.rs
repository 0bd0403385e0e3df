//! Axum route handlers for the authenticated hunter's own profile.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CurrentHunter;
use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::models::hunter::{Hunter, ProfileChanges, Rank};
use crate::models::resume::ResumeSummary;
use crate::resumes::stats::{activity_for, stats_for, ActivityDay, ResumeStats, DASHBOARD_ACTIVITY_DAYS};
use crate::state::AppState;
use crate::validation::{check_email, check_name, FieldErrors};

pub const DASHBOARD_RECENT_RESUMES: i64 = 5;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Only these fields are writable through the profile route. Rank, level,
/// experience and the activity flag are ignored if sent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub hunter: Hunter,
    pub stats: ResumeStats,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub recent_resumes: Vec<ResumeSummary>,
    pub activity: Vec<ActivityDay>,
    pub level: i32,
    pub rank: Rank,
    pub experience: i32,
}

pub fn validate_profile_update(req: UpdateProfileRequest) -> Result<ProfileChanges, AppError> {
    let mut errors = FieldErrors::new();
    let name = req.name.map(|raw| check_name(&mut errors, "name", &raw));
    let email = req.email.map(|raw| check_email(&mut errors, "email", &raw));
    errors.finish(ProfileChanges {
        name,
        email,
        avatar: None,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/users/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Extension(CurrentHunter(hunter)): Extension<CurrentHunter>,
) -> Result<Json<ProfileResponse>, AppError> {
    let stats = stats_for(state.resumes.as_ref(), hunter.id).await?;
    Ok(Json(ProfileResponse { hunter, stats }))
}

/// PUT /api/v1/users/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Extension(CurrentHunter(hunter)): Extension<CurrentHunter>,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<Json<Hunter>, AppError> {
    let changes = validate_profile_update(req)?;
    let updated = state
        .hunters
        .update_profile(hunter.id, changes)
        .await?
        .ok_or(AppError::Unauthorized)?;

    info!("Hunter {} updated profile", updated.id);
    Ok(Json(updated))
}

/// POST /api/v1/users/deactivate
///
/// Tokens already issued to this hunter stop working at the gate.
pub async fn handle_deactivate(
    State(state): State<AppState>,
    Extension(CurrentHunter(hunter)): Extension<CurrentHunter>,
) -> Result<Json<Hunter>, AppError> {
    let deactivated = state
        .hunters
        .deactivate(hunter.id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    info!("Hunter {} deactivated", deactivated.id);
    Ok(Json(deactivated))
}

/// GET /api/v1/users/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Extension(CurrentHunter(hunter)): Extension<CurrentHunter>,
) -> Result<Json<DashboardResponse>, AppError> {
    let recent_resumes = state
        .resumes
        .recent(hunter.id, DASHBOARD_RECENT_RESUMES)
        .await?;
    let activity = activity_for(state.resumes.as_ref(), hunter.id, DASHBOARD_ACTIVITY_DAYS).await?;

    Ok(Json(DashboardResponse {
        recent_resumes,
        activity,
        level: hunter.level,
        rank: hunter.rank,
        experience: hunter.experience,
    }))
}
