//! Axum route handlers for registration, login and the current hunter.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CurrentHunter;
use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::models::hunter::Hunter;
use crate::state::AppState;
use crate::validation::{check_email, check_name, normalize_email, FieldErrors, PASSWORD_MIN_CHARS};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub hunter: Hunter,
}

/// Registration input after boundary validation.
#[derive(Debug, PartialEq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub fn validate_registration(req: RegisterRequest) -> Result<Registration, AppError> {
    let mut errors = FieldErrors::new();
    let name = check_name(&mut errors, "name", &req.name);
    let email = check_email(&mut errors, "email", &req.email);
    if req.password.chars().count() < PASSWORD_MIN_CHARS {
        errors.push(
            "password",
            format!("Password must be at least {PASSWORD_MIN_CHARS} characters"),
        );
    }
    errors.finish(Registration {
        name,
        email,
        password: req.password,
    })
}

fn validate_login(req: &LoginRequest) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    check_email(&mut errors, "email", &req.email);
    if req.password.is_empty() {
        errors.push("password", "Password is required");
    }
    errors.finish(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let registration = validate_registration(req)?;
    let hunter = state
        .credentials()
        .create(registration.name, registration.email, registration.password)
        .await?;
    let token = state.tokens.issue(hunter.id)?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, hunter })))
}

/// POST /api/v1/auth/login
///
/// Unknown email, wrong password and a deactivated account all get the same
/// `Unauthorized` answer.
pub async fn handle_login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    validate_login(&req)?;
    let email = normalize_email(&req.email);

    let hunter = match state.credentials().verify(&email, req.password).await? {
        Some((hunter, true)) if hunter.is_active => hunter,
        _ => return Err(AppError::Unauthorized),
    };

    let hunter = state
        .hunters
        .record_login(hunter.id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    let token = state.tokens.issue(hunter.id)?;
    info!("Hunter {} logged in", hunter.id);

    Ok(Json(AuthResponse { token, hunter }))
}

/// GET /api/v1/auth/me
pub async fn handle_me(Extension(CurrentHunter(hunter)): Extension<CurrentHunter>) -> Json<Hunter> {
    Json(hunter)
}
