//! The access gate: the single place a bearer token becomes a hunter.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::errors::AppError;
use crate::models::hunter::Hunter;
use crate::state::AppState;

/// The authenticated hunter, placed in request extensions by `require_hunter`.
#[derive(Debug, Clone)]
pub struct CurrentHunter(pub Hunter);

/// Extracts `<token>` from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// Missing token, bad or expired token, unknown hunter and inactive hunter all
/// collapse into `Unauthorized`. Store failures stay internal errors.
pub async fn resolve_hunter(state: &AppState, headers: &HeaderMap) -> Result<Hunter, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;

    let hunter_id = state.tokens.verify(token).map_err(|e| {
        debug!("Rejected bearer token: {e}");
        AppError::Unauthorized
    })?;

    match state.hunters.find_by_id(hunter_id).await? {
        Some(hunter) if hunter.is_active => Ok(hunter),
        _ => {
            debug!("Token for missing or inactive hunter {hunter_id}");
            Err(AppError::Unauthorized)
        }
    }
}

/// Middleware for every authenticated route.
pub async fn require_hunter(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let hunter = resolve_hunter(&state, request.headers()).await?;
    request.extensions_mut().insert(CurrentHunter(hunter));
    Ok(next.run(request).await)
}
