//! Axum route handlers for the résumé API. Every route sits behind the
//! access gate; the owner is always the authenticated hunter.

use axum::{extract::State, http::StatusCode, Extension, Json};
use uuid::Uuid;

use crate::auth::CurrentHunter;
use crate::errors::AppError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::resume::{Resume, ResumePage};
use crate::resumes::service;
use crate::resumes::validation::{
    validate_create, validate_list, validate_update, CreateResumeRequest, ListParams,
    UpdateResumeRequest,
};
use crate::state::AppState;

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    Extension(CurrentHunter(hunter)): Extension<CurrentHunter>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<ResumePage>, AppError> {
    let query = validate_list(params)?;
    let page = service::list_resumes(state.resumes.as_ref(), hunter.id, query).await?;
    Ok(Json(page))
}

/// POST /api/v1/resumes
pub async fn handle_create(
    State(state): State<AppState>,
    Extension(CurrentHunter(hunter)): Extension<CurrentHunter>,
    ApiJson(req): ApiJson<CreateResumeRequest>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let new = validate_create(req)?;
    let resume =
        service::create_resume(state.resumes.as_ref(), state.hunters.as_ref(), hunter.id, new)
            .await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Extension(CurrentHunter(hunter)): Extension<CurrentHunter>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Resume>, AppError> {
    let resume = service::get_resume(state.resumes.as_ref(), hunter.id, id).await?;
    Ok(Json(resume))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Extension(CurrentHunter(hunter)): Extension<CurrentHunter>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateResumeRequest>,
) -> Result<Json<Resume>, AppError> {
    let patch = validate_update(req)?;
    let resume = service::update_resume(state.resumes.as_ref(), hunter.id, id, patch).await?;
    Ok(Json(resume))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Extension(CurrentHunter(hunter)): Extension<CurrentHunter>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    service::delete_resume(state.resumes.as_ref(), hunter.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/resumes/:id/duplicate
pub async fn handle_duplicate(
    State(state): State<AppState>,
    Extension(CurrentHunter(hunter)): Extension<CurrentHunter>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let copy = service::duplicate_resume(state.resumes.as_ref(), hunter.id, id).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// POST /api/v1/resumes/:id/download
pub async fn handle_download(
    State(state): State<AppState>,
    Extension(CurrentHunter(hunter)): Extension<CurrentHunter>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Resume>, AppError> {
    let resume = service::record_download(state.resumes.as_ref(), hunter.id, id).await?;
    Ok(Json(resume))
}
