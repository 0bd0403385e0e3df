//! Owner-scoped résumé operations.
//!
//! Every function takes the requesting hunter's id and passes it to the store
//! alongside the document id. A document owned by someone else is reported
//! exactly like a missing one: `NotFound`, never `Forbidden`.

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{
    NewResume, Pagination, Resume, ResumePage, ResumePatch, ResumeQuery, ResumeStatus,
};
use crate::resumes::validation::TITLE_MAX_CHARS;
use crate::store::{HunterStore, ResumeStore};

const COPY_SUFFIX: &str = " (Copy)";

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Resume {id} not found"))
}

/// Title for a duplicate, trimmed so the suffix still fits the title limit.
pub fn copy_title(title: &str) -> String {
    let room = TITLE_MAX_CHARS - COPY_SUFFIX.chars().count();
    let base: String = title.chars().take(room).collect();
    format!("{}{COPY_SUFFIX}", base.trim_end())
}

pub async fn list_resumes(
    store: &dyn ResumeStore,
    owner: Uuid,
    query: ResumeQuery,
) -> Result<ResumePage, AppError> {
    let (data, total) = store.list_owned(owner, &query).await?;
    let pages = (total + query.limit - 1) / query.limit;

    Ok(ResumePage {
        data,
        pagination: Pagination {
            page: query.page,
            limit: query.limit,
            total,
            pages,
        },
    })
}

/// Counts a view before returning the document.
pub async fn get_resume(store: &dyn ResumeStore, owner: Uuid, id: Uuid) -> Result<Resume, AppError> {
    store
        .record_view(owner, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Persists the document, then awards the owner experience. The award is a
/// separate write; if it fails the résumé still stands and the failure is logged.
pub async fn create_resume(
    resumes: &dyn ResumeStore,
    hunters: &dyn HunterStore,
    owner: Uuid,
    new: NewResume,
) -> Result<Resume, AppError> {
    let resume = resumes.insert(owner, new).await?;
    info!("Hunter {owner} created resume {}", resume.id);

    match hunters.award_experience(owner).await {
        Ok(Some(hunter)) => info!(
            "Hunter {owner} now level {} ({} xp, {})",
            hunter.level, hunter.experience, hunter.rank
        ),
        Ok(None) => warn!("Experience award skipped: hunter {owner} vanished"),
        Err(e) => warn!("Experience award failed for hunter {owner}: {e}"),
    }

    Ok(resume)
}

pub async fn update_resume(
    store: &dyn ResumeStore,
    owner: Uuid,
    id: Uuid,
    patch: ResumePatch,
) -> Result<Resume, AppError> {
    store
        .update_owned(owner, id, patch)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn delete_resume(store: &dyn ResumeStore, owner: Uuid, id: Uuid) -> Result<(), AppError> {
    if !store.delete_owned(owner, id).await? {
        return Err(not_found(id));
    }
    info!("Hunter {owner} deleted resume {id}");
    Ok(())
}

/// Copies content into a fresh draft with zeroed counters. Awards no experience.
pub async fn duplicate_resume(
    store: &dyn ResumeStore,
    owner: Uuid,
    id: Uuid,
) -> Result<Resume, AppError> {
    let source = store
        .find_owned(owner, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let copy = store
        .insert(
            owner,
            NewResume {
                title: copy_title(&source.title),
                template: source.template,
                content: source.content,
                status: ResumeStatus::Draft,
                is_public: source.is_public,
            },
        )
        .await?;

    info!("Hunter {owner} duplicated resume {id} into {}", copy.id);
    Ok(copy)
}

pub async fn record_download(
    store: &dyn ResumeStore,
    owner: Uuid,
    id: Uuid,
) -> Result<Resume, AppError> {
    store
        .record_download(owner, id)
        .await?
        .ok_or_else(|| not_found(id))
}
