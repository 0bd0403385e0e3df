//! Storage seams. `AppState` carries `Arc<dyn HunterStore>` and
//! `Arc<dyn ResumeStore>`; `PgStore` backs both in production.
//!
//! Every résumé method that names a document takes the owner as well and
//! matches on both. A document owned by someone else behaves exactly like a
//! missing one: `None` / `false`, never an error.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::hunter::{Hunter, NewHunter, ProfileChanges};
use crate::models::resume::{
    EngagementRow, NewResume, Resume, ResumePatch, ResumeQuery, ResumeSummary,
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

pub const DUPLICATE_EMAIL_MESSAGE: &str = "A hunter with this email already exists";

#[async_trait]
pub trait HunterStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered (case-insensitive).
    async fn insert(&self, new: NewHunter) -> Result<Hunter, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Hunter>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Hunter>, AppError>;

    /// Hunter plus stored password hash. Only `auth::credentials` calls this.
    async fn find_credentials(&self, email: &str) -> Result<Option<(Hunter, String)>, AppError>;

    async fn record_login(&self, id: Uuid) -> Result<Option<Hunter>, AppError>;

    /// Fails with `Conflict` when a new email collides with another hunter.
    async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Option<Hunter>, AppError>;

    /// Atomically applies one progression award and returns the updated hunter.
    async fn award_experience(&self, id: Uuid) -> Result<Option<Hunter>, AppError>;

    async fn deactivate(&self, id: Uuid) -> Result<Option<Hunter>, AppError>;
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn insert(&self, owner: Uuid, new: NewResume) -> Result<Resume, AppError>;

    /// One page ordered by `last_modified` descending, plus the unpaged match count.
    async fn list_owned(
        &self,
        owner: Uuid,
        query: &ResumeQuery,
    ) -> Result<(Vec<Resume>, i64), AppError>;

    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Resume>, AppError>;

    /// Atomic `views + 1`. Refreshes `last_modified` like any other write.
    async fn record_view(&self, owner: Uuid, id: Uuid) -> Result<Option<Resume>, AppError>;

    /// Atomic `downloads + 1`. Refreshes `last_modified` like any other write.
    async fn record_download(&self, owner: Uuid, id: Uuid) -> Result<Option<Resume>, AppError>;

    /// Applies the patch under a row lock and refreshes `last_modified`.
    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: ResumePatch,
    ) -> Result<Option<Resume>, AppError>;

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError>;

    async fn engagement(&self, owner: Uuid) -> Result<Vec<EngagementRow>, AppError>;

    async fn recent(&self, owner: Uuid, limit: i64) -> Result<Vec<ResumeSummary>, AppError>;
}
