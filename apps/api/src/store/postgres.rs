use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::hunters::progression::{apply_experience_gain, Progression};
use crate::models::hunter::{Hunter, NewHunter, ProfileChanges};
use crate::models::resume::{
    EngagementRow, NewResume, Resume, ResumeContent, ResumePatch, ResumeQuery, ResumeSummary,
};
use crate::store::{HunterStore, ResumeStore, DUPLICATE_EMAIL_MESSAGE};

const HUNTER_COLUMNS: &str = "id, name, email, avatar, rank, level, experience, is_active, \
                              last_login, created_at, updated_at";

const RESUME_COLUMNS: &str = "id, user_id, title, template, content, status, is_public, views, \
                              downloads, last_modified, created_at, updated_at";

// Status and title filters shared by the page query and the count query.
const RESUME_FILTER: &str = "user_id = $1 \
                             AND ($2::text IS NULL OR status = $2) \
                             AND ($3::text IS NULL OR strpos(lower(title), lower($3)) > 0)";

/// PostgreSQL-backed hunter and résumé store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Row types
// ────────────────────────────────────────────────────────────────────────────

#[derive(FromRow)]
struct HunterRow {
    id: Uuid,
    name: String,
    email: String,
    avatar: String,
    rank: String,
    level: i32,
    experience: i32,
    is_active: bool,
    last_login: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<HunterRow> for Hunter {
    type Error = AppError;

    fn try_from(row: HunterRow) -> Result<Self, Self::Error> {
        Ok(Hunter {
            id: row.id,
            name: row.name,
            email: row.email,
            avatar: row.avatar,
            rank: row.rank.parse().map_err(|e: String| anyhow!(e))?,
            level: row.level,
            experience: row.experience,
            is_active: row.is_active,
            last_login: row.last_login,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    hunter: HunterRow,
    password_hash: String,
}

#[derive(FromRow)]
struct ResumeRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    template: String,
    content: Json<ResumeContent>,
    status: String,
    is_public: bool,
    views: i64,
    downloads: i64,
    last_modified: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ResumeRow> for Resume {
    type Error = AppError;

    fn try_from(row: ResumeRow) -> Result<Self, Self::Error> {
        Ok(Resume {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            template: row.template.parse().map_err(|e: String| anyhow!(e))?,
            content: row.content.0,
            status: row.status.parse().map_err(|e: String| anyhow!(e))?,
            is_public: row.is_public,
            views: row.views,
            downloads: row.downloads,
            last_modified: row.last_modified,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct SummaryRow {
    id: Uuid,
    title: String,
    template: String,
    status: String,
    last_modified: DateTime<Utc>,
    views: i64,
    downloads: i64,
}

impl TryFrom<SummaryRow> for ResumeSummary {
    type Error = AppError;

    fn try_from(row: SummaryRow) -> Result<Self, Self::Error> {
        Ok(ResumeSummary {
            id: row.id,
            title: row.title,
            template: row.template.parse().map_err(|e: String| anyhow!(e))?,
            status: row.status.parse().map_err(|e: String| anyhow!(e))?,
            last_modified: row.last_modified,
            views: row.views,
            downloads: row.downloads,
        })
    }
}

#[derive(FromRow)]
struct EngagementDbRow {
    status: String,
    views: i64,
    downloads: i64,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EngagementDbRow> for EngagementRow {
    type Error = AppError;

    fn try_from(row: EngagementDbRow) -> Result<Self, Self::Error> {
        Ok(EngagementRow {
            status: row.status.parse().map_err(|e: String| anyhow!(e))?,
            views: row.views,
            downloads: row.downloads,
            updated_at: row.updated_at,
        })
    }
}

fn hunter_from(row: Option<HunterRow>) -> Result<Option<Hunter>, AppError> {
    row.map(Hunter::try_from).transpose()
}

fn resume_from(row: Option<ResumeRow>) -> Result<Option<Resume>, AppError> {
    row.map(Resume::try_from).transpose()
}

fn map_unique_violation(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string())
        }
        _ => AppError::Database(err),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Hunters
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl HunterStore for PgStore {
    async fn insert(&self, new: NewHunter) -> Result<Hunter, AppError> {
        let row: HunterRow = sqlx::query_as(&format!(
            "INSERT INTO hunters (id, name, email, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING {HUNTER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Hunter>, AppError> {
        let row = sqlx::query_as(&format!(
            "SELECT {HUNTER_COLUMNS} FROM hunters WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        hunter_from(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Hunter>, AppError> {
        let row = sqlx::query_as(&format!(
            "SELECT {HUNTER_COLUMNS} FROM hunters WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        hunter_from(row)
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<(Hunter, String)>, AppError> {
        let row: Option<CredentialRow> = sqlx::query_as(&format!(
            "SELECT {HUNTER_COLUMNS}, password_hash FROM hunters WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((Hunter::try_from(r.hunter)?, r.password_hash))),
            None => Ok(None),
        }
    }

    async fn record_login(&self, id: Uuid) -> Result<Option<Hunter>, AppError> {
        let row = sqlx::query_as(&format!(
            "UPDATE hunters SET last_login = NOW(), updated_at = NOW() \
             WHERE id = $1 RETURNING {HUNTER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        hunter_from(row)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Option<Hunter>, AppError> {
        let row = sqlx::query_as(&format!(
            "UPDATE hunters SET \
                 name = COALESCE($2, name), \
                 email = COALESCE($3, email), \
                 avatar = COALESCE($4, avatar), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {HUNTER_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.avatar)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        hunter_from(row)
    }

    async fn award_experience(&self, id: Uuid) -> Result<Option<Hunter>, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<HunterRow> = sqlx::query_as(&format!(
            "SELECT {HUNTER_COLUMNS} FROM hunters WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = hunter_from(row)? else {
            return Ok(None);
        };
        let next = apply_experience_gain(Progression::of(&current));

        let updated: HunterRow = sqlx::query_as(&format!(
            "UPDATE hunters SET level = $2, experience = $3, rank = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING {HUNTER_COLUMNS}"
        ))
        .bind(id)
        .bind(next.level)
        .bind(next.experience)
        .bind(next.rank.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated.try_into()?))
    }

    async fn deactivate(&self, id: Uuid) -> Result<Option<Hunter>, AppError> {
        let row = sqlx::query_as(&format!(
            "UPDATE hunters SET is_active = FALSE, updated_at = NOW() \
             WHERE id = $1 RETURNING {HUNTER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        hunter_from(row)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Résumés
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl ResumeStore for PgStore {
    async fn insert(&self, owner: Uuid, new: NewResume) -> Result<Resume, AppError> {
        let row: ResumeRow = sqlx::query_as(&format!(
            "INSERT INTO resumes (id, user_id, title, template, content, status, is_public) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {RESUME_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&new.title)
        .bind(new.template.as_str())
        .bind(Json(&new.content))
        .bind(new.status.as_str())
        .bind(new.is_public)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list_owned(
        &self,
        owner: Uuid,
        query: &ResumeQuery,
    ) -> Result<(Vec<Resume>, i64), AppError> {
        let status = query.status.map(|s| s.as_str());
        let search = query.search.as_deref();

        let rows: Vec<ResumeRow> = sqlx::query_as(&format!(
            "SELECT {RESUME_COLUMNS} FROM resumes WHERE {RESUME_FILTER} \
             ORDER BY last_modified DESC, id LIMIT $4 OFFSET $5"
        ))
        .bind(owner)
        .bind(status)
        .bind(search)
        .bind(query.limit)
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM resumes WHERE {RESUME_FILTER}"))
                .bind(owner)
                .bind(status)
                .bind(search)
                .fetch_one(&self.pool)
                .await?;

        let resumes = rows
            .into_iter()
            .map(Resume::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((resumes, total))
    }

    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Resume>, AppError> {
        let row = sqlx::query_as(&format!(
            "SELECT {RESUME_COLUMNS} FROM resumes WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        resume_from(row)
    }

    async fn record_view(&self, owner: Uuid, id: Uuid) -> Result<Option<Resume>, AppError> {
        let row = sqlx::query_as(&format!(
            "UPDATE resumes SET views = views + 1, last_modified = NOW(), updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 RETURNING {RESUME_COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        resume_from(row)
    }

    async fn record_download(&self, owner: Uuid, id: Uuid) -> Result<Option<Resume>, AppError> {
        let row = sqlx::query_as(&format!(
            "UPDATE resumes SET downloads = downloads + 1, last_modified = NOW(), updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 RETURNING {RESUME_COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        resume_from(row)
    }

    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: ResumePatch,
    ) -> Result<Option<Resume>, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as(&format!(
            "SELECT {RESUME_COLUMNS} FROM resumes WHERE id = $1 AND user_id = $2 FOR UPDATE"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut resume) = resume_from(row)? else {
            return Ok(None);
        };
        patch.apply(&mut resume);

        let updated: ResumeRow = sqlx::query_as(&format!(
            "UPDATE resumes SET \
                 title = $3, template = $4, content = $5, status = $6, is_public = $7, \
                 last_modified = NOW(), updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 RETURNING {RESUME_COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .bind(&resume.title)
        .bind(resume.template.as_str())
        .bind(Json(&resume.content))
        .bind(resume.status.as_str())
        .bind(resume.is_public)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated.try_into()?))
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn engagement(&self, owner: Uuid) -> Result<Vec<EngagementRow>, AppError> {
        let rows: Vec<EngagementDbRow> = sqlx::query_as(
            "SELECT status, views, downloads, updated_at FROM resumes WHERE user_id = $1",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(EngagementRow::try_from).collect()
    }

    async fn recent(&self, owner: Uuid, limit: i64) -> Result<Vec<ResumeSummary>, AppError> {
        let rows: Vec<SummaryRow> = sqlx::query_as(
            "SELECT id, title, template, status, last_modified, views, downloads \
             FROM resumes WHERE user_id = $1 \
             ORDER BY last_modified DESC, id LIMIT $2",
        )
        .bind(owner)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ResumeSummary::try_from).collect()
    }
}
