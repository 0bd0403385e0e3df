//! In-memory store used by the service and router tests. Mirrors the
//! Postgres semantics: owner-matched lookups, atomic counters, and a
//! case-insensitive unique email.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::errors::AppError;
use crate::hunters::progression::{apply_experience_gain, Progression};
use crate::models::hunter::{Hunter, NewHunter, ProfileChanges, Rank};
use crate::models::resume::{
    EngagementRow, NewResume, Resume, ResumePatch, ResumeQuery, ResumeSummary,
};
use crate::store::{HunterStore, ResumeStore, DUPLICATE_EMAIL_MESSAGE};

#[derive(Default)]
pub struct MemoryStore {
    hunters: RwLock<HashMap<Uuid, (Hunter, String)>>,
    resumes: RwLock<HashMap<Uuid, Resume>>,
    last_tick: Mutex<Option<DateTime<Utc>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strictly increasing clock so ordering by timestamp is deterministic.
    async fn tick(&self) -> DateTime<Utc> {
        let mut last = self.last_tick.lock().await;
        let now = match *last {
            Some(prev) if Utc::now() <= prev => prev + Duration::microseconds(1),
            _ => Utc::now(),
        };
        *last = Some(now);
        now
    }

    fn email_taken(
        hunters: &HashMap<Uuid, (Hunter, String)>,
        email: &str,
        except: Option<Uuid>,
    ) -> bool {
        hunters
            .values()
            .any(|(h, _)| h.email.eq_ignore_ascii_case(email) && Some(h.id) != except)
    }

    async fn bump_counter(
        &self,
        owner: Uuid,
        id: Uuid,
        bump: fn(&mut Resume),
    ) -> Result<Option<Resume>, AppError> {
        let now = self.tick().await;
        let mut resumes = self.resumes.write().await;
        Ok(resumes
            .get_mut(&id)
            .filter(|r| r.user_id == owner)
            .map(|resume| {
                bump(resume);
                resume.last_modified = now;
                resume.updated_at = now;
                resume.clone()
            }))
    }
}

#[async_trait]
impl HunterStore for MemoryStore {
    async fn insert(&self, new: NewHunter) -> Result<Hunter, AppError> {
        let now = self.tick().await;
        let mut hunters = self.hunters.write().await;
        if Self::email_taken(&hunters, &new.email, None) {
            return Err(AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()));
        }
        let hunter = Hunter {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            avatar: String::new(),
            rank: Rank::E,
            level: 1,
            experience: 0,
            is_active: true,
            last_login: now,
            created_at: now,
            updated_at: now,
        };
        hunters.insert(hunter.id, (hunter.clone(), new.password_hash));
        Ok(hunter)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Hunter>, AppError> {
        Ok(self.hunters.read().await.get(&id).map(|(h, _)| h.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Hunter>, AppError> {
        Ok(self
            .find_credentials(email)
            .await?
            .map(|(hunter, _)| hunter))
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<(Hunter, String)>, AppError> {
        Ok(self
            .hunters
            .read()
            .await
            .values()
            .find(|(h, _)| h.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn record_login(&self, id: Uuid) -> Result<Option<Hunter>, AppError> {
        let now = self.tick().await;
        let mut hunters = self.hunters.write().await;
        Ok(hunters.get_mut(&id).map(|(hunter, _)| {
            hunter.last_login = now;
            hunter.updated_at = now;
            hunter.clone()
        }))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Option<Hunter>, AppError> {
        let now = self.tick().await;
        let mut hunters = self.hunters.write().await;
        if let Some(email) = &changes.email {
            if Self::email_taken(&hunters, email, Some(id)) {
                return Err(AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()));
            }
        }
        Ok(hunters.get_mut(&id).map(|(hunter, _)| {
            if let Some(name) = changes.name {
                hunter.name = name;
            }
            if let Some(email) = changes.email {
                hunter.email = email;
            }
            if let Some(avatar) = changes.avatar {
                hunter.avatar = avatar;
            }
            hunter.updated_at = now;
            hunter.clone()
        }))
    }

    async fn award_experience(&self, id: Uuid) -> Result<Option<Hunter>, AppError> {
        let now = self.tick().await;
        let mut hunters = self.hunters.write().await;
        Ok(hunters.get_mut(&id).map(|(hunter, _)| {
            let next = apply_experience_gain(Progression::of(hunter));
            hunter.level = next.level;
            hunter.experience = next.experience;
            hunter.rank = next.rank;
            hunter.updated_at = now;
            hunter.clone()
        }))
    }

    async fn deactivate(&self, id: Uuid) -> Result<Option<Hunter>, AppError> {
        let now = self.tick().await;
        let mut hunters = self.hunters.write().await;
        Ok(hunters.get_mut(&id).map(|(hunter, _)| {
            hunter.is_active = false;
            hunter.updated_at = now;
            hunter.clone()
        }))
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn insert(&self, owner: Uuid, new: NewResume) -> Result<Resume, AppError> {
        let now = self.tick().await;
        let resume = Resume {
            id: Uuid::new_v4(),
            user_id: owner,
            title: new.title,
            template: new.template,
            content: new.content,
            status: new.status,
            is_public: new.is_public,
            views: 0,
            downloads: 0,
            last_modified: now,
            created_at: now,
            updated_at: now,
        };
        self.resumes
            .write()
            .await
            .insert(resume.id, resume.clone());
        Ok(resume)
    }

    async fn list_owned(
        &self,
        owner: Uuid,
        query: &ResumeQuery,
    ) -> Result<(Vec<Resume>, i64), AppError> {
        let resumes = self.resumes.read().await;
        let mut matching: Vec<&Resume> = resumes
            .values()
            .filter(|r| r.user_id == owner && query.matches(r))
            .collect();
        matching.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Resume>, AppError> {
        Ok(self
            .resumes
            .read()
            .await
            .get(&id)
            .filter(|r| r.user_id == owner)
            .cloned())
    }

    async fn record_view(&self, owner: Uuid, id: Uuid) -> Result<Option<Resume>, AppError> {
        self.bump_counter(owner, id, |r| r.views += 1).await
    }

    async fn record_download(&self, owner: Uuid, id: Uuid) -> Result<Option<Resume>, AppError> {
        self.bump_counter(owner, id, |r| r.downloads += 1).await
    }

    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: ResumePatch,
    ) -> Result<Option<Resume>, AppError> {
        let now = self.tick().await;
        let mut resumes = self.resumes.write().await;
        Ok(resumes
            .get_mut(&id)
            .filter(|r| r.user_id == owner)
            .map(|resume| {
                patch.apply(resume);
                resume.last_modified = now;
                resume.updated_at = now;
                resume.clone()
            }))
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut resumes = self.resumes.write().await;
        match resumes.get(&id) {
            Some(r) if r.user_id == owner => {
                resumes.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn engagement(&self, owner: Uuid) -> Result<Vec<EngagementRow>, AppError> {
        Ok(self
            .resumes
            .read()
            .await
            .values()
            .filter(|r| r.user_id == owner)
            .map(|r| EngagementRow {
                status: r.status,
                views: r.views,
                downloads: r.downloads,
                updated_at: r.updated_at,
            })
            .collect())
    }

    async fn recent(&self, owner: Uuid, limit: i64) -> Result<Vec<ResumeSummary>, AppError> {
        let resumes = self.resumes.read().await;
        let mut owned: Vec<&Resume> = resumes.values().filter(|r| r.user_id == owner).collect();
        owned.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(owned
            .into_iter()
            .take(limit as usize)
            .map(ResumeSummary::from)
            .collect())
    }
}
