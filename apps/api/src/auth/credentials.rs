//! Credential store. The only code that sees password hashes.

use std::sync::Arc;

use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::errors::AppError;
use crate::models::hunter::{Hunter, NewHunter};
use crate::store::{HunterStore, DUPLICATE_EMAIL_MESSAGE};

#[derive(Clone)]
pub struct CredentialStore {
    hunters: Arc<dyn HunterStore>,
}

impl CredentialStore {
    pub fn new(hunters: Arc<dyn HunterStore>) -> Self {
        Self { hunters }
    }

    /// Registers a hunter. `email` must already be normalized.
    pub async fn create(
        &self,
        name: String,
        email: String,
        secret: String,
    ) -> Result<Hunter, AppError> {
        if self.hunters.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()));
        }

        let password_hash = hash_password(secret).await?;
        // The unique index still catches a concurrent registration of the same email.
        let hunter = self
            .hunters
            .insert(NewHunter {
                name,
                email,
                password_hash,
            })
            .await?;

        info!("Registered hunter {}", hunter.id);
        Ok(hunter)
    }

    /// `None` when no hunter has this email; otherwise the hunter and whether
    /// the candidate matched.
    pub async fn verify(
        &self,
        email: &str,
        candidate: String,
    ) -> Result<Option<(Hunter, bool)>, AppError> {
        let Some((hunter, stored_hash)) = self.hunters.find_credentials(email).await? else {
            return Ok(None);
        };
        let matched = verify_password(candidate, stored_hash).await?;
        Ok(Some((hunter, matched)))
    }
}
