use std::sync::Arc;

use crate::auth::credentials::CredentialStore;
use crate::auth::TokenIssuer;
use crate::hunters::avatar::AvatarStore;
use crate::rate_limit::RateLimiter;
use crate::store::{HunterStore, ResumeStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable stores. Production: `PgStore` behind both.
    pub hunters: Arc<dyn HunterStore>,
    pub resumes: Arc<dyn ResumeStore>,
    pub tokens: TokenIssuer,
    /// Avatar blob store. Production: S3 / MinIO.
    pub avatars: Arc<dyn AvatarStore>,
    /// Redis-backed limiter; `None` disables rate limiting.
    pub rate_limiter: Option<RateLimiter>,
}

impl AppState {
    pub fn credentials(&self) -> CredentialStore {
        CredentialStore::new(self.hunters.clone())
    }
}

#[cfg(test)]
impl AppState {
    /// State over a fresh in-memory store, with no rate limiting.
    pub fn for_tests() -> Self {
        use std::time::Duration;

        use crate::hunters::avatar::MemoryAvatarStore;
        use crate::store::memory::MemoryStore;

        let store = Arc::new(MemoryStore::new());
        AppState {
            hunters: store.clone(),
            resumes: store,
            tokens: TokenIssuer::new(
                b"router-test-secret-with-at-least-32-bytes",
                Duration::from_secs(3600),
            )
            .expect("valid test token issuer"),
            avatars: Arc::new(MemoryAvatarStore::default()),
            rate_limiter: None,
        }
    }
}
