//! Argon2id hashing for hunter secrets.
//!
//! Hashing is deliberately slow, so the async wrappers move the work onto the
//! blocking pool with `tokio::task::spawn_blocking`.

use anyhow::anyhow;
use argon2::password_hash::{
    rand_core::OsRng, Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier,
    SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::errors::AppError;

// Fixed work factor: 19 MiB, 2 passes, 1 lane.
const MEMORY_COST_KIB: u32 = 19_456;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;

fn hasher() -> Result<Argon2<'static>, AppError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|e| anyhow!("invalid argon2 params: {e}"))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Returns a PHC-format hash string embedding salt and parameters.
pub fn hash_password_sync(secret: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {e}"))?;
    Ok(hash.to_string())
}

/// `Ok(false)` on a mismatch; `Err` only when the stored hash is unusable.
pub fn verify_password_sync(secret: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| anyhow!("stored hash is malformed: {e}"))?;
    match hasher()?.verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(anyhow!("password verification failed: {e}").into()),
    }
}

pub async fn hash_password(secret: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password_sync(&secret))
        .await
        .map_err(|e| AppError::Internal(anyhow!("spawn_blocking failed in hash_password: {e}")))?
}

pub async fn verify_password(secret: String, stored_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password_sync(&secret, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(anyhow!("spawn_blocking failed in verify_password: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_not_the_secret_and_verifies() {
        let hash = hash_password_sync("arise-shadows").unwrap();
        assert!(!hash.contains("arise-shadows"));
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password_sync("arise-shadows", &hash).unwrap());
        assert!(!verify_password_sync("arise-shadow", &hash).unwrap());
    }

    #[test]
    fn test_same_secret_gets_distinct_salts() {
        let a = hash_password_sync("igris").unwrap();
        let b = hash_password_sync("igris").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_an_error_not_a_mismatch() {
        assert!(verify_password_sync("anything", "not-a-phc-string").is_err());
    }

    #[tokio::test]
    async fn test_async_wrappers_round_trip() {
        let hash = hash_password("kamish".to_string()).await.unwrap();
        assert!(verify_password("kamish".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("tusk".to_string(), hash).await.unwrap());
    }
}
