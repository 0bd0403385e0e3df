//! Avatar images: type/size checks, the blob-store seam, and the upload handler.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Extension, Json,
};
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::auth::CurrentHunter;
use crate::errors::AppError;
use crate::models::hunter::{Hunter, ProfileChanges};
use crate::state::AppState;

pub const AVATAR_MAX_BYTES: usize = 5 * 1024 * 1024;
pub const AVATAR_FIELD: &str = "avatar";

/// Request body cap for the upload route: the image plus multipart framing.
pub const AVATAR_BODY_LIMIT: usize = AVATAR_MAX_BYTES + 64 * 1024;

#[async_trait]
pub trait AvatarStore: Send + Sync {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), AppError>;
}

pub struct S3AvatarStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3AvatarStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl AvatarStore for S3AvatarStore {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload of {key} failed: {e}")))?;

        info!("Uploaded avatar to s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryAvatarStore {
    pub objects: tokio::sync::RwLock<std::collections::HashMap<String, (Bytes, String)>>,
}

#[cfg(test)]
#[async_trait]
impl AvatarStore for MemoryAvatarStore {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), AppError> {
        self.objects
            .write()
            .await
            .insert(key.to_string(), (data, content_type.to_string()));
        Ok(())
    }
}

/// File extension for an accepted image type.
pub fn image_extension(content_type: &str) -> Result<&'static str, AppError> {
    match content_type {
        "image/jpeg" => Ok("jpg"),
        "image/png" => Ok("png"),
        "image/gif" => Ok("gif"),
        other => Err(AppError::UnsupportedMediaType(format!(
            "Avatar must be a JPEG, PNG or GIF image, got '{other}'"
        ))),
    }
}

pub fn check_avatar_size(len: usize) -> Result<(), AppError> {
    if len == 0 {
        return Err(AppError::invalid(AVATAR_FIELD, "Avatar file is empty"));
    }
    if len > AVATAR_MAX_BYTES {
        return Err(AppError::PayloadTooLarge(format!(
            "Avatar must not exceed {} MiB",
            AVATAR_MAX_BYTES / (1024 * 1024)
        )));
    }
    Ok(())
}

pub fn avatar_key(hunter_id: Uuid, extension: &str) -> String {
    format!("avatars/{hunter_id}/{}.{extension}", Uuid::new_v4())
}

fn multipart_error(status: StatusCode, text: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(text)
    } else {
        AppError::invalid(AVATAR_FIELD, text)
    }
}

/// Stores the image, then records its key on the hunter.
pub async fn store_avatar(
    state: &AppState,
    hunter_id: Uuid,
    content_type: &str,
    data: Bytes,
) -> Result<Hunter, AppError> {
    let extension = image_extension(content_type)?;
    check_avatar_size(data.len())?;

    let key = avatar_key(hunter_id, extension);
    state.avatars.put(&key, data, content_type).await?;

    let hunter = state
        .hunters
        .update_profile(
            hunter_id,
            ProfileChanges {
                avatar: Some(key),
                ..Default::default()
            },
        )
        .await?
        .ok_or(AppError::Unauthorized)?;

    info!("Hunter {hunter_id} updated avatar");
    Ok(hunter)
}

/// POST /api/v1/users/avatar (multipart field `avatar`)
pub async fn handle_upload_avatar(
    State(state): State<AppState>,
    Extension(CurrentHunter(hunter)): Extension<CurrentHunter>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Hunter>, AppError> {
    let mut multipart = multipart.map_err(|e| multipart_error(e.status(), e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e.status(), e.body_text()))?
    {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        // Reject the type before buffering the file.
        image_extension(&content_type)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e.status(), e.body_text()))?;
        let updated = store_avatar(&state, hunter.id, &content_type, data).await?;
        return Ok(Json(updated));
    }

    Err(AppError::invalid(AVATAR_FIELD, "Please upload an image file"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_image_types() {
        assert_eq!(image_extension("image/jpeg").unwrap(), "jpg");
        assert_eq!(image_extension("image/png").unwrap(), "png");
        assert_eq!(image_extension("image/gif").unwrap(), "gif");
        assert!(matches!(
            image_extension("application/pdf"),
            Err(AppError::UnsupportedMediaType(_))
        ));
        assert!(matches!(
            image_extension(""),
            Err(AppError::UnsupportedMediaType(_))
        ));
    }

    #[test]
    fn test_size_limit() {
        assert!(check_avatar_size(AVATAR_MAX_BYTES).is_ok());
        assert!(matches!(
            check_avatar_size(AVATAR_MAX_BYTES + 1),
            Err(AppError::PayloadTooLarge(_))
        ));
        assert!(matches!(check_avatar_size(0), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_avatar_key_layout() {
        let hunter_id = Uuid::new_v4();
        let key = avatar_key(hunter_id, "png");
        assert!(key.starts_with(&format!("avatars/{hunter_id}/")));
        assert!(key.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_store_avatar_records_key() {
        let avatars = std::sync::Arc::new(MemoryAvatarStore::default());
        let state = AppState {
            avatars: avatars.clone(),
            ..AppState::for_tests()
        };
        let hunter = state
            .credentials()
            .create(
                "Tank".to_string(),
                "tank@shadow.army".to_string(),
                "ice-bear".to_string(),
            )
            .await
            .unwrap();

        let updated = store_avatar(&state, hunter.id, "image/png", Bytes::from_static(b"\x89PNG"))
            .await
            .unwrap();

        assert!(updated.avatar.ends_with(".png"));
        let objects = avatars.objects.read().await;
        let (data, content_type) = objects.get(&updated.avatar).unwrap();
        assert_eq!(data.as_ref(), b"\x89PNG");
        assert_eq!(content_type, "image/png");
    }

    #[tokio::test]
    async fn test_store_avatar_rejects_before_upload() {
        let avatars = std::sync::Arc::new(MemoryAvatarStore::default());
        let state = AppState {
            avatars: avatars.clone(),
            ..AppState::for_tests()
        };
        let err = store_avatar(&state, Uuid::new_v4(), "text/plain", Bytes::from_static(b"hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
        assert!(avatars.objects.read().await.is_empty());
    }
}
