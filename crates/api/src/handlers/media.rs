//! Handlers for the media library (`/media`).
//!
//! Uploads are written to `UPLOAD_DIR` and served by the `/uploads` static
//! route; the database row records where the file lives and its public URL.

use std::io::Cursor;

use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use folio_core::error::CoreError;
use folio_core::media::{is_allowed_mime_type, public_url, stored_filename};
use folio_core::types::DbId;
use folio_db::models::media::{CreateMedia, UpdateMediaMetadata};
use folio_db::repositories::MediaRepo;
use folio_db::DbPool;
use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{ValidatedJson, ValidatedPath};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

/// Body of `PUT /media/{id}`. Absent fields are cleared. Values are trimmed
/// before the length limits apply.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaMetadataInput {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(max = 255, message = "title must be at most 255 characters"))]
    pub title: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(max = 255, message = "altText must be at most 255 characters"))]
    pub alt_text: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(max = 1000, message = "caption must be at most 1000 characters"))]
    pub caption: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(max = 5000, message = "description must be at most 5000 characters"))]
    pub description: String,
}

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Media", id })
}

/// Reject a featured image id that does not point at a media item.
pub(crate) async fn ensure_media_exists(pool: &DbPool, id: Option<DbId>) -> AppResult<()> {
    let Some(id) = id else {
        return Ok(());
    };
    if MediaRepo::find_by_id(pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "featuredImageId {id} does not reference a media item"
        ))));
    }
    Ok(())
}

/// Pixel dimensions of a raster image, if its header can be decoded.
fn image_dimensions(bytes: &[u8]) -> Option<(i32, i32)> {
    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()?;
    Some((i32::try_from(width).ok()?, i32::try_from(height).ok()?))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/media
pub async fn list_media(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = MediaRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(items)))
}

/// POST /api/media/upload
///
/// Accepts a multipart form with a single `file` part.
pub async fn upload_media(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let original_name = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !is_allowed_mime_type(&mime_type) {
            return Err(AppError::UnsupportedFileType(mime_type));
        }
        let bytes = field.bytes().await?;
        upload = Some((original_name, mime_type, bytes));
        break;
    }

    let (original_name, mime_type, bytes) = upload.ok_or(AppError::FileRequired)?;
    if bytes.is_empty() {
        return Err(AppError::FileRequired);
    }
    if bytes.len() > state.config.max_upload_bytes {
        return Err(AppError::FileTooLarge);
    }

    let filename = stored_filename(&original_name, Utc::now().timestamp_millis());
    let path = state.config.upload_dir.join(&filename);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| AppError::Upload(format!("Failed to store upload: {e}")))?;

    let dimensions = image_dimensions(&bytes);
    let input = CreateMedia {
        url: public_url(&filename),
        filename,
        original_name,
        mime_type,
        size: bytes.len() as i64,
        width: dimensions.map(|(w, _)| w),
        height: dimensions.map(|(_, h)| h),
        path: path.to_string_lossy().into_owned(),
    };

    let media = match MediaRepo::create(&state.pool, &input).await {
        Ok(media) => media,
        Err(err) => {
            // Don't leave an orphaned file behind a failed insert.
            let _ = tokio::fs::remove_file(&path).await;
            return Err(err.into());
        }
    };

    tracing::info!(
        media_id = media.id,
        filename = %media.filename,
        size = media.size,
        user_id = auth.user_id,
        "Media uploaded"
    );

    Ok(Json(DataResponse::new(media)))
}

/// PUT /api/media/{id}
pub async fn update_media(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
    ValidatedJson(input): ValidatedJson<MediaMetadataInput>,
) -> AppResult<impl IntoResponse> {
    let metadata = UpdateMediaMetadata {
        title: input.title,
        alt_text: input.alt_text,
        caption: input.caption,
        description: input.description,
    };
    let media = MediaRepo::update_metadata(&state.pool, id, &metadata)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(media_id = id, user_id = auth.user_id, "Media metadata updated");

    Ok(Json(DataResponse::new(media)))
}

/// DELETE /api/media/{id}
///
/// Refused while a post or page features the item. The file is removed
/// after the row; a missing file is not an error.
pub async fn delete_media(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let media = MediaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if MediaRepo::is_in_use(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict {
            code: "MEDIA_IN_USE",
            message: "Media is used as a featured image and cannot be deleted".to_string(),
        }));
    }

    MediaRepo::delete(&state.pool, id).await?;

    if let Err(e) = tokio::fs::remove_file(&media.path).await {
        tracing::debug!(media_id = id, error = %e, "Upload file already gone");
    }

    tracing::info!(media_id = id, user_id = auth.user_id, "Media deleted");

    Ok(Json(SuccessResponse::ok()))
}
