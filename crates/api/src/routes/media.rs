use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Headroom for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Routes mounted at `/media`.
///
/// ```text
/// GET    /                            -> list_media
/// POST   /upload                      -> upload_media (multipart, field `file`)
/// PUT    /{id}                        -> update_media
/// DELETE /{id}                        -> delete_media
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(media::list_media))
        .route(
            "/upload",
            post(media::upload_media)
                .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD_BYTES)),
        )
        .route("/{id}", put(media::update_media).delete(media::delete_media))
}
