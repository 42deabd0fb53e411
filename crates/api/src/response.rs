//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope; list endpoints add a
//! `meta` block. Use [`DataResponse`] instead of ad-hoc
//! `serde_json::json!({ "data": ... })`.

use folio_core::pagination::PageMeta;
use serde::Serialize;

/// Standard `{ "data": T, "meta"? }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse::new(items)))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data, meta: None }
    }

    pub fn paged(data: T, meta: PageMeta) -> Self {
        Self {
            data,
            meta: Some(meta),
        }
    }
}

/// Body of endpoints that only acknowledge an action.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> DataResponse<Self> {
        DataResponse::new(Self { success: true })
    }
}
