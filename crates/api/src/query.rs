//! Shared query parameter types for list endpoints.

use folio_core::content::PublishStatus;
use folio_core::pagination::{SortDirection, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use folio_db::models::listing::ListQuery;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppError;

/// Default `sortBy` for every list endpoint.
const DEFAULT_SORT_BY: &str = "createdAt";

/// `?page=&limit=&q=&status=&sortBy=&sortDir=` as accepted by posts, pages
/// and categories.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    pub q: Option<String>,
    pub status: Option<PublishStatus>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<SortDirection>,
}

impl ListParams {
    /// Resolve defaults and map `sortBy` through the resource's whitelist.
    pub fn into_list_query(
        self,
        sort_column: impl Fn(&str) -> Option<&'static str>,
    ) -> Result<ListQuery, AppError> {
        let sort_by = self.sort_by.as_deref().unwrap_or(DEFAULT_SORT_BY);
        let column = sort_column(sort_by).ok_or_else(|| {
            AppError::Malformed(format!("sortBy '{sort_by}' is not a sortable field"))
        })?;

        Ok(ListQuery {
            page: self.page.unwrap_or(1),
            limit: self.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
            search: self.q,
            status: self.status,
            sort_column: column,
            sort_dir: self.sort_dir.unwrap_or_default(),
        })
    }
}
