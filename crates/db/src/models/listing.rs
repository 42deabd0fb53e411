//! Filters shared by paginated list queries.

use folio_core::content::PublishStatus;
use folio_core::pagination::SortDirection;

/// A validated list request. `sort_column` must come from the owning
/// repository's whitelist since it is interpolated into SQL.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub page: i64,
    pub limit: i64,
    pub search: Option<String>,
    pub status: Option<PublishStatus>,
    pub sort_column: &'static str,
    pub sort_dir: SortDirection,
}

impl ListQuery {
    pub fn offset(&self) -> i64 {
        folio_core::pagination::offset(self.page, self.limit)
    }

    /// `ILIKE` pattern for the search term, with wildcards in the term escaped.
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| {
                let escaped = q
                    .replace('\\', "\\\\")
                    .replace('%', "\\%")
                    .replace('_', "\\_");
                format!("%{escaped}%")
            })
    }
}
