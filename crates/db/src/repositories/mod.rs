//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod media_repo;
pub mod page_repo;
pub mod post_repo;
pub mod role_repo;
pub mod session_repo;
pub mod setting_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use media_repo::MediaRepo;
pub use page_repo::PageRepo;
pub use post_repo::PostRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use setting_repo::SettingRepo;
pub use user_repo::UserRepo;

/// Look up the SQL column for an API sort key in a repository whitelist.
pub(crate) fn whitelisted_column(
    whitelist: &[(&'static str, &'static str)],
    key: &str,
) -> Option<&'static str> {
    whitelist
        .iter()
        .find(|(api_name, _)| *api_name == key)
        .map(|(_, column)| *column)
}
