use axum::routing::get;
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Routes mounted at `/settings`.
///
/// ```text
/// GET    /                            -> get_settings
/// PUT    /                            -> update_settings
/// GET    /admin-menu-prefs            -> get_admin_menu_prefs
/// PUT    /admin-menu-prefs            -> update_admin_menu_prefs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route(
            "/admin-menu-prefs",
            get(settings::get_admin_menu_prefs).put(settings::update_admin_menu_prefs),
        )
}
