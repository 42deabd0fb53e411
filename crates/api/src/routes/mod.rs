pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod health;
pub mod media;
pub mod pages;
pub mod posts;
pub mod roles;
pub mod settings;
pub mod users;

use axum::middleware::from_fn_with_state;
use axum::Router;

use crate::middleware::auth::require_auth;
use crate::middleware::csrf::require_csrf;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                              health check (public)
///
/// /auth/login                          login (public, rate limited)
/// /auth/logout                         logout
/// /auth/me                             current user + CSRF token
///
/// /posts                               list, create
/// /posts/{id}                          get, update, delete
/// /pages                               list, create
/// /pages/{id}                          get, update, delete
/// /categories                          list, create
/// /categories/{id}                     get, update, delete
///
/// /media                               list
/// /media/upload                        multipart upload
/// /media/{id}                          update metadata, delete
///
/// /users                               list, create
/// /users/{id}                          get, update, delete
/// /roles                               list, create
/// /roles/{id}                          get, update, delete
///
/// /settings                            get, update
/// /settings/admin-menu-prefs           get, update
///
/// /dashboard/summary                   counts + recent content
/// ```
///
/// Everything except `/health` and `/auth/login` requires a session and, for
/// unsafe methods, a matching CSRF header.
pub fn api_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .merge(health::router())
        .merge(auth::public_router(state.clone()));

    // route_layer wraps in reverse: require_auth runs before require_csrf.
    let protected = Router::new()
        .merge(auth::router())
        .nest("/posts", posts::router())
        .nest("/pages", pages::router())
        .nest("/categories", categories::router())
        .nest("/media", media::router(state.config.max_upload_bytes))
        .nest("/users", users::router())
        .nest("/roles", roles::router())
        .nest("/settings", settings::router())
        .nest("/dashboard", dashboard::router())
        .route_layer(from_fn_with_state(state.clone(), require_csrf))
        .route_layer(from_fn_with_state(state, require_auth));

    public.merge(protected)
}
