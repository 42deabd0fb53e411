//! Handlers for site settings and admin menu preferences (`/settings`).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use folio_core::settings::{AdminMenuPrefs, SiteSettings, ADMIN_MENU_PREFS_KEY};
use folio_db::repositories::SettingRepo;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/settings
///
/// Keys that were never saved come back with their defaults.
pub async fn get_settings(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows = SettingRepo::list(&state.pool).await?;
    let settings = SiteSettings::from_pairs(rows.into_iter().map(|row| (row.key, row.value)));

    Ok(Json(DataResponse::new(settings)))
}

/// PUT /api/settings
///
/// Writes every key in a single transaction.
pub async fn update_settings(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(settings): ValidatedJson<SiteSettings>,
) -> AppResult<impl IntoResponse> {
    SettingRepo::upsert_many(&state.pool, &settings.to_pairs()).await?;

    tracing::info!(user_id = auth.user_id, "Site settings updated");

    Ok(Json(DataResponse::new(settings)))
}

/// GET /api/settings/admin-menu-prefs
///
/// `data` is `null` until preferences have been saved.
pub async fn get_admin_menu_prefs(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let prefs = match SettingRepo::get(&state.pool, ADMIN_MENU_PREFS_KEY).await? {
        Some(raw) => match serde_json::from_str::<AdminMenuPrefs>(&raw) {
            Ok(prefs) => Some(prefs),
            Err(e) => {
                tracing::warn!(error = %e, "Stored admin menu preferences are unreadable");
                None
            }
        },
        None => None,
    };

    Ok(Json(DataResponse::new(prefs)))
}

/// PUT /api/settings/admin-menu-prefs
pub async fn update_admin_menu_prefs(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<AdminMenuPrefs>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(prefs) = payload?;
    let raw = serde_json::to_string(&prefs)
        .map_err(|e| AppError::InternalError(format!("Failed to encode menu preferences: {e}")))?;

    SettingRepo::upsert(&state.pool, ADMIN_MENU_PREFS_KEY, &raw).await?;

    tracing::info!(user_id = auth.user_id, "Admin menu preferences updated");

    Ok(Json(DataResponse::new(prefs)))
}
