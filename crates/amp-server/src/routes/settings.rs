use axum::extract::State;
use axum::{Extension, Json};

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use amp_core::settings::{Settings, SettingsUpdate};

/// GET /api/settings — served through the TTL cache.
pub async fn get_settings(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Settings>, AppError> {
    let root = app.root.clone();
    let cache = app.settings_cache.clone();
    let settings = tokio::task::spawn_blocking(move || cache.get(&root, &user.0))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json((*settings).clone()))
}

/// PUT /api/settings — merge the update over the on-disk file, then drop the
/// cached entry so the next read sees the new values.
pub async fn update_settings(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<Settings>, AppError> {
    let root = app.root.clone();
    let cache = app.settings_cache.clone();
    let settings = tokio::task::spawn_blocking(move || {
        let mut settings = Settings::load(&root, &user.0)?;
        settings.apply(update);
        settings.save(&root, &user.0)?;
        cache.invalidate(&user.0);
        Ok::<_, amp_core::AmpError>(settings)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(settings))
}
