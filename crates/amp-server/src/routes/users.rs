use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::auth::USER_COOKIE;
use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct CreateUserBody {
    pub slug: String,
}

/// POST /api/users — scaffold a new user directory and hand back the cookie.
pub async fn create_user(
    State(app): State<AppState>,
    Json(body): Json<CreateUserBody>,
) -> Result<(StatusCode, [(&'static str, String); 1], Json<serde_json::Value>), AppError> {
    let root = app.root.clone();
    let slug = body.slug.clone();
    tokio::task::spawn_blocking(move || amp_core::user::init(&root, &slug))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let cookie = format!("{USER_COOKIE}={}; SameSite=Lax; Path=/", body.slug);
    Ok((
        StatusCode::CREATED,
        [("Set-Cookie", cookie)],
        Json(serde_json::json!({ "slug": body.slug })),
    ))
}
