use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use amp_core::area::Area;

fn area_json(area: &Area) -> serde_json::Value {
    serde_json::json!({
        "slug": area.slug,
        "title": area.title,
        "description": area.description,
        "created_at": area.created_at,
        "updated_at": area.updated_at,
        "body": area.body,
    })
}

/// GET /api/areas — all areas, sorted by slug.
pub async fn list_areas(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let areas = Area::list(&root, &user.0)?;
        let list: Vec<serde_json::Value> = areas.iter().map(area_json).collect();
        Ok::<_, amp_core::AmpError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreateAreaBody {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// POST /api/areas — create a new area.
pub async fn create_area(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CreateAreaBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let area = Area::create(&root, &user.0, body.slug, body.title, body.description)?;
        Ok::<_, amp_core::AmpError>(area_json(&area))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /api/areas/:area — area detail with its project list.
pub async fn get_area(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let area = Area::load(&root, &user.0, &slug)?;
        let projects = amp_core::project::Project::list(&root, &user.0, &slug)?;
        let mut json = area_json(&area);
        json["projects"] = serde_json::json!(projects
            .iter()
            .map(|p| serde_json::json!({
                "slug": p.slug,
                "title": p.title,
                "status": p.status,
            }))
            .collect::<Vec<_>>());
        Ok::<_, amp_core::AmpError>(json)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct UpdateAreaBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// PATCH /api/areas/:area
pub async fn update_area(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(slug): Path<String>,
    Json(body): Json<UpdateAreaBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut area = Area::load(&root, &user.0, &slug)?;
        if let Some(title) = body.title {
            let title = title.trim().to_string();
            if !title.is_empty() {
                area.update_title(title);
            }
        }
        if let Some(description) = body.description {
            area.set_description(Some(description));
        }
        if let Some(text) = body.body {
            area.body = text;
        }
        area.save(&root, &user.0)?;
        Ok::<_, amp_core::AmpError>(area_json(&area))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// DELETE /api/areas/:area — removes the area and everything nested under it.
pub async fn delete_area(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    tokio::task::spawn_blocking(move || Area::delete(&root, &user.0, &slug))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
