use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::str::FromStr;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use amp_core::inbox::{InboxItem, TriageTarget};
use amp_core::types::Priority;

fn item_json(item: &InboxItem) -> serde_json::Value {
    serde_json::json!({
        "id": item.id,
        "title": item.title,
        "status": item.status,
        "captured_at": item.captured_at,
        "triaged_at": item.triaged_at,
        "body": item.body,
    })
}

/// GET /api/inbox — all inbox items, oldest first.
pub async fn list_items(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let items = InboxItem::list(&root, &user.0)?;
        let list: Vec<serde_json::Value> = items.iter().map(item_json).collect();
        Ok::<_, amp_core::AmpError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CaptureBody {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// POST /api/inbox — capture a new item.
pub async fn capture_item(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CaptureBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    if body.title.trim().is_empty() {
        return Err(AppError::bad_request("title must not be empty"));
    }
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let item = InboxItem::capture(
            &root,
            &user.0,
            body.title.trim(),
            body.body.unwrap_or_default(),
        )?;
        Ok::<_, amp_core::AmpError>(item_json(&item))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /api/inbox/:id — single item detail.
pub async fn get_item(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let item = InboxItem::load(&root, &user.0, &id)?;
        Ok::<_, amp_core::AmpError>(item_json(&item))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct UpdateItemBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// PATCH /api/inbox/:id — edit title/body of a captured item.
pub async fn update_item(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateItemBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut item = InboxItem::load(&root, &user.0, &id)?;
        if let Some(title) = body.title {
            let title = title.trim().to_string();
            if !title.is_empty() {
                item.update_title(title);
            }
        }
        if let Some(text) = body.body {
            item.body = text;
        }
        item.save(&root, &user.0)?;
        Ok::<_, amp_core::AmpError>(item_json(&item))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// DELETE /api/inbox/:id
pub async fn delete_item(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    tokio::task::spawn_blocking(move || InboxItem::delete(&root, &user.0, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[derive(serde::Deserialize)]
pub struct TriageBody {
    pub area: String,
    pub project: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// POST /api/inbox/:id/triage — convert an item into an action.
pub async fn triage_item(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<TriageBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let priority = body
            .priority
            .as_deref()
            .map(Priority::from_str)
            .transpose()?;
        let action = amp_core::inbox::triage(
            &root,
            &user.0,
            &id,
            TriageTarget {
                area: &body.area,
                project: &body.project,
                title: body.title,
                priority,
            },
        )?;
        Ok::<_, amp_core::AmpError>(serde_json::json!({
            "id": action.id,
            "title": action.title,
            "status": action.status,
            "priority": action.priority,
            "area": body.area,
            "project": body.project,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok((StatusCode::CREATED, Json(result)))
}

#[derive(serde::Deserialize)]
pub struct BulkDeleteBody {
    pub ids: Vec<String>,
}

/// POST /api/inbox/bulk-delete — best-effort per-item loop; one outcome per id.
pub async fn bulk_delete(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<BulkDeleteBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.ids.is_empty() {
        return Err(AppError::bad_request("ids must be a non-empty list"));
    }
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut outcomes = Vec::with_capacity(body.ids.len());
        for id in &body.ids {
            match InboxItem::delete(&root, &user.0, id) {
                Ok(()) => outcomes.push(serde_json::json!({ "id": id, "deleted": true })),
                Err(e) => {
                    tracing::warn!("bulk delete skipped '{id}': {e}");
                    outcomes.push(serde_json::json!({
                        "id": id,
                        "deleted": false,
                        "error": e.to_string(),
                    }));
                }
            }
        }
        serde_json::json!(outcomes)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;

    Ok(Json(result))
}
