use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::str::FromStr;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use amp_core::action::Action;
use amp_core::types::{ActionStatus, Priority};

fn action_json(action: &Action) -> serde_json::Value {
    serde_json::json!({
        "id": action.id,
        "title": action.title,
        "status": action.status,
        "priority": action.priority,
        "due": action.due,
        "created_at": action.created_at,
        "updated_at": action.updated_at,
        "completed_at": action.completed_at,
        "body": action.body,
    })
}

/// GET /api/areas/:area/projects/:project/actions — sorted by creation time.
pub async fn list_actions(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((area, project)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let actions = Action::list(&root, &user.0, &area, &project)?;
        let list: Vec<serde_json::Value> = actions.iter().map(action_json).collect();
        Ok::<_, amp_core::AmpError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreateActionBody {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due: Option<chrono::NaiveDate>,
}

/// POST /api/areas/:area/projects/:project/actions
pub async fn create_action(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((area, project)): Path<(String, String)>,
    Json(body): Json<CreateActionBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    if body.title.trim().is_empty() {
        return Err(AppError::bad_request("title must not be empty"));
    }
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut action = Action::create(
            &root,
            &user.0,
            &area,
            &project,
            body.title.trim(),
            body.body.unwrap_or_default(),
        )?;
        let mut dirty = false;
        if let Some(priority) = body.priority.as_deref() {
            action.set_priority(Priority::from_str(priority)?);
            dirty = true;
        }
        if body.due.is_some() {
            action.set_due(body.due);
            dirty = true;
        }
        if dirty {
            action.save(&root, &user.0, &area, &project)?;
        }
        Ok::<_, amp_core::AmpError>(action_json(&action))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /api/areas/:area/projects/:project/actions/:id
pub async fn get_action(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((area, project, id)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let action = Action::load(&root, &user.0, &area, &project, &id)?;
        Ok::<_, amp_core::AmpError>(action_json(&action))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct UpdateActionBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    // Outer None leaves the date alone; Some(None) clears it.
    #[serde(default, with = "serde_option_option")]
    pub due: Option<Option<chrono::NaiveDate>>,
    #[serde(default)]
    pub body: Option<String>,
}

mod serde_option_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<Option<Option<chrono::NaiveDate>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<chrono::NaiveDate>::deserialize(deserializer).map(Some)
    }
}

/// PATCH /api/areas/:area/projects/:project/actions/:id
pub async fn update_action(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((area, project, id)): Path<(String, String, String)>,
    Json(body): Json<UpdateActionBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut action = Action::load(&root, &user.0, &area, &project, &id)?;
        if let Some(title) = body.title {
            let title = title.trim().to_string();
            if !title.is_empty() {
                action.update_title(title);
            }
        }
        if let Some(status) = body.status {
            action.set_status(ActionStatus::from_str(&status)?);
        }
        if let Some(priority) = body.priority {
            action.set_priority(Priority::from_str(&priority)?);
        }
        if let Some(due) = body.due {
            action.set_due(due);
        }
        if let Some(text) = body.body {
            action.body = text;
        }
        action.save(&root, &user.0, &area, &project)?;
        Ok::<_, amp_core::AmpError>(action_json(&action))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/areas/:area/projects/:project/actions/:id/complete
pub async fn complete_action(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((area, project, id)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut action = Action::load(&root, &user.0, &area, &project, &id)?;
        action.complete();
        action.save(&root, &user.0, &area, &project)?;
        Ok::<_, amp_core::AmpError>(action_json(&action))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/areas/:area/projects/:project/actions/:id/reopen
pub async fn reopen_action(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((area, project, id)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut action = Action::load(&root, &user.0, &area, &project, &id)?;
        action.reopen();
        action.save(&root, &user.0, &area, &project)?;
        Ok::<_, amp_core::AmpError>(action_json(&action))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// DELETE /api/areas/:area/projects/:project/actions/:id
pub async fn delete_action(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((area, project, id)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    tokio::task::spawn_blocking(move || Action::delete(&root, &user.0, &area, &project, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
