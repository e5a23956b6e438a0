use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::str::FromStr;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use amp_core::project::Project;
use amp_core::types::ProjectStatus;

fn project_json(project: &Project) -> serde_json::Value {
    serde_json::json!({
        "slug": project.slug,
        "area": project.area,
        "title": project.title,
        "status": project.status,
        "description": project.description,
        "created_at": project.created_at,
        "updated_at": project.updated_at,
        "body": project.body,
    })
}

/// GET /api/areas/:area/projects — projects in one area, sorted by slug.
pub async fn list_projects(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(area): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let projects = Project::list(&root, &user.0, &area)?;
        let list: Vec<serde_json::Value> = projects.iter().map(project_json).collect();
        Ok::<_, amp_core::AmpError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreateProjectBody {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// POST /api/areas/:area/projects
pub async fn create_project(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(area): Path<String>,
    Json(body): Json<CreateProjectBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let project = Project::create(
            &root,
            &user.0,
            &area,
            body.slug,
            body.title,
            body.description,
        )?;
        Ok::<_, amp_core::AmpError>(project_json(&project))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /api/areas/:area/projects/:project — detail plus an action rollup.
pub async fn get_project(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((area, slug)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let project = Project::load(&root, &user.0, &area, &slug)?;
        let actions = amp_core::action::Action::list(&root, &user.0, &area, &slug)?;
        let mut json = project_json(&project);
        json["summary"] = serde_json::json!(amp_core::action::summarize(&actions));
        Ok::<_, amp_core::AmpError>(json)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct UpdateProjectBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// PATCH /api/areas/:area/projects/:project
pub async fn update_project(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((area, slug)): Path<(String, String)>,
    Json(body): Json<UpdateProjectBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut project = Project::load(&root, &user.0, &area, &slug)?;
        if let Some(title) = body.title {
            let title = title.trim().to_string();
            if !title.is_empty() {
                project.update_title(title);
            }
        }
        if let Some(status) = body.status {
            project.set_status(ProjectStatus::from_str(&status)?);
        }
        if let Some(description) = body.description {
            project.set_description(Some(description));
        }
        if let Some(text) = body.body {
            project.body = text;
        }
        project.save(&root, &user.0)?;
        Ok::<_, amp_core::AmpError>(project_json(&project))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// DELETE /api/areas/:area/projects/:project — removes the project and its actions.
pub async fn delete_project(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((area, slug)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    tokio::task::spawn_blocking(move || Project::delete(&root, &user.0, &area, &slug))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
