use axum::extract::State;
use axum::{Extension, Json};

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use amp_core::action::Action;
use amp_core::area::Area;
use amp_core::inbox::InboxItem;
use amp_core::project::Project;
use amp_core::types::{ActionStatus, InboxStatus, ProjectStatus};

const NEXT_ACTION_LIMIT: usize = 10;

/// GET /api/overview — dashboard counts plus the top next actions across
/// every project, highest priority first.
pub async fn get_overview(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let inbox_open = InboxItem::list(&root, &user.0)?
            .iter()
            .filter(|i| i.status == InboxStatus::Open)
            .count();

        let areas = Area::list(&root, &user.0)?;
        let projects = Project::list_all(&root, &user.0)?;
        let active_projects = projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Active)
            .count();

        let today = chrono::Utc::now().date_naive();
        let mut open_actions = 0usize;
        let mut due_today = 0usize;
        let mut overdue = 0usize;
        let mut next: Vec<(String, String, Action)> = Vec::new();

        for project in &projects {
            for action in Action::list(&root, &user.0, &project.area, &project.slug)? {
                if !action.status.is_open() {
                    continue;
                }
                open_actions += 1;
                match action.due {
                    Some(d) if d == today => due_today += 1,
                    Some(d) if d < today => overdue += 1,
                    _ => {}
                }
                if action.status == ActionStatus::Next {
                    next.push((project.area.clone(), project.slug.clone(), action));
                }
            }
        }

        // Highest priority first; earlier due dates break ties (undated last).
        next.sort_by(|a, b| {
            b.2.priority.cmp(&a.2.priority).then_with(|| {
                match (a.2.due, b.2.due) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => a.2.created_at.cmp(&b.2.created_at),
                }
            })
        });
        next.truncate(NEXT_ACTION_LIMIT);

        let next_actions: Vec<serde_json::Value> = next
            .iter()
            .map(|(area, project, action)| {
                serde_json::json!({
                    "area": area,
                    "project": project,
                    "id": action.id,
                    "title": action.title,
                    "priority": action.priority,
                    "due": action.due,
                })
            })
            .collect();

        Ok::<_, amp_core::AmpError>(serde_json::json!({
            "inbox_open": inbox_open,
            "areas": areas.len(),
            "projects": projects.len(),
            "active_projects": active_projects,
            "open_actions": open_actions,
            "due_today": due_today,
            "overdue": overdue,
            "next_actions": next_actions,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
