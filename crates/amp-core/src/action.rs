use crate::error::{AmpError, Result};
use crate::markdown;
use crate::paths;
use crate::types::{ActionStatus, Priority};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Action — a task record, one markdown file inside a project directory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    #[serde(skip)]
    pub id: String,
    pub title: String,
    pub status: ActionStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub body: String,
}

impl Action {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: paths::new_id(),
            title: title.into(),
            status: ActionStatus::Next,
            priority: Priority::Medium,
            due: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
            body: String::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn create(
        root: &Path,
        user: &str,
        area: &str,
        project: &str,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self> {
        paths::validate_slug(area)?;
        paths::validate_slug(project)?;
        if !paths::project_manifest(root, user, area, project).exists() {
            return Err(AmpError::ProjectNotFound(format!("{area}/{project}")));
        }
        let mut action = Self::new(title);
        action.body = body.into();
        action.save(root, user, area, project)?;
        Ok(action)
    }

    pub fn load(root: &Path, user: &str, area: &str, project: &str, id: &str) -> Result<Self> {
        paths::validate_slug(area)?;
        paths::validate_slug(project)?;
        if !paths::is_valid_id(id) {
            return Err(AmpError::ActionNotFound(id.to_string()));
        }
        let path = paths::action_path(root, user, area, project, id);
        if !path.exists() {
            return Err(AmpError::ActionNotFound(id.to_string()));
        }
        let raw = std::fs::read_to_string(&path)?;
        let doc = markdown::parse::<Action>(&raw, &path)?;
        let mut action = doc.meta;
        action.id = id.to_string();
        action.body = doc.body;
        Ok(action)
    }

    pub fn save(&self, root: &Path, user: &str, area: &str, project: &str) -> Result<()> {
        let path = paths::action_path(root, user, area, project, &self.id);
        let data = markdown::render(self, &self.body)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// List a project's actions, sorted by creation time.
    pub fn list(root: &Path, user: &str, area: &str, project: &str) -> Result<Vec<Self>> {
        paths::validate_slug(area)?;
        paths::validate_slug(project)?;
        if !paths::project_manifest(root, user, area, project).exists() {
            return Err(AmpError::ProjectNotFound(format!("{area}/{project}")));
        }
        let dir = paths::project_dir(root, user, area, project);

        let mut actions = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(stem) = name.strip_suffix(".md") else {
                continue;
            };
            // project.md is the manifest, not an action
            if !paths::is_valid_id(stem) {
                continue;
            }
            actions.push(Self::load(root, user, area, project, stem)?);
        }
        actions.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(actions)
    }

    pub fn delete(root: &Path, user: &str, area: &str, project: &str, id: &str) -> Result<()> {
        paths::validate_slug(area)?;
        paths::validate_slug(project)?;
        if !paths::is_valid_id(id) {
            return Err(AmpError::ActionNotFound(id.to_string()));
        }
        let path = paths::action_path(root, user, area, project, id);
        if !path.exists() {
            return Err(AmpError::ActionNotFound(id.to_string()));
        }
        std::fs::remove_file(path)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    pub fn complete(&mut self) {
        self.status = ActionStatus::Done;
        self.completed_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    pub fn reopen(&mut self) {
        self.status = ActionStatus::Next;
        self.completed_at = None;
        self.updated_at = Utc::now();
    }

    pub fn update_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.updated_at = Utc::now();
    }

    pub fn set_status(&mut self, status: ActionStatus) {
        if status != ActionStatus::Done {
            self.completed_at = None;
        }
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.updated_at = Utc::now();
    }

    pub fn set_due(&mut self, due: Option<NaiveDate>) {
        self.due = due;
        self.updated_at = Utc::now();
    }
}

/// Human-readable summary: "2/5 done, 3 open"
pub fn summarize(actions: &[Action]) -> String {
    let total = actions.len();
    let done = actions
        .iter()
        .filter(|a| a.status == ActionStatus::Done)
        .count();
    let open = actions.iter().filter(|a| a.status.is_open()).count();
    format!("{done}/{total} done, {open} open")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(dir: &TempDir) {
        crate::user::init(dir.path(), "alice").unwrap();
        crate::area::Area::create(dir.path(), "alice", "work", "Work", None).unwrap();
        crate::project::Project::create(dir.path(), "alice", "work", "launch", "Launch", None)
            .unwrap();
    }

    #[test]
    fn action_create_load() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        let action = Action::create(
            dir.path(),
            "alice",
            "work",
            "launch",
            "Draft announcement",
            "Keep it short.",
        )
        .unwrap();
        assert_eq!(action.status, ActionStatus::Next);
        assert_eq!(action.priority, Priority::Medium);

        let loaded = Action::load(dir.path(), "alice", "work", "launch", &action.id).unwrap();
        assert_eq!(loaded.title, "Draft announcement");
        assert_eq!(loaded.body, "Keep it short.\n");
    }

    #[test]
    fn action_rejects_path_shaped_segments() {
        let dir = TempDir::new().unwrap();
        setup(&dir);
        let id = crate::paths::new_id();

        assert!(matches!(
            Action::create(dir.path(), "alice", "../bob", "launch", "x", ""),
            Err(AmpError::InvalidSlug(_))
        ));
        assert!(matches!(
            Action::load(dir.path(), "alice", "work", "../inbox", &id),
            Err(AmpError::InvalidSlug(_))
        ));
        assert!(matches!(
            Action::delete(dir.path(), "alice", "../bob", "launch", &id),
            Err(AmpError::InvalidSlug(_))
        ));
    }

    #[test]
    fn action_requires_project() {
        let dir = TempDir::new().unwrap();
        crate::user::init(dir.path(), "alice").unwrap();
        assert!(matches!(
            Action::create(dir.path(), "alice", "work", "launch", "X", ""),
            Err(AmpError::ProjectNotFound(_))
        ));
    }

    #[test]
    fn action_complete_reopen() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        let mut action =
            Action::create(dir.path(), "alice", "work", "launch", "Ship it", "").unwrap();
        action.complete();
        assert_eq!(action.status, ActionStatus::Done);
        assert!(action.completed_at.is_some());

        action.reopen();
        assert_eq!(action.status, ActionStatus::Next);
        assert!(action.completed_at.is_none());
    }

    #[test]
    fn set_status_away_from_done_clears_completed_at() {
        let mut action = Action::new("x");
        action.complete();
        action.set_status(ActionStatus::Waiting);
        assert!(action.completed_at.is_none());
    }

    #[test]
    fn list_skips_project_manifest() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        Action::create(dir.path(), "alice", "work", "launch", "One", "").unwrap();
        Action::create(dir.path(), "alice", "work", "launch", "Two", "").unwrap();

        let actions = Action::list(dir.path(), "alice", "work", "launch").unwrap();
        assert_eq!(actions.len(), 2);
        assert!(actions.iter().all(|a| crate::paths::is_valid_id(&a.id)));
    }

    #[test]
    fn load_rejects_traversal_id() {
        let dir = TempDir::new().unwrap();
        setup(&dir);
        assert!(matches!(
            Action::load(dir.path(), "alice", "work", "launch", "../../settings"),
            Err(AmpError::ActionNotFound(_))
        ));
    }

    #[test]
    fn action_delete() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        let action = Action::create(dir.path(), "alice", "work", "launch", "Gone", "").unwrap();
        Action::delete(dir.path(), "alice", "work", "launch", &action.id).unwrap();
        assert!(matches!(
            Action::load(dir.path(), "alice", "work", "launch", &action.id),
            Err(AmpError::ActionNotFound(_))
        ));
    }

    #[test]
    fn summarize_counts() {
        let mut a = Action::new("a");
        a.complete();
        let b = Action::new("b");
        let mut c = Action::new("c");
        c.set_status(ActionStatus::Dropped);
        assert_eq!(summarize(&[a, b, c]), "1/3 done, 1 open");
    }

    #[test]
    fn due_date_roundtrip() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        let mut action =
            Action::create(dir.path(), "alice", "work", "launch", "Pay invoice", "").unwrap();
        action.set_due(NaiveDate::from_ymd_opt(2026, 9, 15));
        action.save(dir.path(), "alice", "work", "launch").unwrap();

        let loaded = Action::load(dir.path(), "alice", "work", "launch", &action.id).unwrap();
        assert_eq!(loaded.due, NaiveDate::from_ymd_opt(2026, 9, 15));
    }
}
