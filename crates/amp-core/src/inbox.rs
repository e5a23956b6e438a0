use crate::action::Action;
use crate::error::{AmpError, Result};
use crate::markdown;
use crate::paths;
use crate::types::{InboxStatus, Priority};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// InboxItem — an unsorted captured note awaiting triage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxItem {
    #[serde(skip)]
    pub id: String,
    pub title: String,
    pub status: InboxStatus,
    pub captured_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triaged_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub body: String,
}

impl InboxItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: paths::new_id(),
            title: title.into(),
            status: InboxStatus::Open,
            captured_at: Utc::now(),
            triaged_at: None,
            body: String::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn capture(
        root: &Path,
        user: &str,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self> {
        crate::user::require(root, user)?;
        let mut item = Self::new(title);
        item.body = body.into();
        item.save(root, user)?;
        Ok(item)
    }

    pub fn load(root: &Path, user: &str, id: &str) -> Result<Self> {
        if !paths::is_valid_id(id) {
            return Err(AmpError::InboxItemNotFound(id.to_string()));
        }
        let path = paths::inbox_item_path(root, user, id);
        if !path.exists() {
            return Err(AmpError::InboxItemNotFound(id.to_string()));
        }
        let raw = std::fs::read_to_string(&path)?;
        let doc = markdown::parse::<InboxItem>(&raw, &path)?;
        let mut item = doc.meta;
        item.id = id.to_string();
        item.body = doc.body;
        Ok(item)
    }

    pub fn save(&self, root: &Path, user: &str) -> Result<()> {
        let path = paths::inbox_item_path(root, user, &self.id);
        let data = markdown::render(self, &self.body)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// List inbox items oldest-first (triage order).
    pub fn list(root: &Path, user: &str) -> Result<Vec<Self>> {
        let dir = paths::inbox_dir(root, user);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut items = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(stem) = name.strip_suffix(".md") else {
                continue;
            };
            if !paths::is_valid_id(stem) {
                continue;
            }
            items.push(Self::load(root, user, stem)?);
        }
        items.sort_by(|a, b| a.captured_at.cmp(&b.captured_at));
        Ok(items)
    }

    pub fn delete(root: &Path, user: &str, id: &str) -> Result<()> {
        if !paths::is_valid_id(id) {
            return Err(AmpError::InboxItemNotFound(id.to_string()));
        }
        let path = paths::inbox_item_path(root, user, id);
        if !path.exists() {
            return Err(AmpError::InboxItemNotFound(id.to_string()));
        }
        std::fs::remove_file(path)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub fn update_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn mark_triaged(&mut self) -> Result<()> {
        if self.status == InboxStatus::Triaged {
            return Err(AmpError::AlreadyTriaged(self.id.clone()));
        }
        self.status = InboxStatus::Triaged;
        self.triaged_at = Some(Utc::now());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Triage — turn an inbox item into an action under a project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TriageTarget<'a> {
    pub area: &'a str,
    pub project: &'a str,
    /// Override for the action title; defaults to the item title.
    pub title: Option<String>,
    pub priority: Option<Priority>,
}

/// Convert an open inbox item into an action in the target project.
///
/// The item file stays behind marked `triaged` so the capture trail is
/// preserved. The target project must already exist.
pub fn triage(root: &Path, user: &str, id: &str, target: TriageTarget<'_>) -> Result<Action> {
    let mut item = InboxItem::load(root, user, id)?;
    item.mark_triaged()?;

    let title = target.title.unwrap_or_else(|| item.title.clone());
    let mut action = Action::create(
        root,
        user,
        target.area,
        target.project,
        title,
        item.body.clone(),
    )?;
    if let Some(priority) = target.priority {
        action.set_priority(priority);
        action.save(root, user, target.area, target.project)?;
    }

    item.save(root, user)?;
    Ok(action)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionStatus;
    use tempfile::TempDir;

    fn setup(dir: &TempDir) {
        crate::user::init(dir.path(), "alice").unwrap();
        crate::area::Area::create(dir.path(), "alice", "work", "Work", None).unwrap();
        crate::project::Project::create(dir.path(), "alice", "work", "launch", "Launch", None)
            .unwrap();
    }

    #[test]
    fn capture_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        let item = InboxItem::capture(dir.path(), "alice", "Call dentist", "About Tuesday.")
            .unwrap();
        assert_eq!(item.status, InboxStatus::Open);

        let loaded = InboxItem::load(dir.path(), "alice", &item.id).unwrap();
        assert_eq!(loaded.title, "Call dentist");
        assert_eq!(loaded.body, "About Tuesday.\n");
    }

    #[test]
    fn capture_requires_user() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            InboxItem::capture(dir.path(), "ghost", "x", ""),
            Err(AmpError::UserNotFound(_))
        ));
    }

    #[test]
    fn list_oldest_first() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        let first = InboxItem::capture(dir.path(), "alice", "first", "").unwrap();
        // Force distinct captured_at by rewriting the second item's timestamp.
        let mut second = InboxItem::new("second");
        second.captured_at = first.captured_at + chrono::Duration::seconds(1);
        second.save(dir.path(), "alice").unwrap();

        let items = InboxItem::list(dir.path(), "alice").unwrap();
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn triage_creates_action_and_marks_item() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        let item = InboxItem::capture(dir.path(), "alice", "Write blog post", "Outline first.")
            .unwrap();
        let action = triage(
            dir.path(),
            "alice",
            &item.id,
            TriageTarget {
                area: "work",
                project: "launch",
                title: None,
                priority: Some(Priority::High),
            },
        )
        .unwrap();

        assert_eq!(action.title, "Write blog post");
        assert_eq!(action.status, ActionStatus::Next);

        let reloaded =
            Action::load(dir.path(), "alice", "work", "launch", &action.id).unwrap();
        assert_eq!(reloaded.priority, Priority::High);
        assert_eq!(reloaded.body, "Outline first.\n");

        let item = InboxItem::load(dir.path(), "alice", &item.id).unwrap();
        assert_eq!(item.status, InboxStatus::Triaged);
        assert!(item.triaged_at.is_some());
    }

    #[test]
    fn triage_twice_fails() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        let item = InboxItem::capture(dir.path(), "alice", "once", "").unwrap();
        let target = || TriageTarget {
            area: "work",
            project: "launch",
            title: None,
            priority: None,
        };
        triage(dir.path(), "alice", &item.id, target()).unwrap();
        assert!(matches!(
            triage(dir.path(), "alice", &item.id, target()),
            Err(AmpError::AlreadyTriaged(_))
        ));
    }

    #[test]
    fn triage_missing_project_leaves_item_open() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        let item = InboxItem::capture(dir.path(), "alice", "stray", "").unwrap();
        let err = triage(
            dir.path(),
            "alice",
            &item.id,
            TriageTarget {
                area: "work",
                project: "missing",
                title: None,
                priority: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, AmpError::ProjectNotFound(_)));

        // The triaged flag is only persisted after the action is created.
        let item = InboxItem::load(dir.path(), "alice", &item.id).unwrap();
        assert_eq!(item.status, InboxStatus::Open);
    }

    #[test]
    fn delete_missing_fails() {
        let dir = TempDir::new().unwrap();
        setup(&dir);
        assert!(matches!(
            InboxItem::delete(dir.path(), "alice", &paths::new_id()),
            Err(AmpError::InboxItemNotFound(_))
        ));
    }
}
