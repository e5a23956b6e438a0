use crate::error::{AmpError, Result};
use crate::markdown;
use crate::paths;
use crate::types::ProjectStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Project — a directory nested under an area, holding action files
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(skip)]
    pub slug: String,
    #[serde(skip)]
    pub area: String,
    pub title: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub body: String,
}

impl Project {
    pub fn new(
        area: impl Into<String>,
        slug: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            slug: slug.into(),
            area: area.into(),
            title: title.into(),
            status: ProjectStatus::Active,
            description: None,
            created_at: now,
            updated_at: now,
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
        slug: impl Into<String>,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self> {
        let slug = slug.into();
        paths::validate_slug(&slug)?;
        paths::validate_slug(area)?;

        // Parent area must exist; a project dir cannot dangle.
        if !paths::area_manifest(root, user, area).exists() {
            return Err(AmpError::AreaNotFound(area.to_string()));
        }

        let dir = paths::project_dir(root, user, area, &slug);
        if dir.exists() {
            return Err(AmpError::ProjectExists(slug));
        }

        let mut project = Self::new(area, slug, title);
        project.description = description;
        project.save(root, user)?;
        Ok(project)
    }

    pub fn load(root: &Path, user: &str, area: &str, slug: &str) -> Result<Self> {
        // Both segments come from URLs; reject anything path-shaped.
        paths::validate_slug(area)?;
        paths::validate_slug(slug)?;
        let manifest = paths::project_manifest(root, user, area, slug);
        if !manifest.exists() {
            return Err(AmpError::ProjectNotFound(format!("{area}/{slug}")));
        }
        let raw = std::fs::read_to_string(&manifest)?;
        let doc = markdown::parse::<Project>(&raw, &manifest)?;
        let mut project = doc.meta;
        project.slug = slug.to_string();
        project.area = area.to_string();
        project.body = doc.body;
        Ok(project)
    }

    pub fn save(&self, root: &Path, user: &str) -> Result<()> {
        let manifest = paths::project_manifest(root, user, &self.area, &self.slug);
        let data = markdown::render(self, &self.body)?;
        crate::io::atomic_write(&manifest, data.as_bytes())
    }

    /// List the projects inside one area, sorted by slug.
    pub fn list(root: &Path, user: &str, area: &str) -> Result<Vec<Self>> {
        paths::validate_slug(area)?;
        let dir = paths::area_dir(root, user, area);
        if !paths::area_manifest(root, user, area).exists() {
            return Err(AmpError::AreaNotFound(area.to_string()));
        }

        let mut projects = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let slug = entry.file_name().to_string_lossy().into_owned();
                if paths::validate_slug(&slug).is_err() {
                    continue;
                }
                match Self::load(root, user, area, &slug) {
                    Ok(p) => projects.push(p),
                    Err(AmpError::ProjectNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        projects.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(projects)
    }

    /// List every project across all areas, sorted by (area, slug).
    pub fn list_all(root: &Path, user: &str) -> Result<Vec<Self>> {
        let mut projects = Vec::new();
        for area in crate::area::Area::list(root, user)? {
            projects.extend(Self::list(root, user, &area.slug)?);
        }
        Ok(projects)
    }

    /// Delete a project directory with all its action files.
    pub fn delete(root: &Path, user: &str, area: &str, slug: &str) -> Result<()> {
        paths::validate_slug(area)?;
        paths::validate_slug(slug)?;
        if !paths::project_manifest(root, user, area, slug).exists() {
            return Err(AmpError::ProjectNotFound(format!("{area}/{slug}")));
        }
        std::fs::remove_dir_all(paths::project_dir(root, user, area, slug))?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub fn update_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.updated_at = Utc::now();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description.filter(|d| !d.trim().is_empty());
        self.updated_at = Utc::now();
    }

    pub fn set_status(&mut self, status: ProjectStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
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
    }

    #[test]
    fn project_create_load() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        let p = Project::create(dir.path(), "alice", "work", "launch", "Launch", None).unwrap();
        assert_eq!(p.status, ProjectStatus::Active);

        let loaded = Project::load(dir.path(), "alice", "work", "launch").unwrap();
        assert_eq!(loaded.title, "Launch");
        assert_eq!(loaded.area, "work");
    }

    #[test]
    fn project_requires_existing_area() {
        let dir = TempDir::new().unwrap();
        crate::user::init(dir.path(), "alice").unwrap();
        assert!(matches!(
            Project::create(dir.path(), "alice", "nope", "p", "P", None),
            Err(AmpError::AreaNotFound(_))
        ));
    }

    #[test]
    fn project_rejects_path_shaped_segments() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        assert!(matches!(
            Project::load(dir.path(), "alice", "../../bob/areas/work", "launch"),
            Err(AmpError::InvalidSlug(_))
        ));
        assert!(matches!(
            Project::list(dir.path(), "alice", "../../bob/areas/work"),
            Err(AmpError::InvalidSlug(_))
        ));
        assert!(matches!(
            Project::delete(dir.path(), "alice", "work", "../secrets"),
            Err(AmpError::InvalidSlug(_))
        ));
    }

    #[test]
    fn project_duplicate_fails() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        Project::create(dir.path(), "alice", "work", "launch", "Launch", None).unwrap();
        assert!(matches!(
            Project::create(dir.path(), "alice", "work", "launch", "Again", None),
            Err(AmpError::ProjectExists(_))
        ));
    }

    #[test]
    fn project_list_skips_plain_files() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        Project::create(dir.path(), "alice", "work", "launch", "Launch", None).unwrap();
        // area.md lives beside project dirs and must not be listed
        let projects = Project::list(dir.path(), "alice", "work").unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].slug, "launch");
    }

    #[test]
    fn project_list_all_spans_areas() {
        let dir = TempDir::new().unwrap();
        setup(&dir);
        crate::area::Area::create(dir.path(), "alice", "home", "Home", None).unwrap();

        Project::create(dir.path(), "alice", "work", "launch", "Launch", None).unwrap();
        Project::create(dir.path(), "alice", "home", "garden", "Garden", None).unwrap();

        let all = Project::list_all(dir.path(), "alice").unwrap();
        let pairs: Vec<_> = all
            .iter()
            .map(|p| (p.area.as_str(), p.slug.as_str()))
            .collect();
        assert_eq!(pairs, vec![("home", "garden"), ("work", "launch")]);
    }

    #[test]
    fn project_status_update_persists() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        let mut p = Project::create(dir.path(), "alice", "work", "launch", "Launch", None).unwrap();
        p.set_status(ProjectStatus::Someday);
        p.save(dir.path(), "alice").unwrap();

        let loaded = Project::load(dir.path(), "alice", "work", "launch").unwrap();
        assert_eq!(loaded.status, ProjectStatus::Someday);
    }

    #[test]
    fn project_delete() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        Project::create(dir.path(), "alice", "work", "launch", "Launch", None).unwrap();
        Project::delete(dir.path(), "alice", "work", "launch").unwrap();
        assert!(matches!(
            Project::load(dir.path(), "alice", "work", "launch"),
            Err(AmpError::ProjectNotFound(_))
        ));
    }
}
