use crate::error::{AmpError, Result};
use crate::markdown;
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Area — top-level life/work category, a directory under areas/
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    #[serde(skip)]
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub body: String,
}

impl Area {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            slug: slug.into(),
            title: title.into(),
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
        slug: impl Into<String>,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self> {
        let slug = slug.into();
        paths::validate_slug(&slug)?;
        crate::user::require(root, user)?;

        let dir = paths::area_dir(root, user, &slug);
        if dir.exists() {
            return Err(AmpError::AreaExists(slug));
        }

        let mut area = Self::new(slug, title);
        area.description = description;
        area.save(root, user)?;
        Ok(area)
    }

    pub fn load(root: &Path, user: &str, slug: &str) -> Result<Self> {
        // Slugs come straight from URL segments; the shape check keeps
        // `../` out of the filesystem path.
        paths::validate_slug(slug)?;
        let manifest = paths::area_manifest(root, user, slug);
        if !manifest.exists() {
            return Err(AmpError::AreaNotFound(slug.to_string()));
        }
        let raw = std::fs::read_to_string(&manifest)?;
        let doc = markdown::parse::<Area>(&raw, &manifest)?;
        let mut area = doc.meta;
        area.slug = slug.to_string();
        area.body = doc.body;
        Ok(area)
    }

    pub fn save(&self, root: &Path, user: &str) -> Result<()> {
        let manifest = paths::area_manifest(root, user, &self.slug);
        let data = markdown::render(self, &self.body)?;
        crate::io::atomic_write(&manifest, data.as_bytes())
    }

    /// List all areas for a user, sorted by slug.
    pub fn list(root: &Path, user: &str) -> Result<Vec<Self>> {
        let dir = paths::areas_dir(root, user);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut areas = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let slug = entry.file_name().to_string_lossy().into_owned();
                if paths::validate_slug(&slug).is_err() {
                    continue;
                }
                match Self::load(root, user, &slug) {
                    Ok(a) => areas.push(a),
                    Err(AmpError::AreaNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        areas.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(areas)
    }

    /// Delete an area and everything nested under it. There is no referential
    /// integrity between records, so the subtree goes with the manifest.
    pub fn delete(root: &Path, user: &str, slug: &str) -> Result<()> {
        paths::validate_slug(slug)?;
        let dir = paths::area_dir(root, user, slug);
        if !paths::area_manifest(root, user, slug).exists() {
            return Err(AmpError::AreaNotFound(slug.to_string()));
        }
        std::fs::remove_dir_all(&dir)?;
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
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
