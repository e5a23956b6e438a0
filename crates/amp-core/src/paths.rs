use crate::error::{AmpError, Result};
use crate::types::ReviewCadence;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const USERS_DIR: &str = "users";
pub const INBOX_DIR: &str = "inbox";
pub const AREAS_DIR: &str = "areas";
pub const REVIEWS_DIR: &str = "reviews";

pub const SETTINGS_FILE: &str = "settings.toml";
pub const AREA_MANIFEST: &str = "area.md";
pub const PROJECT_MANIFEST: &str = "project.md";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn users_dir(root: &Path) -> PathBuf {
    root.join(USERS_DIR)
}

pub fn user_dir(root: &Path, user: &str) -> PathBuf {
    users_dir(root).join(user)
}

pub fn settings_path(root: &Path, user: &str) -> PathBuf {
    user_dir(root, user).join(SETTINGS_FILE)
}

pub fn inbox_dir(root: &Path, user: &str) -> PathBuf {
    user_dir(root, user).join(INBOX_DIR)
}

pub fn inbox_item_path(root: &Path, user: &str, id: &str) -> PathBuf {
    inbox_dir(root, user).join(format!("{id}.md"))
}

pub fn areas_dir(root: &Path, user: &str) -> PathBuf {
    user_dir(root, user).join(AREAS_DIR)
}

pub fn area_dir(root: &Path, user: &str, area: &str) -> PathBuf {
    areas_dir(root, user).join(area)
}

pub fn area_manifest(root: &Path, user: &str, area: &str) -> PathBuf {
    area_dir(root, user, area).join(AREA_MANIFEST)
}

pub fn project_dir(root: &Path, user: &str, area: &str, project: &str) -> PathBuf {
    area_dir(root, user, area).join(project)
}

pub fn project_manifest(root: &Path, user: &str, area: &str, project: &str) -> PathBuf {
    project_dir(root, user, area, project).join(PROJECT_MANIFEST)
}

pub fn action_path(root: &Path, user: &str, area: &str, project: &str, id: &str) -> PathBuf {
    project_dir(root, user, area, project).join(format!("{id}.md"))
}

pub fn reviews_dir(root: &Path, user: &str) -> PathBuf {
    user_dir(root, user).join(REVIEWS_DIR)
}

pub fn review_cadence_dir(root: &Path, user: &str, cadence: ReviewCadence) -> PathBuf {
    reviews_dir(root, user).join(cadence.as_str())
}

pub fn review_path(root: &Path, user: &str, cadence: ReviewCadence, key: &str) -> PathBuf {
    review_cadence_dir(root, user, cadence).join(format!("{key}.md"))
}

// ---------------------------------------------------------------------------
// Slug and id validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();
static ID_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

fn id_re() -> &'static Regex {
    // UUID v4 hyphenated, lowercase. Record ids double as filenames, so the
    // shape check also keeps path traversal out of URL segments.
    ID_RE.get_or_init(|| {
        Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
    })
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(AmpError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

pub fn is_valid_id(id: &str) -> bool {
    id_re().is_match(id)
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
