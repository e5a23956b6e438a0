use crate::error::{AmpError, Result};
use crate::io;
use crate::paths;
use crate::settings::Settings;
use crate::types::ReviewCadence;
use std::path::Path;

/// Scaffold a new user directory: inbox/, areas/, reviews/<cadence>/ and a
/// default settings.toml.
pub fn init(root: &Path, slug: &str) -> Result<()> {
    paths::validate_slug(slug)?;

    let dir = paths::user_dir(root, slug);
    if dir.exists() {
        return Err(AmpError::UserExists(slug.to_string()));
    }

    io::ensure_dir(&paths::inbox_dir(root, slug))?;
    io::ensure_dir(&paths::areas_dir(root, slug))?;
    for cadence in ReviewCadence::all() {
        io::ensure_dir(&paths::review_cadence_dir(root, slug, *cadence))?;
    }
    Settings::default().save(root, slug)?;
    Ok(())
}

pub fn exists(root: &Path, slug: &str) -> bool {
    paths::validate_slug(slug).is_ok() && paths::user_dir(root, slug).is_dir()
}

/// Error-returning variant of `exists` for call sites that need the user.
pub fn require(root: &Path, slug: &str) -> Result<()> {
    paths::validate_slug(slug)?;
    if !paths::user_dir(root, slug).is_dir() {
        return Err(AmpError::UserNotFound(slug.to_string()));
    }
    Ok(())
}

/// List user slugs, sorted.
pub fn list(root: &Path) -> Result<Vec<String>> {
    let dir = paths::users_dir(root);
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut users = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            let slug = entry.file_name().to_string_lossy().into_owned();
            if paths::validate_slug(&slug).is_ok() {
                users.push(slug);
            }
        }
    }
    users.sort();
    Ok(users)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
