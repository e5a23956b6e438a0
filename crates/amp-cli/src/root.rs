use amp_core::AmpError;
use std::path::{Path, PathBuf};

/// Resolve the data root directory.
///
/// Priority:
/// 1. `--root` flag / `AMP_ROOT` env var (passed in as `explicit`)
/// 2. `~/.amp`
pub fn resolve_root(explicit: Option<&Path>) -> amp_core::Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    let home = home::home_dir().ok_or(AmpError::HomeNotFound)?;
    Ok(home.join(".amp"))
}
