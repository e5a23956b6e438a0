use crate::cache::SettingsCache;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Data root; user directories live under `<root>/users/`.
    pub root: PathBuf,
    pub settings_cache: Arc<SettingsCache>,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            settings_cache: Arc::new(SettingsCache::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_stores_root() {
        let state = AppState::new(PathBuf::from("/tmp/amp-data"));
        assert_eq!(state.root, PathBuf::from("/tmp/amp-data"));
    }
}
