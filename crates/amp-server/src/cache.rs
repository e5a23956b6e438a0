use amp_core::error::Result;
use amp_core::settings::Settings;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const DEFAULT_FRESH_TTL: Duration = Duration::from_secs(5);
const DEFAULT_STALE_TTL: Duration = Duration::from_secs(30);

struct Entry {
    value: Arc<Settings>,
    fetched_at: Instant,
    /// Set while a background revalidation is in flight, so a burst of
    /// stale hits triggers only one re-read.
    revalidating: Arc<AtomicBool>,
}

/// In-process settings cache with stale-while-revalidate semantics,
/// keyed by user slug.
///
/// - within the fresh window: return the cached value, no disk read
/// - within the stale window: return the cached value immediately and
///   revalidate once in the background
/// - past both windows (or on a miss): read synchronously and store
pub struct SettingsCache {
    // Arc'd so background revalidation tasks can hold the map past 'self.
    entries: Arc<DashMap<String, Entry>>,
    fresh_ttl: Duration,
    stale_ttl: Duration,
}

impl SettingsCache {
    pub fn new() -> Self {
        Self::with_windows(DEFAULT_FRESH_TTL, DEFAULT_STALE_TTL)
    }

    /// `stale_ttl` is the extra window beyond `fresh_ttl` during which a
    /// stale value may still be served.
    pub fn with_windows(fresh_ttl: Duration, stale_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            fresh_ttl,
            stale_ttl,
        }
    }

    pub fn get(&self, root: &Path, user: &str) -> Result<Arc<Settings>> {
        if let Some(entry) = self.entries.get(user) {
            let age = entry.fetched_at.elapsed();
            if age < self.fresh_ttl {
                return Ok(entry.value.clone());
            }
            if age < self.fresh_ttl + self.stale_ttl {
                let value = entry.value.clone();
                let flag = entry.revalidating.clone();
                drop(entry);
                if flag
                    .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                {
                    self.revalidate(root.to_path_buf(), user.to_string(), flag);
                }
                return Ok(value);
            }
        }

        // Miss or fully expired: load on the caller's (blocking) path.
        let settings = Arc::new(Settings::load(root, user)?);
        self.store(user, settings.clone());
        Ok(settings)
    }

    pub fn invalidate(&self, user: &str) {
        self.entries.remove(user);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    fn store(&self, user: &str, value: Arc<Settings>) {
        self.entries.insert(
            user.to_string(),
            Entry {
                value,
                fetched_at: Instant::now(),
                revalidating: Arc::new(AtomicBool::new(false)),
            },
        );
    }

    fn revalidate(&self, root: PathBuf, user: String, flag: Arc<AtomicBool>) {
        // Inside a Tokio runtime the re-read goes to the blocking pool;
        // otherwise (sync tests) it runs inline.
        let entries = self.entries.clone();
        let work = move || {
            match Settings::load(&root, &user) {
                Ok(settings) => {
                    entries.insert(
                        user.clone(),
                        Entry {
                            value: Arc::new(settings),
                            fetched_at: Instant::now(),
                            revalidating: Arc::new(AtomicBool::new(false)),
                        },
                    );
                }
                Err(e) => {
                    // Keep serving the stale value; the next expired hit
                    // will surface the error.
                    tracing::warn!("settings revalidation failed for '{user}': {e}");
                    flag.store(false, Ordering::Release);
                }
            }
        };
        if tokio::runtime::Handle::try_current().is_ok() {
            tokio::task::spawn_blocking(work);
        } else {
            work();
        }
    }
}

impl Default for SettingsCache {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
