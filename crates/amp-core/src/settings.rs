use crate::error::Result;
use crate::paths;
use crate::types::WeekStart;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ReviewSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSettings {
    #[serde(default = "default_true")]
    pub daily_enabled: bool,
    #[serde(default = "default_true")]
    pub weekly_enabled: bool,
    #[serde(default)]
    pub monthly_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            daily_enabled: true,
            weekly_enabled: true,
            monthly_enabled: false,
        }
    }
}

// ---------------------------------------------------------------------------
// InboxSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InboxSettings {
    /// Days after which triaged items may be auto-archived. 0 = never.
    #[serde(default)]
    pub auto_archive_days: u32,
}

// ---------------------------------------------------------------------------
// Settings (top-level, one settings.toml per user)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub week_starts_on: WeekStart,
    #[serde(default)]
    pub review: ReviewSettings,
    #[serde(default)]
    pub inbox: InboxSettings,
}

fn default_version() -> u32 {
    1
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 1,
            display_name: None,
            timezone: default_timezone(),
            week_starts_on: WeekStart::Monday,
            review: ReviewSettings::default(),
            inbox: InboxSettings::default(),
        }
    }
}

/// Partial update applied over existing settings. Absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub week_starts_on: Option<WeekStart>,
    #[serde(default)]
    pub review: Option<ReviewSettings>,
    #[serde(default)]
    pub inbox: Option<InboxSettings>,
}

impl Settings {
    /// Load a user's settings. A missing file yields the defaults; the file
    /// is only created once something is saved.
    pub fn load(root: &Path, user: &str) -> Result<Self> {
        let path = paths::settings_path(root, user);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let settings: Settings = toml::from_str(&data)?;
        Ok(settings)
    }

    pub fn save(&self, root: &Path, user: &str) -> Result<()> {
        let path = paths::settings_path(root, user);
        let data = toml::to_string_pretty(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(name) = update.display_name {
            let name = name.trim().to_string();
            self.display_name = if name.is_empty() { None } else { Some(name) };
        }
        if let Some(tz) = update.timezone {
            self.timezone = tz;
        }
        if let Some(ws) = update.week_starts_on {
            self.week_starts_on = ws;
        }
        if let Some(review) = update.review {
            self.review = review;
        }
        if let Some(inbox) = update.inbox {
            self.inbox = inbox;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(dir.path(), "alice").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.timezone, "UTC");
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.display_name = Some("Alice".to_string());
        settings.timezone = "Europe/Berlin".to_string();
        settings.review.monthly_enabled = true;
        settings.save(dir.path(), "alice").unwrap();

        let loaded = Settings::load(dir.path(), "alice").unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn unknown_keys_ignored() {
        let dir = TempDir::new().unwrap();
        let path = crate::paths::settings_path(dir.path(), "alice");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "version = 1\nfuture_flag = true\n").unwrap();
        let settings = Settings::load(dir.path(), "alice").unwrap();
        assert_eq!(settings.version, 1);
    }

    #[test]
    fn apply_merges_partial_update() {
        let mut settings = Settings::default();
        settings.apply(SettingsUpdate {
            display_name: Some("Bob".to_string()),
            timezone: None,
            ..Default::default()
        });
        assert_eq!(settings.display_name.as_deref(), Some("Bob"));
        assert_eq!(settings.timezone, "UTC");
    }

    #[test]
    fn apply_blank_display_name_clears() {
        let mut settings = Settings::default();
        settings.display_name = Some("Alice".to_string());
        settings.apply(SettingsUpdate {
            display_name: Some("   ".to_string()),
            ..Default::default()
        });
        assert!(settings.display_name.is_none());
    }

    #[test]
    fn review_settings_defaults() {
        let r = ReviewSettings::default();
        assert!(r.daily_enabled);
        assert!(r.weekly_enabled);
        assert!(!r.monthly_enabled);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str("display_name = \"Alice\"").unwrap();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.timezone, "UTC");
        assert!(settings.review.daily_enabled);
    }
}
