use crate::error::{AmpError, Result};
use crate::markdown;
use crate::paths;
use crate::types::ReviewCadence;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Key computation
// ---------------------------------------------------------------------------

/// Compute the journal key for a cadence and date.
///
/// daily → `2026-08-27`, weekly → `2026-W35` (ISO week-year), monthly → `2026-08`.
pub fn key_for(cadence: ReviewCadence, date: NaiveDate) -> String {
    match cadence {
        ReviewCadence::Daily => date.format("%Y-%m-%d").to_string(),
        ReviewCadence::Weekly => {
            let iso = date.iso_week();
            format!("{}-W{:02}", iso.year(), iso.week())
        }
        ReviewCadence::Monthly => date.format("%Y-%m").to_string(),
    }
}

fn key_patterns() -> &'static [(ReviewCadence, regex::Regex)] {
    static PATTERNS: OnceLock<Vec<(ReviewCadence, regex::Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            (
                ReviewCadence::Daily,
                regex::Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap(),
            ),
            (
                ReviewCadence::Weekly,
                regex::Regex::new(r"^\d{4}-W\d{2}$").unwrap(),
            ),
            (
                ReviewCadence::Monthly,
                regex::Regex::new(r"^\d{4}-\d{2}$").unwrap(),
            ),
        ]
    })
}

pub fn validate_key(cadence: ReviewCadence, key: &str) -> Result<()> {
    let ok = key_patterns()
        .iter()
        .find(|(c, _)| *c == cadence)
        .map(|(_, re)| re.is_match(key))
        .unwrap_or(false);
    if !ok {
        return Err(AmpError::InvalidReviewKey {
            cadence: cadence.to_string(),
            key: key.to_string(),
        });
    }
    Ok(())
}

fn template_body(cadence: ReviewCadence) -> &'static str {
    match cadence {
        ReviewCadence::Daily => {
            "## What moved today\n\n## What's stuck\n\n## Tomorrow's first action\n"
        }
        ReviewCadence::Weekly => {
            "## Inbox to zero\n\n## Project-by-project sweep\n\n## Someday/maybe\n\n## Wins\n"
        }
        ReviewCadence::Monthly => "## Areas check-in\n\n## Goals drift\n\n## Prune list\n",
    }
}

// ---------------------------------------------------------------------------
// Review — a periodic markdown journal entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub cadence: ReviewCadence,
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub body: String,
}

impl Review {
    /// Open the entry for `date`, creating it with a template body when it
    /// doesn't exist yet. Returns (review, created).
    pub fn open_or_create(
        root: &Path,
        user: &str,
        cadence: ReviewCadence,
        date: NaiveDate,
    ) -> Result<(Self, bool)> {
        crate::user::require(root, user)?;
        let key = key_for(cadence, date);
        match Self::load(root, user, cadence, &key) {
            Ok(review) => Ok((review, false)),
            Err(AmpError::ReviewNotFound(_)) => {
                let now = Utc::now();
                let review = Self {
                    cadence,
                    key,
                    created_at: now,
                    updated_at: now,
                    body: template_body(cadence).to_string(),
                };
                review.save(root, user)?;
                Ok((review, true))
            }
            Err(e) => Err(e),
        }
    }

    pub fn load(root: &Path, user: &str, cadence: ReviewCadence, key: &str) -> Result<Self> {
        validate_key(cadence, key)?;
        let path = paths::review_path(root, user, cadence, key);
        if !path.exists() {
            return Err(AmpError::ReviewNotFound(format!("{cadence}/{key}")));
        }
        let raw = std::fs::read_to_string(&path)?;

        // Journals get hand-edited; tolerate a stripped front-matter fence by
        // treating the whole file as body.
        match markdown::split_front_matter(&raw) {
            Some(_) => {
                let doc = markdown::parse::<Review>(&raw, &path)?;
                let mut review = doc.meta;
                review.body = doc.body;
                Ok(review)
            }
            None => {
                let modified: DateTime<Utc> = std::fs::metadata(&path)?.modified()?.into();
                Ok(Self {
                    cadence,
                    key: key.to_string(),
                    created_at: modified,
                    updated_at: modified,
                    body: raw,
                })
            }
        }
    }

    pub fn save(&self, root: &Path, user: &str) -> Result<()> {
        let path = paths::review_path(root, user, self.cadence, &self.key);
        let data = markdown::render(self, &self.body)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
        self.updated_at = Utc::now();
    }

    /// List entries for one cadence, newest key first.
    pub fn list(root: &Path, user: &str, cadence: ReviewCadence) -> Result<Vec<Self>> {
        let dir = paths::review_cadence_dir(root, user, cadence);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut reviews = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(key) = name.strip_suffix(".md") else {
                continue;
            };
            if validate_key(cadence, key).is_err() {
                continue;
            }
            reviews.push(Self::load(root, user, cadence, key)?);
        }
        // Keys are zero-padded so lexicographic order is chronological.
        reviews.sort_by(|a, b| b.key.cmp(&a.key));
        Ok(reviews)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
