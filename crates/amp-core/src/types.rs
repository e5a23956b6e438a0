use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// InboxStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboxStatus {
    Open,
    Triaged,
}

impl fmt::Display for InboxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InboxStatus::Open => "open",
            InboxStatus::Triaged => "triaged",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// ActionStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Next,
    Waiting,
    Scheduled,
    Done,
    Dropped,
}

impl ActionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionStatus::Next => "next",
            ActionStatus::Waiting => "waiting",
            ActionStatus::Scheduled => "scheduled",
            ActionStatus::Done => "done",
            ActionStatus::Dropped => "dropped",
        }
    }

    /// True for statuses that still demand attention.
    pub fn is_open(self) -> bool {
        matches!(
            self,
            ActionStatus::Next | ActionStatus::Waiting | ActionStatus::Scheduled
        )
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionStatus {
    type Err = crate::error::AmpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next" => Ok(ActionStatus::Next),
            "waiting" => Ok(ActionStatus::Waiting),
            "scheduled" => Ok(ActionStatus::Scheduled),
            "done" => Ok(ActionStatus::Done),
            "dropped" => Ok(ActionStatus::Dropped),
            _ => Err(crate::error::AmpError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = crate::error::AmpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(crate::error::AmpError::InvalidPriority(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Someday,
    Done,
    Dropped,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Someday => "someday",
            ProjectStatus::Done => "done",
            ProjectStatus::Dropped => "dropped",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = crate::error::AmpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ProjectStatus::Active),
            "someday" => Ok(ProjectStatus::Someday),
            "done" => Ok(ProjectStatus::Done),
            "dropped" => Ok(ProjectStatus::Dropped),
            _ => Err(crate::error::AmpError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ReviewCadence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewCadence {
    Daily,
    Weekly,
    Monthly,
}

impl ReviewCadence {
    pub fn all() -> &'static [ReviewCadence] {
        &[
            ReviewCadence::Daily,
            ReviewCadence::Weekly,
            ReviewCadence::Monthly,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReviewCadence::Daily => "daily",
            ReviewCadence::Weekly => "weekly",
            ReviewCadence::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ReviewCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReviewCadence {
    type Err = crate::error::AmpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(ReviewCadence::Daily),
            "weekly" => Ok(ReviewCadence::Weekly),
            "monthly" => Ok(ReviewCadence::Monthly),
            _ => Err(crate::error::AmpError::InvalidCadence(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// WeekStart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WeekStart::Monday => "monday",
            WeekStart::Sunday => "sunday",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
