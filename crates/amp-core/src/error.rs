use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmpError {
    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("user already exists: {0}")]
    UserExists(String),

    #[error("inbox item not found: {0}")]
    InboxItemNotFound(String),

    #[error("inbox item already triaged: {0}")]
    AlreadyTriaged(String),

    #[error("area not found: {0}")]
    AreaNotFound(String),

    #[error("area already exists: {0}")]
    AreaExists(String),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("project already exists: {0}")]
    ProjectExists(String),

    #[error("action not found: {0}")]
    ActionNotFound(String),

    #[error("review entry not found: {0}")]
    ReviewNotFound(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("invalid priority: {0}")]
    InvalidPriority(String),

    #[error("invalid review cadence: {0}")]
    InvalidCadence(String),

    #[error("invalid review key '{key}' for cadence '{cadence}'")]
    InvalidReviewKey { cadence: String, key: String },

    #[error("malformed record at {path}: {reason}")]
    MalformedRecord { path: String, reason: String },

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("settings parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("settings serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, AmpError>;
