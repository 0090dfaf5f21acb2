use std::path::PathBuf;

/// Unified error type for the querydeck crate.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("query rejected: {0}")]
    QueryRejected(String),

    #[error("not found: {0}")]
    NotFound(PathBuf),

    #[error("config error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("not implemented")]
    NotImplemented,
}

/// Result type alias using [`DashboardError`].
pub type Result<T> = std::result::Result<T, DashboardError>;
