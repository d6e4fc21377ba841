//! Error types for taskmeter-core

use thiserror::Error;

/// Main error type for the taskmeter-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Authentication/session error
    #[error("auth error: {0}")]
    Auth(String),

    /// Task not found
    #[error("task not found: {0}")]
    TaskNotFound(String),

    /// Routine not found
    #[error("routine not found: {0}")]
    RoutineNotFound(String),
}

/// Result type alias for taskmeter-core
pub type Result<T> = std::result::Result<T, Error>;
