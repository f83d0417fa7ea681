//! Unified application error type.
//! Storage backends, the conversation core, the scheduler and the CLI all
//! return AppError so failures propagate with `?` up to the caller that
//! decides whether to log and abort or to report to the user.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Storage
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Storage lock poisoned: {0}")]
    Poisoned(String),

    #[error("Settings record not initialized (run `rworklog init --owner <ID>`)")]
    SettingsMissing,

    // ---------------------------
    // Malformed input
    // ---------------------------
    #[error("Invalid instant payload: {0}")]
    InvalidInstant(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Unexpected callback payload: {0}")]
    UnexpectedPayload(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid conversation state: {0}")]
    InvalidState(String),

    // ---------------------------
    // Config
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Transport
    // ---------------------------
    #[error("Failed to deliver notification: {0}")]
    Transport(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl<T> From<std::sync::PoisonError<T>> for AppError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        AppError::Poisoned(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
