//! Error types for itinerary loading
//!
//! Errors are classified by who can fix them:
//! - User errors: malformed activity or config files, timestamps, dates, zones
//! - Environment errors: unreadable files, missing home directory

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading configuration or activity data.
///
/// Overlap detection itself is infallible; everything here happens before
/// the activities reach it.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("IO error on {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected activities document: {0}")]
    InvalidDocument(String),

    #[error("Activity row {index} ({id}): {message}")]
    InvalidRow {
        index: usize,
        id: String,
        message: String,
    },

    #[error("Activity {id}: invalid {field} timestamp {value:?}")]
    InvalidTimestamp {
        id: String,
        field: &'static str,
        value: String,
    },

    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Invalid config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PlannerError {
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        PlannerError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Returns true if the input or invocation is at fault
    pub fn is_user_error(&self) -> bool {
        !matches!(self, PlannerError::Io { .. } | PlannerError::Config(_))
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PlannerError::Io { .. } => "Check the file path and its permissions.",
            PlannerError::Json(_) => "Check the activities file is valid JSON.",
            PlannerError::InvalidDocument(_) => {
                "Provide an array of activities or an object with an \"activities\" array."
            }
            PlannerError::InvalidRow { .. } => {
                "Fix the named field in that activity row; text fields must be strings and position a whole number."
            }
            PlannerError::InvalidTimestamp { .. } => {
                "Use RFC 3339 timestamps such as 2026-05-02T09:30:00+02:00."
            }
            PlannerError::InvalidDate(_) => "Use a calendar date such as 2026-05-02.",
            PlannerError::UnknownTimezone(_) => {
                "Use an IANA zone name such as Europe/Paris or UTC."
            }
            PlannerError::ConfigParse { .. } => {
                "Fix the config file named above; it must be a JSON object with camelCase keys."
            }
            PlannerError::Config(_) => "Check that a home directory is available for ~/.tripplan.",
        }
    }
}
