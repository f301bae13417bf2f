//! Error types for the planner crate.

use thiserror::Error;

/// Errors raised by the timetable core and its storage/config edges.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed archetype catalog or configuration file
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A model instance is missing a required field, or canonical JSON is malformed
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// SQLite failure inside the timetable store
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Reading a config or catalog file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Raw JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Error::Serialization {
            message: message.into(),
        }
    }

    /// Returns true if the error was caused by bad input rather than a failing collaborator.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Serialization { .. } | Error::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
