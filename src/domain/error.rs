//! Domain-level error types for wcb-privacy.
//!
//! The export core has no failure modes of its own; these errors come from
//! the content store, configuration and CLI plumbing and are propagated
//! untouched through the exporters.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by an export or erase request.
#[derive(Error, Debug)]
pub enum AppError {
    /// No content database at the configured path; `import` creates one.
    #[error("Content database not found at: {path}")]
    DatabaseNotFound { path: PathBuf },

    /// The content store rejected a query or insert.
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Stored content the exporters cannot represent, such as a negative
    /// post id, or a collaborator that reported unusable data.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// A registered callback still reported more pages after the request's
    /// page limit.
    #[error("{callback} not done after {max_pages} pages")]
    PageLimit { callback: String, max_pages: u32 },

    /// A fixture could not be parsed, or a report could not be rendered.
    #[error("JSON error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Unreadable or invalid `config.toml`, or a bad command-line value.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Reading a fixture or writing an export file failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Wraps a `rusqlite` error, keeping it as the source.
    pub fn database(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Wraps a `serde_json` error, keeping it as the source.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// IO error with a description of what was being read or written.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
