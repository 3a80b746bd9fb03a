// src/error.rs

//! Unified error handling for the jobstack application.

use std::fmt;

use thiserror::Error;

/// Result type alias for jobstack operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Malformed tech-stack query
    #[error("Query syntax error: {0}")]
    Query(#[from] QueryError),

    /// Snapshot file has an unexpected shape
    #[error("Invalid snapshot {path}: {message}")]
    Snapshot { path: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a snapshot shape error.
    pub fn snapshot(path: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Snapshot {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Syntax error raised while parsing a tech-stack query.
///
/// Positions are byte offsets into the raw query string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("empty query")]
    Empty,

    #[error("unexpected '{found}' at position {position}")]
    UnexpectedToken { found: String, position: usize },

    #[error("operator {operator} at position {position} is missing an operand")]
    MissingOperand { operator: String, position: usize },

    #[error("parenthesis opened at position {position} is never closed")]
    UnclosedParen { position: usize },

    #[error("unmatched ')' at position {position}")]
    UnmatchedParen { position: usize },

    #[error("query nests more than {limit} levels deep at position {position}")]
    TooDeep { limit: usize, position: usize },

    #[error("query has more than {limit} tokens; token at position {position} is over the limit")]
    TooLong { limit: usize, position: usize },
}

impl QueryError {
    /// Byte offset of the offending token, when there is one.
    pub fn position(&self) -> Option<usize> {
        match self {
            QueryError::Empty => None,
            QueryError::UnexpectedToken { position, .. }
            | QueryError::MissingOperand { position, .. }
            | QueryError::UnclosedParen { position }
            | QueryError::UnmatchedParen { position }
            | QueryError::TooDeep { position, .. }
            | QueryError::TooLong { position, .. } => Some(*position),
        }
    }
}
