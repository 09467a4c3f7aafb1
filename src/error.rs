//! Error Types

use std::io;
use thiserror::Error;

/// Errors surfaced by timeline generation and database queries
#[derive(Error, Debug)]
pub enum WhereDbError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No usable samples after filtering; compaction cannot seed its
    /// first point and the generation run must abort
    #[error("No input samples after accuracy filtering")]
    EmptyInput,

    /// Database file does not have the expected array-of-triples shape
    #[error("Malformed database: {0}")]
    Format(String),

    /// Query invoked without a database path (flag or config)
    #[error("No database configured -- pass --db or set 'database_location' in the [storage] config section")]
    NoDatabaseConfigured,

    /// A date expression could not be parsed into a timestamp
    #[error("Could not parse '{0}' into a date")]
    DateParse(String),
}

/// Result type for wheredb operations
pub type Result<T> = std::result::Result<T, WhereDbError>;
