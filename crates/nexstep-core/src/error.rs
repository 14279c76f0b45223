//! Error types for the NexStep core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::TripStatus;

/// Comprehensive error type for all itinerary operations.
#[derive(Error, Debug)]
pub enum NexstepError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Trip not found for the given ID
    #[error("Trip with ID {id} not found")]
    TripNotFound { id: u64 },
    /// Day not found for the given ID
    #[error("Day with ID {id} not found")]
    DayNotFound { id: u64 },
    /// Activity not found for the given ID
    #[error("Activity with ID {id} not found")]
    ActivityNotFound { id: u64 },
    /// Flight or hotel stay not found for the given ID
    #[error("No {kind} with ID {id}")]
    BookingNotFound { kind: &'static str, id: u64 },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// Calendar or time zone arithmetic failed
    #[error("Time error: {message}")]
    Time {
        message: String,
        #[source]
        source: jiff::Error,
    },
    /// A compare-and-set status write found a different stored status
    #[error("Trip {id} status conflict: expected '{expected}', found '{actual}'")]
    StatusConflict {
        id: u64,
        expected: TripStatus,
        actual: TripStatus,
    },
    /// The re-optimization collaborator failed or returned an unusable payload
    #[error("Re-optimization failed: {message}")]
    Reoptimization { message: String },
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> NexstepError {
        NexstepError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl NexstepError {
    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a new database error with additional context.
    pub fn database_error(message: &str, source: rusqlite::Error) -> Self {
        Self::Database {
            message: message.to_string(),
            source,
        }
    }

    /// Wraps a jiff error raised while placing activities on the calendar.
    pub fn time_error(message: impl Into<String>, source: jiff::Error) -> Self {
        Self::Time {
            message: message.into(),
            source,
        }
    }

    /// Task join failures from `spawn_blocking` surface as configuration
    /// errors, matching how the builder reports them.
    pub(crate) fn join_error(error: tokio::task::JoinError) -> Self {
        Self::Configuration {
            message: format!("Task join error: {error}"),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| NexstepError::database_error(message, e))
    }
}

/// Extension trait for mapping jiff errors with a message.
pub trait TimeResultExt<T> {
    fn time_context(self, message: &str) -> Result<T>;
}

impl<T> TimeResultExt<T> for std::result::Result<T, jiff::Error> {
    fn time_context(self, message: &str) -> Result<T> {
        self.map_err(|e| NexstepError::time_error(message, e))
    }
}

/// Result type alias for NexStep operations
pub type Result<T> = std::result::Result<T, NexstepError>;
