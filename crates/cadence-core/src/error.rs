//! Error types for the routine library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all routine operations.
#[derive(Error, Debug)]
pub enum RoutineError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Step not present in the catalog
    #[error("Step with ID {id} not found")]
    StepNotFound { id: u32 },
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
    /// A completed walk-through could not be written to the session store.
    ///
    /// The walk-through itself is finished; the record is still held by the
    /// controller and can be written again with `retry_save`.
    #[error("Session {session_id} was completed but not saved: {source}")]
    SessionNotSaved {
        session_id: String,
        #[source]
        source: Box<RoutineError>,
    },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> RoutineError {
        RoutineError::Database {
            message: self.message,
            source,
        }
    }
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
    pub fn with_reason(self, reason: impl Into<String>) -> RoutineError {
        RoutineError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl RoutineError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// True when SQLite reports the file is not a database or is corrupt.
    pub fn is_corrupt_database(&self) -> bool {
        matches!(
            self,
            Self::Database { source, .. }
                if matches!(
                    source.sqlite_error_code(),
                    Some(rusqlite::ErrorCode::NotADatabase | rusqlite::ErrorCode::DatabaseCorrupt)
                )
        )
    }

    /// Wraps a join failure from a blocking task.
    pub(crate) fn join(error: tokio::task::JoinError) -> Self {
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
        self.map_err(|e| RoutineError::database(message).with_source(e))
    }
}

/// Extension trait for attaching a path to I/O failures.
pub trait FileSystemResultExt<T> {
    /// Map I/O errors to [`RoutineError::FileSystem`] for `path`.
    fn fs_context(self, path: &std::path::Path) -> Result<T>;
}

impl<T> FileSystemResultExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, path: &std::path::Path) -> Result<T> {
        self.map_err(|source| RoutineError::FileSystem {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Result type alias for routine operations
pub type Result<T> = std::result::Result<T, RoutineError>;
