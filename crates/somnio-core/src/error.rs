//! Error types and exit codes for somnio
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (persistence, IO)
//! - 2: Usage error (bad flags/args, out-of-range values)
//! - 3: Data/store error (missing store, unknown dream id)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the somnio CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error - missing store, unknown dream (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<rusqlite::Error> for SomnioError {
    fn from(err: rusqlite::Error) -> Self {
        SomnioError::CollaboratorFailure {
            operation: "query database".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Errors that can occur during somnio operations
#[derive(Error, Debug)]
pub enum SomnioError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidInput { context: String, value: String },

    // Data/store errors (exit code 3)
    #[error("store not found (searched from {search_root:?})")]
    StoreNotFound { search_root: PathBuf },

    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    // Generic failures (exit code 1)
    #[error("failed to {operation}: {reason}")]
    CollaboratorFailure { operation: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("background task failed: {0}")]
    TaskPanicked(String),
}

impl SomnioError {
    /// Create an error for a failed persistence operation
    pub fn collaborator(operation: &str, error: impl std::fmt::Display) -> Self {
        SomnioError::CollaboratorFailure {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value
    pub fn invalid_input(context: &str, value: impl std::fmt::Display) -> Self {
        SomnioError::InvalidInput {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        SomnioError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Whether this error came from the persistence collaborator
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, SomnioError::CollaboratorFailure { .. })
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            SomnioError::UsageError(_) | SomnioError::InvalidInput { .. } => ExitCode::Usage,

            SomnioError::StoreNotFound { .. } | SomnioError::NotFound { .. } => ExitCode::Data,

            SomnioError::CollaboratorFailure { .. }
            | SomnioError::Io(_)
            | SomnioError::Json(_)
            | SomnioError::Toml(_)
            | SomnioError::TomlSerialize(_)
            | SomnioError::TaskPanicked(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            SomnioError::UsageError(_) => "usage_error",
            SomnioError::InvalidInput { .. } => "invalid_input",
            SomnioError::StoreNotFound { .. } => "store_not_found",
            SomnioError::NotFound { .. } => "not_found",
            SomnioError::CollaboratorFailure { .. } => "collaborator_failure",
            SomnioError::Io(_) => "io_error",
            SomnioError::Json(_) => "json_error",
            SomnioError::Toml(_) | SomnioError::TomlSerialize(_) => "toml_error",
            SomnioError::TaskPanicked(_) => "task_panicked",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for somnio operations
pub type Result<T> = std::result::Result<T, SomnioError>;
