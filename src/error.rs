//! Error types for the Hybrid Todo CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=storage, 3=not_found, 4=validation, etc.)
//! - Retryability flags
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers
//!
//! Corrupt persisted patch data is deliberately absent here: the patch
//! store recovers it as an empty set and only logs it.

use thiserror::Error;

/// Result type alias for Hybrid Todo operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Storage (exit 2)
    StorageError,

    // Not Found (exit 3)
    TodoNotFound,

    // Validation (exit 4)
    ValidationError,
    InvalidArgument,

    // Remote (exit 6)
    FetchError,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::StorageError => "STORAGE_ERROR",
            Self::TodoNotFound => "TODO_NOT_FOUND",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::FetchError => "FETCH_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::StorageError => 2,
            Self::TodoNotFound => 3,
            Self::ValidationError | Self::InvalidArgument => 4,
            Self::FetchError => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether the caller may succeed by retrying with corrected input.
    ///
    /// Fetch errors are retryable by the user; nothing retries them
    /// automatically.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ValidationError | Self::InvalidArgument | Self::FetchError
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in Hybrid Todo operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to fetch todos: {message}")]
    Fetch {
        /// HTTP status code, when the server answered at all.
        status: Option<u16>,
        message: String,
    },

    #[error("Todo not found: {id}")]
    TodoNotFound { id: i64 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Fetch { .. } => ErrorCode::FetchError,
            Self::TodoNotFound { .. } => ErrorCode::TodoNotFound,
            Self::Validation(_) => ErrorCode::ValidationError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Storage(_) => ErrorCode::StorageError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Fetch { status: None, .. } => Some(
                "Could not reach the todo API. Check your connection or \
                 override the endpoint with --endpoint / HTODO_ENDPOINT."
                    .to_string(),
            ),
            Self::Fetch {
                status: Some(code), ..
            } if *code >= 500 => {
                Some("The todo API is having trouble. Try again later.".to_string())
            }
            Self::Fetch { .. } => None,

            Self::TodoNotFound { id } => Some(format!(
                "No visible todo with ID {id}. Use `htodo list --status all` to see \
                 available todos; deleted todos stay hidden until `htodo reset --yes`."
            )),

            Self::Validation(msg) if msg.contains("empty") => {
                Some("Provide some non-whitespace text for the todo.".to_string())
            }

            Self::InvalidArgument(msg) => {
                if msg.contains("status") {
                    Some("Valid statuses: all, completed, pending".to_string())
                } else if msg.contains("config key") {
                    Some(format!(
                        "Valid keys: {}",
                        crate::config::SETTING_KEYS.join(", ")
                    ))
                } else {
                    None
                }
            }

            Self::Validation(_)
            | Self::Storage(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Config(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
