//! The unified error type for the shell.

use std::path::PathBuf;

use thiserror::Error;

use super::category::ErrorCategory;

/// Every failure the shell can report.
///
/// None of these are surfaced to the end user as an error page: routing
/// failures degrade to the default page and callback failures are logged.
#[derive(Debug, Error)]
pub enum ShellError {
    /// A subscriber or page hook returned an error.
    #[error("{context} failed: {message}")]
    Callback { context: String, message: String },

    /// A subscriber or page hook panicked.
    #[error("{context} panicked: {message}")]
    CallbackPanicked { context: String, message: String },

    /// An action name with no matching [`FileAction`](crate::pages::FileAction).
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// A known action with no handler registered in the dispatch table.
    #[error("no handler registered for action: {0}")]
    UnhandledAction(String),

    /// Persisted key/value storage could not be read or written.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The home directory could not be determined.
    #[error("could not determine home directory")]
    NoHomeDirectory,

    /// JSON payload or persisted data could not be decoded.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A console line that does not parse as a command.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// Invalid configuration value.
    #[error("invalid configuration for {key}: {message}")]
    Config { key: String, message: String },
}

impl ShellError {
    /// Convenience constructor for hook and subscriber failures.
    pub fn callback(context: impl Into<String>, message: impl Into<String>) -> Self {
        ShellError::Callback {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Get the error category for handling decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ShellError::Callback { .. } | ShellError::CallbackPanicked { .. } => {
                ErrorCategory::Callback
            }
            ShellError::UnknownAction(_) | ShellError::InvalidCommand(_) => ErrorCategory::User,
            ShellError::UnhandledAction(_) => ErrorCategory::Client,
            ShellError::Storage { .. } | ShellError::NoHomeDirectory => ErrorCategory::System,
            ShellError::Json(_) => ErrorCategory::Data,
            ShellError::Config { .. } => ErrorCategory::Configuration,
        }
    }

    /// Get a stable error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ShellError::Callback { .. } => "CALLBACK_FAILED",
            ShellError::CallbackPanicked { .. } => "CALLBACK_PANICKED",
            ShellError::UnknownAction(_) => "UNKNOWN_ACTION",
            ShellError::UnhandledAction(_) => "UNHANDLED_ACTION",
            ShellError::Storage { .. } => "STORAGE_IO",
            ShellError::NoHomeDirectory => "NO_HOME_DIR",
            ShellError::Json(_) => "INVALID_JSON",
            ShellError::InvalidCommand(_) => "INVALID_COMMAND",
            ShellError::Config { .. } => "INVALID_CONFIG",
        }
    }

    /// Check if the shell can keep running after this error.
    pub fn is_recoverable(&self) -> bool {
        self.category().is_recoverable()
    }
}
