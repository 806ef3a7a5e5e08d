//! Error category classification.
//!
//! Categories let callers decide how loudly to report a failure without
//! matching on every concrete variant.

use std::fmt;

/// High-level categorization of shell errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A page hook or subscriber reported a failure.
    /// The shell isolates these and keeps running.
    Callback,

    /// Programming-contract violations (bad dispatch tables, invalid state).
    Client,

    /// The user triggered something the shell does not know about.
    User,

    /// Filesystem or OS errors (persisted route memory).
    System,

    /// Malformed telemetry or persisted data.
    Data,

    /// Invalid configuration values.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if the shell can continue after an error of this category.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ErrorCategory::Configuration)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Callback => "callback",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
            ErrorCategory::System => "system",
            ErrorCategory::Data => "data",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Returns a user-friendly description of the category.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCategory::Callback => "A page failed to handle an update",
            ErrorCategory::Client => "Application error",
            ErrorCategory::User => "Unsupported action",
            ErrorCategory::System => "System error",
            ErrorCategory::Data => "Malformed data",
            ErrorCategory::Configuration => "Configuration problem",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
