//! Error handling for the shell.
//!
//! - **Error Categories**: High-level classification for reporting decisions
//! - **Unified Error Type**: [`ShellError`] covers every failure the shell reports
//! - **Isolation**: [`isolate`] wraps consumer callbacks so one faulty page
//!   cannot break navigation for the others
//!
//! # Taxonomy
//!
//! | Source | Handling |
//! |--------|----------|
//! | Malformed or unknown route | Default page substituted, logged at `warn` |
//! | Subscriber / hook failure | Isolated per callback, logged at `error` |
//! | Non-object `set_state` argument | Silent no-op |
//! | Missing page container | Operation skipped |
//! | Unknown action name | [`ShellError::UnknownAction`] |

mod category;
mod isolate;
mod result;
mod shell_error;

pub use category::ErrorCategory;
pub use isolate::isolate;
pub use result::{HookResult, ShellResult};
pub use shell_error::ShellError;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_io_error_maps_to_system() {
        let err = ShellError::Storage {
            path: std::path::PathBuf::from("/tmp/x.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.category(), ErrorCategory::System);
        assert!(err.is_recoverable());
        assert_eq!(err.error_code(), "STORAGE_IO");
    }

    #[test]
    fn test_isolated_failure_keeps_category() {
        let err = isolate("check", || Err(ShellError::UnknownAction("x".into()))).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::User);
    }
}
