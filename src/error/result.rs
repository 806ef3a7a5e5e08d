//! Result aliases used across the shell.

use super::shell_error::ShellError;

/// Type alias for Results using [`ShellError`].
pub type ShellResult<T> = Result<T, ShellError>;

/// What subscribers and page hooks return.
///
/// An `Err` is logged by the caller and never propagated to other consumers.
pub type HookResult = ShellResult<()>;
