//! Consumer failure isolation.
//!
//! Subscribers and page hooks belong to independent pages. A failing page
//! must not stop the store from notifying the rest or the lifecycle manager
//! from finishing a transition, so every invocation goes through [`isolate`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::result::{HookResult, ShellResult};
use super::shell_error::ShellError;

/// Run a consumer callback, turning both `Err` returns and panics into a
/// logged diagnostic.
///
/// The outcome is still returned so callers can count failures, but the
/// error has already been reported by the time this returns.
pub fn isolate<F>(context: &str, f: F) -> ShellResult<()>
where
    F: FnOnce() -> HookResult,
{
    let outcome = match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(ShellError::CallbackPanicked {
            context: context.to_string(),
            message: panic_message(payload.as_ref()),
        }),
    };

    if let Err(ref err) = outcome {
        tracing::error!(
            context,
            code = err.error_code(),
            category = %err.category(),
            "{}",
            err
        );
    }
    outcome
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
