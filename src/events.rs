//! Events delivered to the shell's event loop.
//!
//! Anything that happens "as a separate task" in a browser (a hash change
//! after assigning `location.hash`, a telemetry frame arriving on a socket)
//! is queued here and handled by [`Shell::pump`](crate::shell::Shell::pump).

use tokio::sync::mpsc;

use crate::pages::ConnectionStatus;

/// An event waiting to be handled by the shell.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    /// The location hash was assigned a different value.
    HashChanged { old: String, new: String },
    /// A raw telemetry frame for one dashboard server.
    Telemetry { server: String, payload: String },
    /// A dashboard server's socket opened, failed or closed.
    ConnectionChanged {
        server: String,
        status: ConnectionStatus,
    },
}

/// Sending half of the shell event channel.
pub type EventSender = mpsc::UnboundedSender<ShellEvent>;

/// Receiving half of the shell event channel.
pub type EventReceiver = mpsc::UnboundedReceiver<ShellEvent>;

/// Create a new event channel.
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
