//! Command-line interface.
//!
//! Argument parsing happens before the shell is built; the interactive
//! console then drives a running [`Shell`](crate::shell::Shell) one line at
//! a time.
//!
//! ```ignore
//! use pageshell::cli::{parse_args, run_cli_command, CliCommand};
//!
//! let command = parse_args(std::env::args());
//! let initial_hash = run_cli_command(command);
//! ```

pub mod args;
pub mod console;
pub mod version;

pub use args::{parse_args, CliCommand};
pub use console::{execute, parse_command, ConsoleCommand, ConsoleOutcome};
pub use version::{handle_version_command, VERSION};

/// Handle commands that finish before the shell starts.
///
/// Returns the initial hash to run the shell with. `Version` never returns.
pub fn run_cli_command(command: CliCommand) -> Option<String> {
    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Run { initial_hash } => initial_hash,
    }
}
