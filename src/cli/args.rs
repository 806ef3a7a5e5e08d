//! Command-line argument parsing.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Run the shell, optionally starting at a given location hash
    Run { initial_hash: Option<String> },
}

/// Parse command-line arguments (program name first).
///
/// ```
/// use pageshell::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["pageshell".to_string(), "--hash".to_string(), "#/sysinfo".to_string()];
/// assert_eq!(
///     parse_args(args.into_iter()),
///     CliCommand::Run { initial_hash: Some("#/sysinfo".to_string()) }
/// );
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut initial_hash = None;
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--hash" => initial_hash = args.next(),
            other => {
                if let Some(hash) = other.strip_prefix("--hash=") {
                    initial_hash = Some(hash.to_string());
                }
            }
        }
    }
    CliCommand::Run { initial_hash }
}
