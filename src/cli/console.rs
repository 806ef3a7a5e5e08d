//! Line-oriented console for driving a running shell.
//!
//! Each stdin line is parsed into a [`ConsoleCommand`] and executed against
//! the [`Shell`]. Every command that changes the location pumps the event
//! queue before printing, so the output reflects the applied route.

use crate::error::{ShellError, ShellResult};
use crate::events::ShellEvent;
use crate::navigation::NavEntry;
use crate::pages::{ConnectionStatus, FileAction};
use crate::router::Location;
use crate::shell::Shell;
use crate::store::THEME;

/// One console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Navigate to a page
    /// Primary: go
    Go(String),
    /// Assign a raw location hash
    /// Primary: hash
    Hash(String),
    /// Print the store contents
    /// Primary: state
    State,
    /// Set the theme key
    /// Primary: theme
    Theme(String),
    /// Feed a telemetry frame for a dashboard server
    /// Primary: telemetry
    Telemetry { server: String, payload: String },
    /// Report a dashboard server's socket state
    /// Primary: status
    Status {
        server: String,
        status: ConnectionStatus,
    },
    /// Run a file action on a path
    /// Primary: action
    Action { name: String, path: String },
    /// Open a directory in the file explorer
    /// Primary: cd
    Cd(String),
    /// Open the parent directory
    /// Primary: up
    Up,
    /// Toggle the dock's overflow menu
    /// Primary: more
    More,
    /// List navigable pages with the active one marked
    /// Primary: pages
    /// Aliases: nav
    Pages,
    /// Primary: help
    Help,
    /// Primary: quit
    /// Aliases: exit, q
    Quit,
}

/// What the caller should do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleOutcome {
    /// Print this text and keep reading.
    Output(String),
    Quit,
}

const HELP: &str = "\
commands:
  go <page>                      navigate to a page
  hash <hash>                    assign the location hash
  state                          print the store
  theme <name>                   set the theme
  telemetry <server> <json>      feed a dashboard frame
  status <server> <state>        connecting, connected, error or closed
  action <name> <path>           run a file action
  cd <path> | up                 file explorer directory
  more                           toggle the dock menu
  pages                          list pages
  quit                           exit";

/// Parse one console line. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> ShellResult<Option<ConsoleCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let required = |what: &str| -> ShellResult<String> {
        if rest.is_empty() {
            Err(ShellError::InvalidCommand(format!("{} needs {}", name, what)))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match name {
        "go" => ConsoleCommand::Go(required("a page")?),
        "hash" => ConsoleCommand::Hash(required("a hash")?),
        "state" => ConsoleCommand::State,
        "theme" => ConsoleCommand::Theme(required("a theme name")?),
        "telemetry" => {
            let (server, payload) = required("a server and a payload")?
                .split_once(char::is_whitespace)
                .map(|(s, p)| (s.to_string(), p.trim().to_string()))
                .ok_or_else(|| ShellError::InvalidCommand("telemetry needs a payload".into()))?;
            ConsoleCommand::Telemetry { server, payload }
        }
        "status" => {
            let (server, status) = required("a server and a state")?
                .split_once(char::is_whitespace)
                .map(|(s, st)| (s.to_string(), st.trim().to_string()))
                .ok_or_else(|| ShellError::InvalidCommand("status needs a state".into()))?;
            ConsoleCommand::Status {
                server,
                status: status.parse()?,
            }
        }
        "action" => {
            let (name, path) = required("an action and a path")?
                .split_once(char::is_whitespace)
                .map(|(n, p)| (n.to_string(), p.trim().to_string()))
                .ok_or_else(|| ShellError::InvalidCommand("action needs a path".into()))?;
            ConsoleCommand::Action { name, path }
        }
        "cd" => ConsoleCommand::Cd(required("a path")?),
        "up" => ConsoleCommand::Up,
        "more" => ConsoleCommand::More,
        "pages" | "nav" => ConsoleCommand::Pages,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" | "q" => ConsoleCommand::Quit,
        other => return Err(ShellError::InvalidCommand(other.to_string())),
    };
    Ok(Some(command))
}

/// Run `command` against `shell`.
pub fn execute(shell: &mut Shell, command: ConsoleCommand) -> ShellResult<ConsoleOutcome> {
    let output = match command {
        ConsoleCommand::Go(page) => {
            shell.go(&page);
            location_line(shell)
        }
        ConsoleCommand::Hash(hash) => {
            shell.set_hash(&hash);
            location_line(shell)
        }
        ConsoleCommand::State => serde_json::to_string_pretty(&shell.store().get_state())?,
        ConsoleCommand::Theme(theme) => {
            shell.store().set(THEME, theme.as_str());
            format!("theme = {}", theme)
        }
        ConsoleCommand::Telemetry { server, payload } => {
            shell.handle_event(ShellEvent::Telemetry {
                server: server.clone(),
                payload,
            })?;
            match shell.sysinfo().report(&server) {
                Some(report) => report.render(),
                None => "dashboard not mounted; frame dropped".to_string(),
            }
        }
        ConsoleCommand::Status { server, status } => {
            shell.handle_event(ShellEvent::ConnectionChanged {
                server: server.clone(),
                status,
            })?;
            match shell.sysinfo().status(&server) {
                Some(status) => format!("{}: {}", server, status.label()),
                None => "dashboard not mounted; status dropped".to_string(),
            }
        }
        ConsoleCommand::Action { name, path } => {
            let action: FileAction = name.parse()?;
            shell.file_explorer().handle_file_action(action.as_str(), &path)?;
            format!("{} {}", action, path)
        }
        ConsoleCommand::Cd(path) => {
            shell.file_explorer().go_to_directory(&path);
            shell.pump();
            location_line(shell)
        }
        ConsoleCommand::Up => {
            shell.file_explorer().go_to_parent_directory();
            shell.pump();
            location_line(shell)
        }
        ConsoleCommand::More => {
            let open = shell.dock().click_more();
            if open {
                shell
                    .dock()
                    .menu()
                    .entries()
                    .iter()
                    .map(entry_line)
                    .collect::<Vec<_>>()
                    .join("\n")
            } else {
                "menu closed".to_string()
            }
        }
        ConsoleCommand::Pages => shell
            .sidebar()
            .entries()
            .iter()
            .map(entry_line)
            .collect::<Vec<_>>()
            .join("\n"),
        ConsoleCommand::Help => HELP.to_string(),
        ConsoleCommand::Quit => return Ok(ConsoleOutcome::Quit),
    };
    Ok(ConsoleOutcome::Output(output))
}

fn entry_line(entry: &NavEntry) -> String {
    let marker = if entry.active { " *" } else { "" };
    format!("{} {:<16} {}{}", entry.icon, entry.page, entry.label, marker)
}

fn location_line(shell: &Shell) -> String {
    let state = shell.store().get_state();
    let mut line = format!("{} -> {}", shell.location().hash(), state.current_page());
    if let Some(view) = shell.file_explorer().view() {
        line.push_str(&format!(" [{}]", view.path));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShellConfig;
    use crate::lifecycle::MemoryPageHost;
    use crate::storage::MemoryStore;
    use std::rc::Rc;

    fn shell(hash: &str) -> Shell {
        let host = Rc::new(MemoryPageHost::with_pages([
            "home",
            "fileexplorer",
            "webshell",
            "servicemanager",
            "sysinfo",
        ]));
        let mut shell =
            Shell::new(ShellConfig::default(), host, Rc::new(MemoryStore::new()), hash).unwrap();
        shell.pump();
        shell
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("  ").unwrap(), None);
        assert_eq!(
            parse_command("go sysinfo").unwrap(),
            Some(ConsoleCommand::Go("sysinfo".to_string()))
        );
        assert_eq!(parse_command("exit").unwrap(), Some(ConsoleCommand::Quit));
        assert_eq!(parse_command("nav").unwrap(), Some(ConsoleCommand::Pages));
        assert_eq!(
            parse_command(r#"telemetry server2 {"cpu_usage": 1}"#).unwrap(),
            Some(ConsoleCommand::Telemetry {
                server: "server2".to_string(),
                payload: r#"{"cpu_usage": 1}"#.to_string()
            })
        );
        assert_eq!(
            parse_command("action deleteFile /tmp/a b").unwrap(),
            Some(ConsoleCommand::Action {
                name: "deleteFile".to_string(),
                path: "/tmp/a b".to_string()
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_command("go"), Err(ShellError::InvalidCommand(_))));
        assert!(matches!(parse_command("telemetry server1"), Err(ShellError::InvalidCommand(_))));
        assert!(matches!(parse_command("frobnicate"), Err(ShellError::InvalidCommand(_))));
        assert!(matches!(parse_command("status server1"), Err(ShellError::InvalidCommand(_))));
        assert!(matches!(
            parse_command("status server1 flaky"),
            Err(ShellError::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_go_and_quit() {
        let mut shell = shell("");
        let outcome = execute(&mut shell, ConsoleCommand::Go("webshell".to_string())).unwrap();
        assert_eq!(outcome, ConsoleOutcome::Output("#/webshell -> webshell".to_string()));
        assert_eq!(execute(&mut shell, ConsoleCommand::Quit).unwrap(), ConsoleOutcome::Quit);
    }

    #[test]
    fn test_unknown_page_falls_back() {
        let mut shell = shell("");
        let outcome = execute(&mut shell, ConsoleCommand::Hash("#/nowhere".to_string())).unwrap();
        assert_eq!(outcome, ConsoleOutcome::Output("#/nowhere -> home".to_string()));
    }

    #[test]
    fn test_theme_does_not_change_page() {
        let mut shell = shell("#/webshell");
        execute(&mut shell, ConsoleCommand::Theme("dark".to_string())).unwrap();
        let state = shell.store().get_state();
        assert_eq!(state.theme(), Some("dark"));
        assert_eq!(state.current_page(), "webshell");
    }

    #[test]
    fn test_unknown_action_is_error() {
        let mut shell = shell("");
        let result = execute(
            &mut shell,
            ConsoleCommand::Action {
                name: "formatDisk".to_string(),
                path: "/".to_string(),
            },
        );
        assert!(matches!(result, Err(ShellError::UnknownAction(_))));
    }

    #[test]
    fn test_telemetry_while_unmounted() {
        let mut shell = shell("");
        let outcome = execute(
            &mut shell,
            ConsoleCommand::Telemetry {
                server: "server1".to_string(),
                payload: "{}".to_string(),
            },
        )
        .unwrap();
        assert_eq!(
            outcome,
            ConsoleOutcome::Output("dashboard not mounted; frame dropped".to_string())
        );
    }

    #[test]
    fn test_status_updates_dashboard() {
        let mut shell = shell("#/sysinfo");
        let command = parse_command("status server1 closed").unwrap().unwrap();
        assert_eq!(
            execute(&mut shell, command).unwrap(),
            ConsoleOutcome::Output("server1: Disconnected".to_string())
        );

        shell.go("home");
        let command = parse_command("status server1 error").unwrap().unwrap();
        assert_eq!(
            execute(&mut shell, command).unwrap(),
            ConsoleOutcome::Output("dashboard not mounted; status dropped".to_string())
        );
    }

    #[test]
    fn test_more_lists_overflow_pages() {
        let mut shell = shell("#/sysinfo");
        let ConsoleOutcome::Output(text) = execute(&mut shell, ConsoleCommand::More).unwrap() else {
            panic!("expected output");
        };
        assert_eq!(text.lines().count(), 1, "{}", text);
        assert!(text.contains("sysinfo"));
        assert!(text.ends_with(" *"));
    }
}
