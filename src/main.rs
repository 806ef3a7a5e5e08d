use std::io::Write;
use std::rc::Rc;

use color_eyre::Result;
use pageshell::cli::{execute, parse_args, parse_command, run_cli_command, ConsoleOutcome};
use pageshell::config::ShellConfig;
use pageshell::lifecycle::MemoryPageHost;
use pageshell::pages::FileAction;
use pageshell::shell::Shell;
use pageshell::storage::{FileStore, KeyValueStore, MemoryStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "PAGESHELL_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_storage(config: &ShellConfig) -> Rc<dyn KeyValueStore> {
    let store = match &config.data_dir {
        Some(dir) => Ok(FileStore::in_dir(dir)),
        None => FileStore::new(),
    };
    match store {
        Ok(store) => {
            tracing::debug!(path = %store.path().display(), "using file storage");
            Rc::new(store)
        }
        Err(e) => {
            tracing::warn!("falling back to in-memory storage: {}", e);
            Rc::new(MemoryStore::new())
        }
    }
}

fn register_file_actions(shell: &Shell) {
    let mut actions = shell.file_explorer().actions_mut();
    for action in FileAction::ALL {
        actions.register(action, move |path| {
            tracing::info!(%action, %path, "file action requested");
            Ok(())
        });
    }
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()
}

fn main() -> Result<()> {
    let initial_hash = run_cli_command(parse_args(std::env::args())).unwrap_or_default();

    color_eyre::install()?;
    init_logging();

    let config = ShellConfig::from_env();
    let host = Rc::new(MemoryPageHost::with_pages(config.page_ids()));
    let storage = open_storage(&config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let mut shell = Shell::new(config, host, storage, &initial_hash)?;
        register_file_actions(&shell);
        shell.pump();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        prompt()?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    let outcome = parse_command(&line)
                        .and_then(|command| match command {
                            Some(command) => execute(&mut shell, command),
                            None => Ok(ConsoleOutcome::Output(String::new())),
                        });
                    match outcome {
                        Ok(ConsoleOutcome::Quit) => break,
                        Ok(ConsoleOutcome::Output(text)) if text.is_empty() => {}
                        Ok(ConsoleOutcome::Output(text)) => println!("{}", text),
                        Err(e) => eprintln!("error: {}", e),
                    }
                    prompt()?;
                }
                Some(event) = shell.next_event() => {
                    if let Err(e) = shell.handle_event(event) {
                        tracing::warn!(code = e.error_code(), "event handling failed: {}", e);
                    }
                }
            }
        }

        tracing::info!("shell stopped");
        Ok::<(), color_eyre::Report>(())
    })
}
