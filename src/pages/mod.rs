//! Page implementations that register lifecycle hooks.
//!
//! Pages are otherwise independent of the shell: each one owns its own
//! per-visit state, created in `on_enter` and dropped in `on_leave`.

pub mod actions;
pub mod file_explorer;
pub mod sysinfo;

pub use actions::{ActionHandler, ActionTable, FileAction};
pub use file_explorer::{
    directory_hash, parse_directory_hash, DirectoryRoutes, DirectoryView, FileExplorerPage,
    DIRECTORY_HASH_KEY, FILE_EXPLORER_PAGE,
};
pub use sysinfo::{
    format_bytes, format_uptime, resolve_endpoints, ConnectionStatus, DashboardContext,
    ServerEndpoint, SysinfoMessage, SysinfoPage, SYSINFO_PAGE,
};
