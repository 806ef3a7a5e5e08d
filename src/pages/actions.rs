//! File action dispatch.
//!
//! Row buttons in the file list carry an action name. Names are parsed into
//! [`FileAction`] and looked up in an [`ActionTable`]; anything else is
//! rejected with [`ShellError::UnknownAction`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{HookResult, ShellError, ShellResult};

/// Everything a file row can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileAction {
    CopyText,
    FileAttr,
    DirAttr,
    Rename,
    Delete,
    Copy,
    Move,
    Preview,
    Download,
    Edit,
}

impl FileAction {
    pub const ALL: [FileAction; 10] = [
        FileAction::CopyText,
        FileAction::FileAttr,
        FileAction::DirAttr,
        FileAction::Rename,
        FileAction::Delete,
        FileAction::Copy,
        FileAction::Move,
        FileAction::Preview,
        FileAction::Download,
        FileAction::Edit,
    ];

    /// The name used in row markup.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileAction::CopyText => "copyText",
            FileAction::FileAttr => "fileAttr",
            FileAction::DirAttr => "dirAttr",
            FileAction::Rename => "renameFile",
            FileAction::Delete => "deleteFile",
            FileAction::Copy => "copyFile",
            FileAction::Move => "moveFile",
            FileAction::Preview => "previewFile",
            FileAction::Download => "downloadFile",
            FileAction::Edit => "editFile",
        }
    }
}

impl FromStr for FileAction {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ShellError::UnknownAction(s.to_string()))
    }
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handler for one action; receives the target path.
pub type ActionHandler = Box<dyn Fn(&str) -> HookResult>;

/// Enum-keyed dispatch table.
#[derive(Default)]
pub struct ActionTable {
    handlers: HashMap<FileAction, ActionHandler>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the handler for `action`.
    pub fn register<F>(&mut self, action: FileAction, handler: F) -> &mut Self
    where
        F: Fn(&str) -> HookResult + 'static,
    {
        self.handlers.insert(action, Box::new(handler));
        self
    }

    pub fn is_registered(&self, action: FileAction) -> bool {
        self.handlers.contains_key(&action)
    }

    /// Parse `name` and run its handler on `path`.
    pub fn dispatch(&self, name: &str, path: &str) -> ShellResult<()> {
        let action: FileAction = name.parse()?;
        self.dispatch_action(action, path)
    }

    pub fn dispatch_action(&self, action: FileAction, path: &str) -> ShellResult<()> {
        let handler = self
            .handlers
            .get(&action)
            .ok_or_else(|| ShellError::UnhandledAction(action.to_string()))?;
        tracing::debug!(%action, %path, "dispatching file action");
        handler(path)
    }
}

impl fmt::Debug for ActionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<&str> = self.handlers.keys().map(FileAction::as_str).collect();
        actions.sort_unstable();
        f.debug_struct("ActionTable").field("actions", &actions).finish()
    }
}
