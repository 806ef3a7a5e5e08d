//! Shell configuration.
//!
//! Use the builder methods to customize, or [`ShellConfig::from_env`] to read
//! overrides from the environment.
//!
//! ```
//! use pageshell::config::ShellConfig;
//!
//! let config = ShellConfig::default().with_default_page("sysinfo");
//! assert_eq!(config.default_page, "sysinfo");
//! ```

use std::path::PathBuf;

use crate::error::{ShellError, ShellResult};
use crate::navigation::{default_nav_items, NavItem};

/// Page shown for empty hashes and unknown pages.
pub const DEFAULT_PAGE: &str = "home";

/// Base URL for dashboard sockets when none is configured.
pub const DEFAULT_BASE_URL: &str = "localhost:8000/";

/// Environment variable overriding [`ShellConfig::default_page`].
pub const ENV_DEFAULT_PAGE: &str = "PAGESHELL_DEFAULT_PAGE";
/// Environment variable overriding [`ShellConfig::data_dir`].
pub const ENV_DATA_DIR: &str = "PAGESHELL_DATA_DIR";
/// Environment variable overriding [`ShellConfig::base_url`].
pub const ENV_BASE_URL: &str = "PAGESHELL_BASE_URL";

#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Fallback page id. Must be one of `nav_items`.
    pub default_page: String,
    /// Navigation table; its page ids form the router whitelist.
    pub nav_items: Vec<NavItem>,
    /// Directory for persisted storage (default: `~/.pageshell`).
    pub data_dir: Option<PathBuf>,
    /// `host[:port]/path/` prefix used to build dashboard socket URLs.
    pub base_url: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            default_page: DEFAULT_PAGE.to_string(),
            nav_items: default_nav_items(),
            data_dir: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ShellConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_page(mut self, page: impl Into<String>) -> Self {
        self.default_page = page.into();
        self
    }

    pub fn with_nav_items(mut self, items: Vec<NavItem>) -> Self {
        self.nav_items = items;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Page ids of the navigation table.
    pub fn page_ids(&self) -> Vec<String> {
        self.nav_items.iter().map(|item| item.page.clone()).collect()
    }

    /// Defaults overridden by `PAGESHELL_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(page) = std::env::var(ENV_DEFAULT_PAGE) {
            config = config.with_default_page(page);
        }
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            config = config.with_data_dir(dir);
        }
        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            config = config.with_base_url(base_url);
        }
        config
    }

    /// Check that the default page is part of the navigation table.
    pub fn validate(&self) -> ShellResult<()> {
        if self.default_page.is_empty() {
            return Err(ShellError::Config {
                key: "default_page".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if !self.nav_items.iter().any(|item| item.page == self.default_page) {
            return Err(ShellError::Config {
                key: "default_page".to_string(),
                message: format!("{} is not a registered page", self.default_page),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var(ENV_DEFAULT_PAGE);
        std::env::remove_var(ENV_DATA_DIR);
        std::env::remove_var(ENV_BASE_URL);
    }

    #[test]
    fn test_default_config() {
        let config = ShellConfig::default();
        assert_eq!(config.default_page, "home");
        assert_eq!(config.nav_items.len(), 5);
        assert!(config.data_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ShellConfig::new()
            .with_default_page("sysinfo")
            .with_data_dir("/tmp/pageshell")
            .with_base_url("10.0.0.2:9000/");
        assert_eq!(config.default_page, "sysinfo");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/pageshell")));
        assert_eq!(config.base_url, "10.0.0.2:9000/");
    }

    #[test]
    fn test_validate_rejects_unregistered_default() {
        let config = ShellConfig::default().with_default_page("dashboard");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ShellError::Config { .. }));

        let config = ShellConfig::default().with_default_page("");
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = ShellConfig::from_env();
        assert_eq!(config.default_page, DEFAULT_PAGE);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var(ENV_DEFAULT_PAGE, "fileexplorer");
        std::env::set_var(ENV_DATA_DIR, "/var/lib/pageshell");
        let config = ShellConfig::from_env();
        clear_env();

        assert_eq!(config.default_page, "fileexplorer");
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/pageshell")));
    }
}
