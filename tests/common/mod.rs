//! Common fixtures for integration tests.
//!
//! ```ignore
//! let (mut shell, host) = TestShellBuilder::new().with_hash("#/sysinfo").build();
//! ```

#![allow(dead_code)]

use std::rc::Rc;

use pageshell::config::ShellConfig;
use pageshell::lifecycle::MemoryPageHost;
use pageshell::shell::Shell;
use pageshell::storage::{KeyValueStore, MemoryStore};

/// Builder for a started shell backed by an in-memory host.
pub struct TestShellBuilder {
    config: ShellConfig,
    hash: String,
    storage: Option<Rc<dyn KeyValueStore>>,
    pump: bool,
}

impl TestShellBuilder {
    pub fn new() -> Self {
        Self {
            config: ShellConfig::default(),
            hash: String::new(),
            storage: None,
            pump: true,
        }
    }

    pub fn with_config(mut self, config: ShellConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_hash(mut self, hash: &str) -> Self {
        self.hash = hash.to_string();
        self
    }

    pub fn with_storage(mut self, storage: Rc<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Leave startup events queued.
    pub fn without_pump(mut self) -> Self {
        self.pump = false;
        self
    }

    pub fn build(self) -> (Shell, Rc<MemoryPageHost>) {
        let host = Rc::new(MemoryPageHost::with_pages(self.config.page_ids()));
        let storage = self
            .storage
            .unwrap_or_else(|| Rc::new(MemoryStore::new()));
        let mut shell = Shell::new(self.config, host.clone(), storage, &self.hash)
            .expect("Failed to start shell");
        if self.pump {
            shell.pump();
        }
        (shell, host)
    }
}

/// A telemetry frame with the given cumulative network counters.
pub fn network_frame(bytes_recv: u64, bytes_sent: u64) -> String {
    serde_json::json!({
        "node": "test-node",
        "cpu_usage": 10.0,
        "memory": { "used": 1024, "total": 4096 },
        "network": { "bytes_recv": bytes_recv, "bytes_sent": bytes_sent },
        "timestamp": 200.0,
        "boot_time": 100.0
    })
    .to_string()
}
