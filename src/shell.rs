//! Composition root.
//!
//! [`Shell`] wires the store, router, navigation views, lifecycle manager
//! and pages together in startup order and owns the event queue that stands
//! in for the browser's task queue.

use std::rc::Rc;

use crate::config::ShellConfig;
use crate::error::ShellResult;
use crate::events::{self, EventReceiver, EventSender, ShellEvent};
use crate::lifecycle::{PageHost, PageLifecycleManager};
use crate::navigation::{Dock, DockMenu, Sidebar};
use crate::pages::{DirectoryRoutes, FileExplorerPage, SysinfoPage};
use crate::router::{Location, MemoryLocation, Router};
use crate::storage::KeyValueStore;
use crate::store::StateStore;

/// A running shell instance.
pub struct Shell {
    config: ShellConfig,
    store: StateStore,
    location: Rc<MemoryLocation>,
    router: Rc<Router>,
    lifecycle: PageLifecycleManager,
    sidebar: Sidebar,
    dock: Dock,
    file_explorer: Rc<FileExplorerPage>,
    sysinfo: Rc<SysinfoPage>,
    sender: EventSender,
    receiver: EventReceiver,
}

impl Shell {
    /// Build and start a shell whose location starts at `initial_hash`.
    ///
    /// The initial route is applied before this returns. Hash changes made
    /// while starting up (a restored explorer directory, say) are queued and
    /// handled by the next [`pump`](Self::pump).
    pub fn new(
        config: ShellConfig,
        host: Rc<dyn PageHost>,
        storage: Rc<dyn KeyValueStore>,
        initial_hash: &str,
    ) -> ShellResult<Self> {
        config.validate()?;

        let (sender, receiver) = events::channel();
        let location = Rc::new(MemoryLocation::new(initial_hash, sender.clone()));
        let store = StateStore::new(&config.default_page);

        let menu = DockMenu::new(config.nav_items.clone());
        let router = Rc::new(
            Router::from_config(store.clone(), location.clone(), &config)
                .with_dock_menu(menu.clone()),
        );

        let sidebar = Sidebar::mount(&store, Rc::clone(&router), config.nav_items.clone());
        let dock = Dock::mount(&store, Rc::clone(&router), config.nav_items.clone(), menu);

        let lifecycle = PageLifecycleManager::new(Rc::clone(&host));

        let file_explorer = FileExplorerPage::new(
            DirectoryRoutes::new(location.clone(), storage),
            Rc::clone(&host),
        );
        file_explorer.register(&lifecycle, &store);

        let sysinfo = SysinfoPage::new(Rc::clone(&host), config.base_url.clone());
        sysinfo.register(&lifecycle);

        lifecycle.init(&store);
        router.init();

        tracing::info!(
            page = %store.get_state().current_page(),
            hash = %location.hash(),
            "shell started"
        );

        Ok(Self {
            config,
            store,
            location,
            router,
            lifecycle,
            sidebar,
            dock,
            file_explorer,
            sysinfo,
            sender,
            receiver,
        })
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn router(&self) -> &Rc<Router> {
        &self.router
    }

    pub fn location(&self) -> &Rc<MemoryLocation> {
        &self.location
    }

    pub fn lifecycle(&self) -> &PageLifecycleManager {
        &self.lifecycle
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub fn dock(&self) -> &Dock {
        &self.dock
    }

    pub fn file_explorer(&self) -> &Rc<FileExplorerPage> {
        &self.file_explorer
    }

    pub fn sysinfo(&self) -> &Rc<SysinfoPage> {
        &self.sysinfo
    }

    /// Sender for feeding events (telemetry frames) from other tasks.
    pub fn sender(&self) -> EventSender {
        self.sender.clone()
    }

    /// Handle a single event.
    pub fn handle_event(&self, event: ShellEvent) -> ShellResult<()> {
        match event {
            ShellEvent::HashChanged { old, new } => {
                tracing::debug!(%old, %new, "hash changed");
                self.router.apply_route();
            }
            ShellEvent::Telemetry { server, payload } => {
                self.sysinfo.handle_telemetry(&server, &payload)?;
            }
            ShellEvent::ConnectionChanged { server, status } => {
                self.sysinfo.handle_connection(&server, status);
            }
        }
        Ok(())
    }

    /// Handle queued events until the queue is empty, including events
    /// queued by the handlers themselves. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.receiver.try_recv() {
            if let Err(e) = self.handle_event(event) {
                tracing::warn!(code = e.error_code(), "event handling failed: {}", e);
            }
            handled += 1;
        }
        handled
    }

    /// Wait for the next event. Never returns `None` while the shell is
    /// alive, since it holds a sender itself.
    pub async fn next_event(&mut self) -> Option<ShellEvent> {
        self.receiver.recv().await
    }

    /// Navigate to `page` and handle the resulting hash change.
    pub fn go(&mut self, page: &str) {
        self.router.go(page);
        self.pump();
    }

    /// Assign a raw hash and handle the resulting change.
    pub fn set_hash(&mut self, hash: &str) {
        self.location.set_hash(hash);
        self.pump();
    }
}

impl Drop for Shell {
    fn drop(&mut self) {
        self.lifecycle.detach();
        self.sidebar.unmount();
        self.dock.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::MemoryPageHost;
    use crate::pages::ConnectionStatus;
    use crate::storage::MemoryStore;

    fn host() -> Rc<MemoryPageHost> {
        Rc::new(MemoryPageHost::with_pages([
            "home",
            "fileexplorer",
            "webshell",
            "servicemanager",
            "sysinfo",
        ]))
    }

    #[test]
    fn test_starts_on_hash_page() {
        let host = host();
        let shell = Shell::new(
            ShellConfig::default(),
            host.clone(),
            Rc::new(MemoryStore::new()),
            "#/webshell",
        )
        .unwrap();

        assert_eq!(shell.store().get_state().current_page(), "webshell");
        assert_eq!(shell.lifecycle().current_page().as_deref(), Some("webshell"));
        assert_eq!(host.visible_pages(), vec!["webshell".to_string()]);
        assert_eq!(shell.sidebar().active_page().as_deref(), Some("webshell"));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = Shell::new(
            ShellConfig::default().with_default_page("nowhere"),
            host(),
            Rc::new(MemoryStore::new()),
            "",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_navigation_goes_through_hash_change() {
        let mut shell = Shell::new(
            ShellConfig::default(),
            host(),
            Rc::new(MemoryStore::new()),
            "",
        )
        .unwrap();
        assert_eq!(shell.store().get_state().current_page(), "home");

        shell.router().go("sysinfo");
        // Not applied until the event is handled
        assert_eq!(shell.store().get_state().current_page(), "home");

        assert_eq!(shell.pump(), 1);
        assert_eq!(shell.store().get_state().current_page(), "sysinfo");
        assert!(shell.sysinfo().is_mounted());
    }

    #[test]
    fn test_navigating_to_current_route_is_noop() {
        let mut shell = Shell::new(
            ShellConfig::default(),
            host(),
            Rc::new(MemoryStore::new()),
            "#/home",
        )
        .unwrap();
        shell.pump();

        shell.router().go("home");
        assert_eq!(shell.pump(), 0);
    }

    #[test]
    fn test_telemetry_event_reaches_dashboard() {
        let mut shell = Shell::new(
            ShellConfig::default(),
            host(),
            Rc::new(MemoryStore::new()),
            "#/sysinfo",
        )
        .unwrap();

        let tx = shell.sender();
        for rx in [100u64, 350] {
            tx.send(ShellEvent::Telemetry {
                server: "server1".to_string(),
                payload: format!(r#"{{"network": {{"bytes_recv": {}}}}}"#, rx),
            })
            .unwrap();
        }
        assert_eq!(shell.pump(), 2);
        assert_eq!(shell.sysinfo().report("server1").unwrap().rates.net_recv, 250);
    }

    #[test]
    fn test_connection_event_reaches_dashboard() {
        let host = host();
        let mut shell = Shell::new(
            ShellConfig::default(),
            host.clone(),
            Rc::new(MemoryStore::new()),
            "#/sysinfo",
        )
        .unwrap();
        shell.pump();

        shell
            .sender()
            .send(ShellEvent::ConnectionChanged {
                server: "server1".to_string(),
                status: ConnectionStatus::Error,
            })
            .unwrap();
        assert_eq!(shell.pump(), 1);
        assert_eq!(shell.sysinfo().status("server1"), Some(ConnectionStatus::Error));
        assert!(host
            .content("sysinfo")
            .unwrap()
            .contains("server1: Connection error"));
    }
}
