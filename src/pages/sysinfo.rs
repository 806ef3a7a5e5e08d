//! Live system metrics dashboard.
//!
//! Each dashboard server pushes a [`SysinfoMessage`] at a fixed cadence.
//! Cumulative IO counters in those frames are turned into per-interval rates
//! by a [`RateSampler`] that lives in a [`DashboardContext`]: the context is
//! created when the page is entered and dropped when it is left, so coming
//! back never computes a delta against stale readings.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{ShellError, ShellResult};
use crate::lifecycle::{PageHooks, PageHost, PageLifecycleManager};
use crate::sampler::RateSampler;
use crate::store::{AppState, RouteParams};

/// Page id of the dashboard.
pub const SYSINFO_PAGE: &str = "sysinfo";

/// Route param listing dashboard sockets, comma-separated.
pub const URLS_PARAM: &str = "urls";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UsageBlock {
    pub percent: Option<f64>,
    pub used: Option<u64>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DiskIo {
    pub read_bytes: Option<u64>,
    pub write_bytes: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct NetworkIo {
    pub bytes_recv: Option<u64>,
    pub bytes_sent: Option<u64>,
}

/// One telemetry frame. Every field is optional; missing counters read as 0.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SysinfoMessage {
    pub node: Option<String>,
    pub os: Option<String>,
    /// Architecture width, e.g. "64bit".
    pub bits: Option<String>,
    pub version: Option<String>,
    pub release: Option<String>,
    pub processor: Option<String>,
    pub current_time: Option<String>,
    pub time_zone: Option<String>,
    pub cpu_usage: Option<f64>,
    /// MHz
    pub cpu_freq: Option<f64>,
    pub cpu_cores: Option<u32>,
    pub cpu_threads: Option<u32>,
    pub memory: Option<UsageBlock>,
    pub disk: Option<UsageBlock>,
    pub disk_io: Option<DiskIo>,
    pub network: Option<NetworkIo>,
    pub process_count: Option<u64>,
    pub ip_address: Option<String>,
    pub tcp4_connection_count: Option<u64>,
    pub tcp6_connection_count: Option<u64>,
    pub timestamp: Option<f64>,
    pub boot_time: Option<f64>,
    pub load_avg: Option<Vec<f64>>,
}

impl SysinfoMessage {
    pub fn parse(payload: &str) -> ShellResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Seconds since boot, never negative.
    pub fn uptime_secs(&self) -> u64 {
        let up = self.timestamp.unwrap_or(0.0) - self.boot_time.unwrap_or(0.0);
        if up > 0.0 {
            up.floor() as u64
        } else {
            0
        }
    }

    /// Cumulative IO counters carried by this frame.
    pub fn io_totals(&self) -> IoCounters {
        let disk_io = self.disk_io.clone().unwrap_or_default();
        let network = self.network.clone().unwrap_or_default();
        IoCounters {
            disk_read: disk_io.read_bytes.unwrap_or(0),
            disk_write: disk_io.write_bytes.unwrap_or(0),
            net_recv: network.bytes_recv.unwrap_or(0),
            net_sent: network.bytes_sent.unwrap_or(0),
        }
    }
}

/// State of one server's socket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Error,
    Closed,
}

impl ConnectionStatus {
    pub const ALL: [ConnectionStatus; 4] = [
        ConnectionStatus::Connecting,
        ConnectionStatus::Connected,
        ConnectionStatus::Error,
        ConnectionStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Error => "error",
            ConnectionStatus::Closed => "closed",
        }
    }

    /// Text shown on the server card.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "Connecting",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Error => "Connection error",
            ConnectionStatus::Closed => "Disconnected",
        }
    }
}

impl FromStr for ConnectionStatus {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConnectionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ShellError::InvalidCommand(format!("unknown connection status: {}", s)))
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Disk and network byte counters. Used both for the cumulative totals and
/// for the per-interval deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoCounters {
    pub disk_read: u64,
    pub disk_write: u64,
    pub net_recv: u64,
    pub net_sent: u64,
}

/// Per-interval deltas.
pub type IoRates = IoCounters;

/// Used/total bytes with a percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Usage {
    pub percent: f64,
    pub used: u64,
    pub total: u64,
}

impl Usage {
    /// The reported percentage wins; otherwise it is derived from used/total.
    pub fn from_block(block: Option<&UsageBlock>) -> Self {
        let Some(block) = block else {
            return Self::default();
        };
        let used = block.used.unwrap_or(0);
        let total = block.total.unwrap_or(0);
        let percent = block.percent.unwrap_or(if total > 0 {
            used as f64 / total as f64 * 100.0
        } else {
            0.0
        });
        Self {
            percent,
            used,
            total,
        }
    }

    /// e.g. "8.00 GB / 16.00 GB (50.0%)"
    pub fn display(&self) -> String {
        format!(
            "{} / {} ({:.1}%)",
            format_bytes(self.used),
            format_bytes(self.total),
            self.percent
        )
    }
}

/// Resource figures for the dashboard card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerStats {
    pub status: ConnectionStatus,
    /// CPU usage percentage (0-100)
    pub cpu_percent: f64,
    pub cpu_freq_mhz: f64,
    pub cpu_cores: Option<u32>,
    pub cpu_threads: Option<u32>,
    pub memory: Usage,
    pub disk: Usage,
    pub process_count: Option<u64>,
}

impl ServerStats {
    /// Returns true if CPU > 90% OR memory usage > 90%
    pub fn is_heavy_load(&self) -> bool {
        self.cpu_percent > 90.0 || self.memory.percent > 90.0
    }

    /// e.g. "45.0%"
    pub fn cpu_display(&self) -> String {
        format!("{:.1}%", self.cpu_percent)
    }

    pub fn connection_display(&self) -> &'static str {
        self.status.label()
    }
}

/// Identity of the machine behind a server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostInfo {
    pub node: String,
    pub os: Option<String>,
    pub bits: Option<String>,
    pub version: Option<String>,
    pub release: Option<String>,
    pub processor: Option<String>,
    pub current_time: Option<String>,
    pub time_zone: Option<String>,
    pub ip_address: Option<String>,
    pub tcp4_connections: Option<u64>,
    pub tcp6_connections: Option<u64>,
}

impl HostInfo {
    fn from_message(message: &SysinfoMessage) -> Self {
        Self {
            node: message.node.clone().unwrap_or_default(),
            os: message.os.clone(),
            bits: message.bits.clone(),
            version: message.version.clone(),
            release: message.release.clone(),
            processor: message.processor.clone(),
            current_time: message.current_time.clone(),
            time_zone: message.time_zone.clone(),
            ip_address: message.ip_address.clone(),
            tcp4_connections: message.tcp4_connection_count,
            tcp6_connections: message.tcp6_connection_count,
        }
    }
}

/// Everything the dashboard shows for one server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerReport {
    pub host: HostInfo,
    pub stats: ServerStats,
    pub totals: IoCounters,
    pub rates: IoRates,
    pub uptime_secs: u64,
    pub load_avg: Vec<f64>,
}

fn or_dash<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string())
}

fn with_rate(total: u64, rate: u64) -> String {
    format!("{} ({}/s)", format_bytes(total), format_bytes(rate))
}

impl ServerReport {
    /// The server card, one section per line.
    pub fn render(&self) -> String {
        let host = &self.host;
        let stats = &self.stats;
        let load: Vec<String> = self.load_avg.iter().map(|l| format!("{:.2}", l)).collect();

        [
            format!("{} [{}]", host.node, stats.connection_display()),
            format!(
                "  system: {} {} {} | release {} | up {} | {} ({})",
                or_dash(&host.os),
                or_dash(&host.bits),
                or_dash(&host.version),
                or_dash(&host.release),
                format_uptime(self.uptime_secs),
                or_dash(&host.current_time),
                or_dash(&host.time_zone)
            ),
            format!("  processor: {}", or_dash(&host.processor)),
            format!(
                "  cpu: {} @ {:.2} MHz | cores {} threads {} | load {}",
                stats.cpu_display(),
                stats.cpu_freq_mhz,
                or_dash(&stats.cpu_cores),
                or_dash(&stats.cpu_threads),
                load.join(", ")
            ),
            format!(
                "  memory: {} | processes {}",
                stats.memory.display(),
                or_dash(&stats.process_count)
            ),
            format!(
                "  disk: {} | read {} | write {}",
                stats.disk.display(),
                with_rate(self.totals.disk_read, self.rates.disk_read),
                with_rate(self.totals.disk_write, self.rates.disk_write)
            ),
            format!(
                "  network: rx {} | tx {} | ip {} | tcp4 {} tcp6 {}",
                with_rate(self.totals.net_recv, self.rates.net_recv),
                with_rate(self.totals.net_sent, self.rates.net_sent),
                or_dash(&host.ip_address),
                or_dash(&host.tcp4_connections),
                or_dash(&host.tcp6_connections)
            ),
        ]
        .join("\n")
    }
}

/// A dashboard socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoint {
    pub id: String,
    pub url: String,
}

/// Servers listed in the `urls` param, or the local one.
pub fn resolve_endpoints(params: &RouteParams, base_url: &str) -> Vec<ServerEndpoint> {
    let urls: Vec<&str> = params
        .get(URLS_PARAM)
        .map(|urls| urls.split(',').map(str::trim).filter(|u| !u.is_empty()).collect())
        .unwrap_or_default();

    if urls.is_empty() {
        return vec![ServerEndpoint {
            id: "server1".to_string(),
            url: format!("ws://{}sysinfo/ws/", base_url),
        }];
    }

    urls.into_iter()
        .enumerate()
        .map(|(i, url)| ServerEndpoint {
            id: format!("server{}", i + 1),
            url: url.to_string(),
        })
        .collect()
}

/// Per-mount dashboard state.
#[derive(Debug)]
pub struct DashboardContext {
    endpoints: Vec<ServerEndpoint>,
    sampler: RateSampler,
    statuses: BTreeMap<String, ConnectionStatus>,
    reports: BTreeMap<String, ServerReport>,
}

impl DashboardContext {
    pub fn new(endpoints: Vec<ServerEndpoint>) -> Self {
        Self {
            endpoints,
            sampler: RateSampler::new(),
            statuses: BTreeMap::new(),
            reports: BTreeMap::new(),
        }
    }

    /// Context for the route in `state`.
    pub fn mount(state: &AppState, base_url: &str) -> Self {
        Self::new(resolve_endpoints(&state.route_params(), base_url))
    }

    pub fn endpoints(&self) -> &[ServerEndpoint] {
        &self.endpoints
    }

    /// Last known status; servers start out connecting.
    pub fn status(&self, server: &str) -> ConnectionStatus {
        self.statuses.get(server).copied().unwrap_or_default()
    }

    pub fn set_status(&mut self, server: &str, status: ConnectionStatus) {
        tracing::debug!(%server, %status, "dashboard connection status");
        self.statuses.insert(server.to_string(), status);
        if let Some(report) = self.reports.get_mut(server) {
            report.stats.status = status;
        }
    }

    /// Fold one frame into the server's report.
    ///
    /// A frame proves the socket is open, so a server still marked as
    /// connecting is promoted to connected.
    pub fn ingest(&mut self, server: &str, message: &SysinfoMessage) -> &ServerReport {
        if self.status(server) == ConnectionStatus::Connecting {
            self.statuses
                .insert(server.to_string(), ConnectionStatus::Connected);
        }

        let totals = message.io_totals();
        let rates = IoRates {
            disk_read: self.sample(server, "rd", totals.disk_read),
            disk_write: self.sample(server, "wd", totals.disk_write),
            net_recv: self.sample(server, "rx", totals.net_recv),
            net_sent: self.sample(server, "tx", totals.net_sent),
        };

        let report = ServerReport {
            host: HostInfo::from_message(message),
            stats: ServerStats {
                status: self.status(server),
                cpu_percent: message.cpu_usage.unwrap_or(0.0),
                cpu_freq_mhz: message.cpu_freq.unwrap_or(0.0),
                cpu_cores: message.cpu_cores,
                cpu_threads: message.cpu_threads,
                memory: Usage::from_block(message.memory.as_ref()),
                disk: Usage::from_block(message.disk.as_ref()),
                process_count: message.process_count,
            },
            totals,
            rates,
            uptime_secs: message.uptime_secs(),
            load_avg: message.load_avg.clone().unwrap_or_default(),
        };

        self.reports.insert(server.to_string(), report);
        &self.reports[server]
    }

    pub fn ingest_json(&mut self, server: &str, payload: &str) -> ShellResult<&ServerReport> {
        let message = SysinfoMessage::parse(payload)?;
        Ok(self.ingest(server, &message))
    }

    pub fn report(&self, server: &str) -> Option<&ServerReport> {
        self.reports.get(server)
    }

    /// Text for the page container.
    pub fn render(&self) -> String {
        self.endpoints
            .iter()
            .map(|endpoint| match self.reports.get(&endpoint.id) {
                Some(report) => format!("{}: {}", endpoint.id, report.render()),
                None => format!(
                    "{}: {} {}",
                    endpoint.id,
                    self.status(&endpoint.id).label(),
                    endpoint.url
                ),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn sample(&mut self, server: &str, metric: &str, value: u64) -> u64 {
        self.sampler.sample(&format!("{}-{}", server, metric), value)
    }
}

/// The dashboard page. Holds a context only while active.
pub struct SysinfoPage {
    host: Rc<dyn PageHost>,
    base_url: String,
    context: RefCell<Option<DashboardContext>>,
}

impl SysinfoPage {
    pub fn new(host: Rc<dyn PageHost>, base_url: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            host,
            base_url: base_url.into(),
            context: RefCell::new(None),
        })
    }

    pub fn register(self: &Rc<Self>, manager: &PageLifecycleManager) {
        let enter_page: Weak<Self> = Rc::downgrade(self);
        let leave_page: Weak<Self> = Rc::downgrade(self);
        manager.register_hooks(
            SYSINFO_PAGE,
            PageHooks::new()
                .on_enter(move |state| {
                    if let Some(page) = enter_page.upgrade() {
                        page.mount(state);
                    }
                    Ok(())
                })
                .on_leave(move |_| {
                    if let Some(page) = leave_page.upgrade() {
                        page.unmount();
                    }
                    Ok(())
                }),
        );
    }

    pub fn is_mounted(&self) -> bool {
        self.context.borrow().is_some()
    }

    /// Endpoints of the mounted context.
    pub fn endpoints(&self) -> Vec<ServerEndpoint> {
        self.context
            .borrow()
            .as_ref()
            .map(|ctx| ctx.endpoints().to_vec())
            .unwrap_or_default()
    }

    pub fn report(&self, server: &str) -> Option<ServerReport> {
        self.context
            .borrow()
            .as_ref()
            .and_then(|ctx| ctx.report(server).cloned())
    }

    /// `None` while unmounted.
    pub fn status(&self, server: &str) -> Option<ConnectionStatus> {
        self.context.borrow().as_ref().map(|ctx| ctx.status(server))
    }

    /// Handle one telemetry frame. Frames arriving while unmounted are
    /// dropped.
    pub fn handle_telemetry(&self, server: &str, payload: &str) -> ShellResult<Option<ServerReport>> {
        let report = {
            let mut context = self.context.borrow_mut();
            let Some(context) = context.as_mut() else {
                tracing::debug!(%server, "telemetry ignored: dashboard not mounted");
                return Ok(None);
            };
            context.ingest_json(server, payload)?.clone()
        };
        self.render();
        Ok(Some(report))
    }

    /// Record a socket state change and re-render.
    pub fn handle_connection(&self, server: &str, status: ConnectionStatus) {
        {
            let mut context = self.context.borrow_mut();
            let Some(context) = context.as_mut() else {
                tracing::debug!(%server, %status, "connection change ignored: dashboard not mounted");
                return;
            };
            context.set_status(server, status);
        }
        self.render();
    }

    fn mount(&self, state: &AppState) {
        let context = DashboardContext::mount(state, &self.base_url);
        tracing::debug!(servers = context.endpoints().len(), "dashboard mounted");
        *self.context.borrow_mut() = Some(context);
        self.render();
    }

    fn unmount(&self) {
        if self.context.borrow_mut().take().is_some() {
            tracing::debug!("dashboard unmounted");
        }
    }

    fn render(&self) {
        if let Some(context) = self.context.borrow().as_ref() {
            self.host.fill(SYSINFO_PAGE, &context.render());
        }
    }
}

/// Human-readable byte count, e.g. "1.50 KB".
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Uptime as "Xd Yh Zm Ws".
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = secs % 86_400 / 3_600;
    let minutes = secs % 3_600 / 60;
    let seconds = secs % 60;
    format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
}
