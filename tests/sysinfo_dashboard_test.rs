//! Dashboard telemetry through the shell's event queue.

mod common;

use common::{network_frame, TestShellBuilder};
use pageshell::events::ShellEvent;
use pageshell::pages::ConnectionStatus;

fn send(shell: &pageshell::shell::Shell, server: &str, payload: String) {
    shell
        .sender()
        .send(ShellEvent::Telemetry {
            server: server.to_string(),
            payload,
        })
        .unwrap();
}

#[test]
fn test_rates_from_consecutive_frames() {
    let (mut shell, host) = TestShellBuilder::new().with_hash("#/sysinfo").build();
    assert!(host
        .content("sysinfo")
        .unwrap()
        .contains("server1: Connecting"));

    send(&shell, "server1", network_frame(1000, 100));
    send(&shell, "server1", network_frame(1500, 160));
    shell.pump();

    let report = shell.sysinfo().report("server1").unwrap();
    assert_eq!(report.rates.net_recv, 500);
    assert_eq!(report.rates.net_sent, 60);
    assert_eq!(report.uptime_secs, 100);
    let content = host.content("sysinfo").unwrap();
    assert!(content.contains("0d 0h 1m 40s"), "{}", content);
    assert!(content.contains("test-node [Connected]"), "{}", content);
    assert!(content.contains("rx 1.46 KB (500.00 Bytes/s)"), "{}", content);
    assert!(content.contains("memory: 1.00 KB / 4.00 KB (25.0%)"), "{}", content);

    // Counter went backwards
    send(&shell, "server1", network_frame(200, 170));
    shell.pump();
    assert_eq!(shell.sysinfo().report("server1").unwrap().rates.net_recv, 0);
}

#[test]
fn test_multiple_servers_from_urls_param() {
    let (shell, _host) = TestShellBuilder::new()
        .with_hash("#/sysinfo?urls=ws%3A%2F%2Fa%2Fws%2F%2Cws%3A%2F%2Fb%2Fws%2F")
        .build();

    let endpoints = shell.sysinfo().endpoints();
    assert_eq!(endpoints.len(), 2);
    assert_eq!(endpoints[0].id, "server1");
    assert_eq!(endpoints[0].url, "ws://a/ws/");
    assert_eq!(endpoints[1].url, "ws://b/ws/");
}

#[test]
fn test_leaving_drops_sampler_state() {
    let (mut shell, _host) = TestShellBuilder::new().with_hash("#/sysinfo").build();

    send(&shell, "server1", network_frame(1000, 0));
    shell.pump();
    shell.go("home");
    assert!(!shell.sysinfo().is_mounted());

    // Dropped while unmounted
    send(&shell, "server1", network_frame(2000, 0));
    shell.pump();

    shell.go("sysinfo");
    send(&shell, "server1", network_frame(5000, 0));
    shell.pump();
    assert_eq!(shell.sysinfo().report("server1").unwrap().rates.net_recv, 0);
}

#[test]
fn test_bad_payload_is_logged_not_fatal() {
    let (mut shell, _host) = TestShellBuilder::new().with_hash("#/sysinfo").build();

    send(&shell, "server1", "{not json".to_string());
    send(&shell, "server1", network_frame(10, 0));
    assert_eq!(shell.pump(), 2);
    assert!(shell.sysinfo().report("server1").is_some());
}

fn set_status(shell: &pageshell::shell::Shell, server: &str, status: ConnectionStatus) {
    shell
        .sender()
        .send(ShellEvent::ConnectionChanged {
            server: server.to_string(),
            status,
        })
        .unwrap();
}

#[test]
fn test_connection_errors_and_closes_are_rendered() {
    let (mut shell, host) = TestShellBuilder::new()
        .with_hash("#/sysinfo?urls=ws%3A%2F%2Fa%2Fws%2F%2Cws%3A%2F%2Fb%2Fws%2F")
        .build();

    set_status(&shell, "server2", ConnectionStatus::Error);
    shell.pump();
    let content = host.content("sysinfo").unwrap();
    assert!(content.contains("server1: Connecting ws://a/ws/"), "{}", content);
    assert!(content.contains("server2: Connection error ws://b/ws/"), "{}", content);

    send(&shell, "server1", network_frame(10, 0));
    shell.pump();
    assert!(host.content("sysinfo").unwrap().contains("test-node [Connected]"));

    set_status(&shell, "server1", ConnectionStatus::Closed);
    shell.pump();
    let content = host.content("sysinfo").unwrap();
    assert!(content.contains("test-node [Disconnected]"), "{}", content);
    assert!(!content.contains("[Connected]"), "{}", content);
}
