use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time::Instant;

use super::*;
use crate::BackoffPolicy;
use crate::Error;
use crate::Role;
use crate::SetupError;

fn group_on(
    base_port: u16,
    count: usize,
) -> RoleGroup {
    RoleGroup::new("wtf", "wtf", "127.0.0.1", Role::Coordinator, count, base_port)
}

fn quick_backoff() -> BackoffPolicy {
    BackoffPolicy {
        max_retries: 3,
        timeout_ms: 100,
        base_delay_ms: 5,
        max_delay_ms: 20,
    }
}

#[tokio::test(start_paused = true)]
async fn test_fixed_delay_sleeps_for_configured_duration() {
    let probe = FixedDelay::new(Duration::from_secs(1));
    let start = Instant::now();

    probe.wait_group(&group_on(1982, 1)).await.unwrap();
    probe.settle().await.unwrap();

    assert!(start.elapsed() >= Duration::from_secs(2));
}

#[tokio::test]
async fn test_tcp_probe_succeeds_once_port_accepts() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let probe = TcpProbe::new(quick_backoff(), Duration::ZERO);

    probe.wait_group(&group_on(port, 1)).await.unwrap();
}

#[tokio::test]
async fn test_tcp_probe_reports_port_that_never_listens() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let probe = TcpProbe::new(quick_backoff(), Duration::ZERO);

    let err = probe.wait_group(&group_on(port, 1)).await.unwrap_err();

    match err {
        Error::Setup(SetupError::NotReady { role, port: p, .. }) => {
            assert_eq!(role, "wtf-coordinator");
            assert_eq!(p, port);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_probe_from_config_uses_configured_delay() {
    let mut config = crate::SettleConfig::default();
    config.delay_ms = 250;
    let probe = probe_from_config(&config);
    let start = Instant::now();

    probe.settle().await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(250));
}
