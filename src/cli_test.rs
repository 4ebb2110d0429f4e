use clap::Parser;

use super::*;

#[test]
fn test_defaults_to_one_instance_per_role() {
    let cli = Cli::parse_from(["wtf-test-runner", "true"]);
    let mut config = HarnessConfig::default();
    cli.apply(&mut config);

    for count in [
        config.cluster.service.coordinators,
        config.cluster.service.daemons,
        config.cluster.overlay.coordinators,
        config.cluster.overlay.daemons,
    ] {
        assert_eq!(count, 1);
    }
    assert_eq!(cli.command, vec!["true"]);
}

#[test]
fn test_command_keeps_its_own_flags() {
    let cli = Cli::parse_from([
        "wtf-test-runner",
        "--wtf-daemons",
        "3",
        "./client",
        "--host",
        "{WTF_HOST}",
        "-v",
    ]);
    assert_eq!(cli.wtf_daemons, Some(3));
    assert_eq!(cli.command, vec!["./client", "--host", "{WTF_HOST}", "-v"]);
}

#[test]
fn test_apply_overrides_config() {
    let cli = Cli::parse_from([
        "wtf-test-runner",
        "--hyperdex-daemons",
        "4",
        "--workspace",
        "/tmp/ws",
        "--keep-workspace",
        "--no-log-output",
        "true",
    ]);
    let mut config = HarnessConfig::default();

    cli.apply(&mut config);

    assert_eq!(config.cluster.service.daemons, 4);
    assert_eq!(config.cluster.overlay.daemons, 1);
    assert_eq!(config.workspace.root.as_deref(), Some(std::path::Path::new("/tmp/ws")));
    assert!(!config.workspace.clean);
    assert!(!config.workspace.log_output);
}

#[test]
fn test_apply_keeps_config_flags_when_not_given() {
    let cli = Cli::parse_from(["wtf-test-runner", "true"]);
    let mut config = HarnessConfig::default();
    config.workspace.log_output = false;
    config.cluster.overlay.daemons = 5;

    cli.apply(&mut config);

    assert_eq!(config.cluster.overlay.daemons, 5);
    assert!(config.workspace.clean);
    assert!(!config.workspace.log_output);
}
