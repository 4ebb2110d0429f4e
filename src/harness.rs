//! Process-level glue: configuration layering, signal forwarding and the
//! final report.

use tokio::signal::unix::signal;
use tokio::signal::unix::SignalKind;
use tokio::sync::watch;
use tracing::error;
use tracing::info;

use crate::constants::EXIT_SETUP_FAILURE;
use crate::Cli;
use crate::Error;
use crate::HarnessConfig;
use crate::LifecycleControllerBuilder;
use crate::Result;

/// Runs one test and returns the process exit code.
pub async fn run(cli: Cli) -> i32 {
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!(kind = e.kind(), "invalid configuration: {}", e);
            return EXIT_SETUP_FAILURE;
        }
    };

    let (graceful_tx, graceful_rx) = watch::channel(());
    tokio::spawn(async move {
        if let Err(e) = graceful_shutdown(graceful_tx).await {
            error!("Failed to listen for shutdown signals: {:?}", e);
        }
    });

    let controller = match LifecycleControllerBuilder::new(config, cli.command)
        .shutdown_signal(graceful_rx)
        .build()
    {
        Ok(controller) => controller,
        Err(e) => {
            error!(kind = e.kind(), "cannot start run: {}", e);
            return EXIT_SETUP_FAILURE;
        }
    };

    let report = controller.run().await;
    for line in report.summary() {
        println!("{line}");
    }
    report.exit_code()
}

/// Defaults, then `CONFIG_PATH`, then `--config`, then `WTF_TEST__*`, then
/// the remaining CLI flags; validated last.
pub fn load_config(cli: &Cli) -> Result<HarnessConfig> {
    let mut config = HarnessConfig::new()?;
    if let Some(path) = &cli.config {
        info!("with_override_config from: {}", path.display());
        config = config.with_override_config(&path.to_string_lossy())?;
    }
    cli.apply(&mut config);
    config.validate()
}

async fn graceful_shutdown(graceful_tx: watch::Sender<()>) -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT detected.");
        },
        _ = sigterm.recv() => {
            info!("SIGTERM detected.");
        },
    }

    graceful_tx
        .send(())
        .map_err(|e| Error::Fatal(format!("Failed to send shutdown signal: {}", e)))
}
