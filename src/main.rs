use clap::Parser;
use tracing_subscriber::EnvFilter;
use wtf_test_runner::constants::EXIT_SETUP_FAILURE;
use wtf_test_runner::harness;
use wtf_test_runner::Cli;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    init_observability();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(EXIT_SETUP_FAILURE);
        }
    };

    let code = harness::run(cli).await;
    std::process::exit(code);
}

/// Diagnostics go to stderr; stdout carries the command line, the process
/// logs and the report.
fn init_observability() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
