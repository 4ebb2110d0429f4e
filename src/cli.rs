use std::path::PathBuf;

use clap::Parser;

use crate::HarnessConfig;

#[derive(Parser, Debug)]
#[command(name = "wtf-test-runner")]
#[command(version)]
#[command(about = "Runs a test command against a local HyperDex + WTF cluster", long_about = None)]
pub struct Cli {
    /// HyperDex coordinator count [config default: 1]
    #[arg(long, value_name = "N")]
    pub hyperdex_coordinators: Option<usize>,

    /// HyperDex daemon count [config default: 1]
    #[arg(long, value_name = "N")]
    pub hyperdex_daemons: Option<usize>,

    /// WTF coordinator count [config default: 1]
    #[arg(long, value_name = "N")]
    pub wtf_coordinators: Option<usize>,

    /// WTF daemon count [config default: 1]
    #[arg(long, value_name = "N")]
    pub wtf_daemons: Option<usize>,

    /// TOML file applied on top of the defaults and `CONFIG_PATH`
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Workspace root instead of a fresh temp directory
    #[arg(long)]
    pub workspace: Option<PathBuf>,

    /// Keep the workspace even when the run is clean
    #[arg(long, default_value_t = false)]
    pub keep_workspace: bool,

    /// Only print process logs when something went wrong
    #[arg(long, default_value_t = false)]
    pub no_log_output: bool,

    /// Test command; `{HYPERDEX_HOST}`, `{HYPERDEX_PORT}`, `{WTF_HOST}`
    /// and `{WTF_PORT}` are replaced once the cluster is up
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// Writes every flag that was given into `config`.
    pub fn apply(
        &self,
        config: &mut HarnessConfig,
    ) {
        let counts = [
            (self.hyperdex_coordinators, &mut config.cluster.service.coordinators),
            (self.hyperdex_daemons, &mut config.cluster.service.daemons),
            (self.wtf_coordinators, &mut config.cluster.overlay.coordinators),
            (self.wtf_daemons, &mut config.cluster.overlay.daemons),
        ];
        for (flag, count) in counts {
            if let Some(n) = flag {
                *count = n;
            }
        }

        if let Some(root) = &self.workspace {
            config.workspace.root = Some(root.clone());
        }
        if self.keep_workspace {
            config.workspace.clean = false;
        }
        if self.no_log_output {
            config.workspace.log_output = false;
        }
    }
}
