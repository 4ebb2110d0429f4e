//! Assembles a [`LifecycleController`] from a validated [`HarnessConfig`].
//!
//! Defaults match a regular test run: the command-line admin tool, the
//! configured settle strategy and stdout as the report/log sink. Each of
//! them can be overridden, which is how the controller is driven without a
//! real cluster.
//!
//! ```ignore
//! let (shutdown_tx, shutdown_rx) = watch::channel(());
//! let report = LifecycleControllerBuilder::new(config, command)
//!     .shutdown_signal(shutdown_rx)
//!     .build()?
//!     .run()
//!     .await;
//! ```

use std::ffi::OsString;
use std::io::Write;

use tokio::sync::watch;

use super::LifecycleController;
use super::LifecycleState;
use crate::probe_from_config;
use crate::AdminClient;
use crate::ClusterTopology;
use crate::CommandAdminClient;
use crate::CommandTemplate;
use crate::HarnessConfig;
use crate::ReadinessProbe;
use crate::Result;

pub struct LifecycleControllerBuilder {
    config: HarnessConfig,
    command: Vec<String>,
    env: Option<Vec<(String, OsString)>>,
    admin: Option<Box<dyn AdminClient>>,
    probe: Option<Box<dyn ReadinessProbe>>,
    log_sink: Option<Box<dyn Write + Send>>,
    shutdown_signal: Option<watch::Receiver<()>>,
}

impl LifecycleControllerBuilder {
    pub fn new(
        config: HarnessConfig,
        command: Vec<String>,
    ) -> Self {
        Self {
            config,
            command,
            env: None,
            admin: None,
            probe: None,
            log_sink: None,
            shutdown_signal: None,
        }
    }

    /// Replaces the environment built from `config.environment`.
    pub fn env(
        mut self,
        env: Vec<(String, OsString)>,
    ) -> Self {
        self.env = Some(env);
        self
    }

    pub fn admin(
        mut self,
        admin: Box<dyn AdminClient>,
    ) -> Self {
        self.admin = Some(admin);
        self
    }

    pub fn probe(
        mut self,
        probe: Box<dyn ReadinessProbe>,
    ) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Where the rendered command, crash lines and process logs are
    /// written.
    pub fn log_sink(
        mut self,
        sink: Box<dyn Write + Send>,
    ) -> Self {
        self.log_sink = Some(sink);
        self
    }

    pub fn shutdown_signal(
        mut self,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        self.shutdown_signal = Some(shutdown_signal);
        self
    }

    /// Parses the command template and plans the topology. Nothing is
    /// spawned and no directory is created until the controller runs.
    pub fn build(self) -> Result<LifecycleController> {
        let template = CommandTemplate::parse(self.command)?;
        let topology = ClusterTopology::from_config(&self.config);
        let env = self
            .env
            .unwrap_or_else(|| self.config.environment.process_env());

        let admin = match self.admin {
            Some(admin) => admin,
            None => {
                let (host, port) = topology.service().coordinator_endpoint();
                Box::new(CommandAdminClient::new(
                    self.config.admin.program.clone(),
                    host,
                    port,
                    env.clone(),
                ))
            }
        };
        let probe = self
            .probe
            .unwrap_or_else(|| probe_from_config(&self.config.settle));
        let log_sink = self
            .log_sink
            .unwrap_or_else(|| Box::new(std::io::stdout()));

        Ok(LifecycleController {
            topology,
            template,
            env,
            schema: self.config.admin.space,
            admin,
            probe,
            log_sink,
            shutdown_signal: self.shutdown_signal,
            state: LifecycleState::Idle,
            transitions: vec![LifecycleState::Idle],
        })
    }
}
