use std::ffi::OsString;
use std::io::Write;
use std::path::Path;

use tokio::process::Command;
use tokio::sync::watch;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::CommandOutcome;
use super::CrashReport;
use super::LifecycleState;
use super::ProcessRecord;
use super::RunReport;
use super::TeardownReport;
use crate::AdminClient;
use crate::ClusterTopology;
use crate::CommandTemplate;
use crate::Error;
use crate::ReadinessProbe;
use crate::Result;
use crate::RoleGroup;
use crate::SetupError;
use crate::SpaceSchema;

/// Drives one test run from an empty workspace to `Done`.
///
/// Built through [`LifecycleControllerBuilder`](super::LifecycleControllerBuilder).
pub struct LifecycleController {
    pub(super) topology: ClusterTopology,
    pub(super) template: CommandTemplate,
    pub(super) env: Vec<(String, OsString)>,
    pub(super) schema: SpaceSchema,
    pub(super) admin: Box<dyn AdminClient>,
    pub(super) probe: Box<dyn ReadinessProbe>,
    pub(super) log_sink: Box<dyn Write + Send>,
    pub(super) shutdown_signal: Option<watch::Receiver<()>>,
    pub(super) state: LifecycleState,
    pub(super) transitions: Vec<LifecycleState>,
}

impl LifecycleController {
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn topology(&self) -> &ClusterTopology {
        &self.topology
    }

    /// Brings the cluster up, runs the test command and tears everything
    /// down. Teardown runs exactly once on every path, including a
    /// shutdown signal arriving mid-run.
    pub async fn run(mut self) -> RunReport {
        let outcome = match self.shutdown_signal.take() {
            Some(shutdown) => {
                let observer = shutdown.clone();
                let outcome = tokio::select! {
                    biased;
                    _ = wait_for_shutdown(shutdown) => Err(Error::Interrupted("shutdown signal")),
                    outcome = self.bring_up_and_execute() => outcome,
                };
                // A terminal SIGINT reaches the test command too; the
                // interrupt wins over whatever the command reported.
                if observer.borrow().has_changed() {
                    if let Ok(discarded) = &outcome {
                        debug!(code = discarded.exit_code(), "command outcome superseded by shutdown");
                    }
                    warn!("shutdown requested, tearing the cluster down");
                    Err(Error::Interrupted("shutdown signal"))
                } else {
                    outcome
                }
            }
            None => self.bring_up_and_execute().await,
        };

        match &outcome {
            Ok(outcome) if outcome.success() => {}
            Ok(outcome) => {
                info!(code = outcome.exit_code(), "test command failed");
                self.topology.retain_workspace();
                self.topology.force_log_output();
            }
            Err(e) => {
                error!(kind = e.kind(), state = %self.state, "run aborted: {}", e);
                self.topology.retain_workspace();
                self.topology.force_log_output();
            }
        }

        let teardown = self.teardown().await;
        RunReport {
            outcome,
            teardown,
            transitions: self.transitions,
        }
    }

    async fn bring_up_and_execute(&mut self) -> Result<CommandOutcome> {
        let bindings = self.topology.template_bindings();
        self.template.check(&bindings)?;

        self.transition(LifecycleState::ServiceStarting)?;
        let workspace = self.topology.prepare_workspace()?;
        info!(workspace = %workspace.display(), "bringing up {}", self.topology.service().name());
        let service = self.topology.service_mut();
        start_group(&mut service.coordinators, &workspace, &self.env, self.probe.as_ref()).await?;
        start_group(&mut service.daemons, &workspace, &self.env, self.probe.as_ref()).await?;
        self.transition(LifecycleState::ServiceSettled)?;

        self.transition(LifecycleState::OverlayStarting)?;
        info!("bringing up {}", self.topology.overlay().name());
        let overlay = self.topology.overlay_mut();
        start_group(&mut overlay.coordinators, &workspace, &self.env, self.probe.as_ref()).await?;
        start_group(&mut overlay.daemons, &workspace, &self.env, self.probe.as_ref()).await?;
        self.transition(LifecycleState::OverlaySettled)?;

        self.probe.settle().await?;
        info!(space = %self.schema.name, "registering space");
        self.admin.add_space(&self.schema).await?;
        self.probe.settle().await?;
        self.transition(LifecycleState::SchemaInjected)?;

        let command = self.template.render(&bindings)?;
        self.transition(LifecycleState::Running)?;
        self.execute(command).await
    }

    async fn execute(
        &mut self,
        command: Vec<String>,
    ) -> Result<CommandOutcome> {
        self.emit(&command.join(" "));
        let Some((program, args)) = command.split_first() else {
            return Err(Error::Fatal("rendered test command is empty".to_string()));
        };

        let status = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|source| SetupError::SpawnFailure {
                program: program.clone(),
                source,
            })?;

        info!(%status, "test command finished");
        Ok(CommandOutcome { command, status })
    }

    /// Crash scan, termination, log dump and workspace removal. Every step
    /// runs regardless of how the previous one went.
    async fn teardown(&mut self) -> TeardownReport {
        if let Err(e) = self.transition(LifecycleState::TearingDown) {
            error!("{}", e);
        }

        let crashes = self.scan_for_crashes();
        if !crashes.is_empty() {
            self.topology.retain_workspace();
            self.topology.force_log_output();
        }
        for crash in &crashes {
            error!(group = %crash.group, instance = crash.instance, "{}", crash);
            self.emit(&crash.to_string());
        }

        let processes = self.terminate_all().await;

        let logs_dumped = self.topology.log_output();
        if logs_dumped {
            self.dump_logs().await;
        }

        let workspace = self.topology.workspace().map(Path::to_path_buf);
        let workspace_removed = match &workspace {
            Some(root) if self.topology.clean() => remove_workspace(root).await,
            _ => false,
        };

        if let Err(e) = self.transition(LifecycleState::Done) {
            error!("{}", e);
        }

        TeardownReport {
            crashes,
            processes,
            workspace,
            workspace_removed,
            logs_dumped,
        }
    }

    fn scan_for_crashes(&self) -> Vec<CrashReport> {
        let mut crashes = Vec::new();
        for group in self.topology.groups() {
            for (instance, process) in group.processes().iter().enumerate() {
                let artifacts = process.core_dumps();
                if !artifacts.is_empty() {
                    crashes.push(CrashReport {
                        group: group.name(),
                        instance,
                        artifacts,
                    });
                }
            }
        }
        crashes
    }

    async fn terminate_all(&mut self) -> Vec<ProcessRecord> {
        let mut records = Vec::with_capacity(self.topology.process_count());
        for group in self.topology.groups_mut() {
            let name = group.name();
            for (instance, process) in group.processes_mut().iter_mut().enumerate() {
                let mut record = ProcessRecord {
                    group: name.clone(),
                    instance,
                    pid: process.pid(),
                    status: None,
                    exited_early: false,
                    error: None,
                };
                match process.terminate().await {
                    Ok(status) => {
                        debug!(group = %name, instance, %status, "terminated");
                        record.status = Some(status);
                        record.exited_early = process.exited_early();
                    }
                    Err(e) => {
                        warn!(group = %name, instance, "failed to terminate: {}", e);
                        record.error = Some(e.to_string());
                    }
                }
                records.push(record);
            }
        }
        records
    }

    async fn dump_logs(&mut self) {
        for group in self.topology.groups() {
            let name = group.name();
            for (instance, process) in group.processes().iter().enumerate() {
                let body = match process.read_log().await {
                    Ok(body) => body,
                    Err(e) => {
                        warn!(path = %process.log_path().display(), "cannot read log: {}", e);
                        format!("<log unavailable: {e}>")
                    }
                };
                if let Err(e) = writeln!(self.log_sink, "{name} {instance}\n{body}") {
                    warn!("failed to write log dump: {}", e);
                }
            }
        }
        if let Err(e) = self.log_sink.flush() {
            warn!("failed to flush log dump: {}", e);
        }
    }

    fn emit(
        &mut self,
        line: &str,
    ) {
        if let Err(e) = writeln!(self.log_sink, "{line}").and_then(|_| self.log_sink.flush()) {
            warn!("failed to write to output: {}", e);
        }
    }

    fn transition(
        &mut self,
        next: LifecycleState,
    ) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(SetupError::InvalidTransition {
                from: self.state.as_str(),
                to: next.as_str(),
            }
            .into());
        }
        debug!(from = %self.state, to = %next, "lifecycle transition");
        self.state = next;
        self.transitions.push(next);
        Ok(())
    }
}

async fn start_group(
    group: &mut RoleGroup,
    workspace: &Path,
    env: &[(String, OsString)],
    probe: &dyn ReadinessProbe,
) -> Result<()> {
    group.start(workspace, env)?;
    probe.wait_group(group).await
}

async fn remove_workspace(root: &Path) -> bool {
    match tokio::fs::remove_dir_all(root).await {
        Ok(()) => {
            info!(workspace = %root.display(), "workspace removed");
            true
        }
        Err(e) => {
            warn!(workspace = %root.display(), "failed to remove workspace: {}", e);
            false
        }
    }
}

/// Resolves when the sender fires; stays pending if it is dropped without
/// firing.
async fn wait_for_shutdown(mut shutdown: watch::Receiver<()>) {
    if shutdown.changed().await.is_err() {
        std::future::pending::<()>().await;
    }
}
