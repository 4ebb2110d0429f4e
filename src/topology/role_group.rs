use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;

use tracing::info;

use super::Role;
use crate::constants::PROCESS_LOG_FILE;
use crate::Error;
use crate::ProcessHandle;
use crate::Result;

/// `count` processes of one role in one layer.
///
/// Instance `i` listens on `base_port + i` and runs in
/// `<workspace>/<layer>-<tag><i>`.
#[derive(Debug)]
pub struct RoleGroup {
    layer: String,
    program: String,
    host: String,
    role: Role,
    count: usize,
    base_port: u16,
    processes: Vec<ProcessHandle>,
}

impl RoleGroup {
    pub fn new(
        layer: impl Into<String>,
        program: impl Into<String>,
        host: impl Into<String>,
        role: Role,
        count: usize,
        base_port: u16,
    ) -> Self {
        Self {
            layer: layer.into(),
            program: program.into(),
            host: host.into(),
            role,
            count,
            base_port,
            processes: Vec::with_capacity(count),
        }
    }

    /// Name used in logs and reports, e.g. `hyperdex-coordinator`.
    pub fn name(&self) -> String {
        format!("{}-{}", self.layer, self.role)
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn base_port(&self) -> u16 {
        self.base_port
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(
        &self,
        instance: usize,
    ) -> u16 {
        self.base_port + instance as u16
    }

    pub fn ports(&self) -> impl Iterator<Item = u16> + '_ {
        (0..self.count).map(|i| self.port(i))
    }

    pub fn working_dir(
        &self,
        workspace: &Path,
        instance: usize,
    ) -> PathBuf {
        workspace.join(format!("{}-{}{}", self.layer, self.role.dir_tag(), instance))
    }

    /// Command line for instance `instance`.
    ///
    /// Coordinator 0 starts in bootstrap mode; coordinators 1..N connect to
    /// coordinator 0; daemons always connect to the layer coordinator.
    pub fn instance_command(
        &self,
        instance: usize,
    ) -> Vec<String> {
        let port = self.port(instance).to_string();
        let mut cmd = vec![self.program.clone(), self.role.subcommand().to_string()];

        if let Role::Daemon { threads, .. } = self.role {
            cmd.extend(["-t".to_string(), threads.to_string()]);
        }
        cmd.extend([
            "--foreground".to_string(),
            "--listen".to_string(),
            self.host.clone(),
            "--listen-port".to_string(),
            port,
        ]);

        match self.role {
            Role::Coordinator if instance > 0 => cmd.extend([
                "--connect".to_string(),
                self.host.clone(),
                "--connect-port".to_string(),
                self.base_port.to_string(),
            ]),
            Role::Coordinator => {}
            Role::Daemon {
                coordinator_port, ..
            } => cmd.extend([
                "--coordinator".to_string(),
                self.host.clone(),
                "--coordinator-port".to_string(),
                coordinator_port.to_string(),
            ]),
        }
        cmd
    }

    /// Spawns every instance in index order.
    ///
    /// The first failure aborts the loop. Instances spawned before it stay in
    /// the group so teardown can reap them; the group never kills anything
    /// on its own.
    pub fn start(
        &mut self,
        workspace: &Path,
        env: &[(String, OsString)],
    ) -> Result<()> {
        if !self.processes.is_empty() {
            return Err(Error::Fatal(format!("{} already started", self.name())));
        }

        for instance in 0..self.count {
            let cwd = self.working_dir(workspace, instance);
            let log_path = cwd.join(PROCESS_LOG_FILE);
            let handle = ProcessHandle::spawn(self.instance_command(instance), &cwd, &log_path, env)?;
            info!(
                group = %self.name(),
                instance,
                port = self.port(instance),
                pid = ?handle.pid(),
                "started"
            );
            self.processes.push(handle);
        }
        Ok(())
    }

    /// Spawned processes, indexed by instance.
    pub fn processes(&self) -> &[ProcessHandle] {
        &self.processes
    }

    pub fn processes_mut(&mut self) -> &mut [ProcessHandle] {
        &mut self.processes
    }
}
