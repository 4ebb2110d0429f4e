use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::ExitStatus;

use super::LifecycleState;
use crate::constants::EXIT_SETUP_FAILURE;
use crate::constants::EXIT_SIGNAL_BASE;
use crate::Result;

/// How the test command ended.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub command: Vec<String>,
    pub status: ExitStatus,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// The command's own code, or `128 + signal` if it was killed.
    pub fn exit_code(&self) -> i32 {
        match self.status.code() {
            Some(code) => code,
            None => EXIT_SIGNAL_BASE + self.status.signal().unwrap_or(0),
        }
    }
}

/// A `core*` artifact found in a process working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrashReport {
    pub group: String,
    pub instance: usize,
    pub artifacts: Vec<PathBuf>,
}

impl fmt::Display for CrashReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} {} dumped core", self.group, self.instance)
    }
}

/// Termination result of one cluster process.
#[derive(Debug, Clone)]
pub struct ProcessRecord {
    pub group: String,
    pub instance: usize,
    pub pid: Option<u32>,
    pub status: Option<ExitStatus>,
    /// Already dead when teardown reached it
    pub exited_early: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TeardownReport {
    pub crashes: Vec<CrashReport>,
    pub processes: Vec<ProcessRecord>,
    pub workspace: Option<PathBuf>,
    pub workspace_removed: bool,
    pub logs_dumped: bool,
}

impl TeardownReport {
    pub fn crash_detected(&self) -> bool {
        !self.crashes.is_empty()
    }

    pub fn terminated(&self) -> usize {
        self.processes.iter().filter(|p| p.status.is_some()).count()
    }

    pub fn exited_early(&self) -> usize {
        self.processes.iter().filter(|p| p.exited_early).count()
    }

    pub fn failed(&self) -> usize {
        self.processes.iter().filter(|p| p.error.is_some()).count()
    }
}

/// Bring-up outcome plus what teardown found and did.
#[derive(Debug)]
pub struct RunReport {
    pub outcome: Result<CommandOutcome>,
    pub teardown: TeardownReport,
    pub transitions: Vec<LifecycleState>,
}

impl RunReport {
    /// Exit code for the whole run: the command's, or
    /// `EXIT_SETUP_FAILURE` if it never produced one.
    pub fn exit_code(&self) -> i32 {
        match &self.outcome {
            Ok(outcome) => outcome.exit_code(),
            Err(_) => EXIT_SETUP_FAILURE,
        }
    }

    /// Human readable closing lines printed after the logs.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match &self.outcome {
            Ok(outcome) => lines.push(format!(
                "test command exited with {} ({})",
                outcome.exit_code(),
                outcome.status
            )),
            Err(e) => lines.push(format!("run aborted [{}]: {}", e.kind(), e)),
        }
        for crash in &self.teardown.crashes {
            lines.push(format!("CRASH: {crash}"));
        }
        lines.push(format!(
            "terminated {} of {} cluster processes ({} already exited, {} failed)",
            self.teardown.terminated(),
            self.teardown.processes.len(),
            self.teardown.exited_early(),
            self.teardown.failed(),
        ));
        if let Some(workspace) = &self.teardown.workspace {
            let verb = if self.teardown.workspace_removed {
                "removed"
            } else {
                "retained"
            };
            lines.push(format!("workspace {verb}: {}", workspace.display()));
        }
        lines
    }
}
