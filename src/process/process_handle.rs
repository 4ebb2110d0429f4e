//! A single cluster process and the directory it runs in.
//!
//! Every process gets a working directory of its own that must not exist
//! beforehand, so a dirty environment from an earlier run is never reused.
//! stdout and stderr are captured into one log file inside that directory.
//!
//! The child is spawned with `kill_on_drop`, so even a panicking runner does
//! not leak processes; regular shutdown goes through [`ProcessHandle::terminate`].

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::process::Stdio;

use tokio::process::Child;
use tokio::process::Command;
use tracing::debug;
use tracing::warn;

use crate::constants::CORE_DUMP_PREFIX;
use crate::Error;
use crate::Result;
use crate::SetupError;

#[derive(Debug)]
pub struct ProcessHandle {
    cwd: PathBuf,
    log_path: PathBuf,
    child: Child,
    pid: Option<u32>,
    exit: Option<ExitStatus>,
    exited_early: bool,
}

impl ProcessHandle {
    /// Creates `cwd`, then launches `command` inside it with exactly `env`
    /// as its environment.
    ///
    /// # Errors
    /// - `SetupError::EnvironmentConflict` if `cwd` already exists; nothing
    ///   is spawned in that case
    /// - `SetupError::Workspace` if the directory or log file cannot be created
    /// - `SetupError::SpawnFailure` if the executable cannot be launched
    pub fn spawn(
        command: Vec<String>,
        cwd: &Path,
        log_path: &Path,
        env: &[(String, OsString)],
    ) -> Result<Self> {
        let Some(program) = command.first().cloned() else {
            return Err(Error::Fatal("cannot spawn an empty command".to_string()));
        };

        create_fresh_dir(cwd)?;

        let log_file = fs::File::create(log_path).map_err(|source| SetupError::Workspace {
            path: log_path.to_path_buf(),
            source,
        })?;
        let stderr = log_file.try_clone().map_err(|source| SetupError::Workspace {
            path: log_path.to_path_buf(),
            source,
        })?;

        let child = Command::new(&program)
            .args(&command[1..])
            .current_dir(cwd)
            .env_clear()
            .envs(env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::from(log_file))
            .stderr(Stdio::from(stderr))
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SetupError::SpawnFailure { program, source })?;

        let pid = child.id();
        debug!(?pid, cwd = %cwd.display(), "spawned {:?}", command);

        Ok(Self {
            cwd: cwd.to_path_buf(),
            log_path: log_path.to_path_buf(),
            child,
            pid,
            exit: None,
            exited_early: false,
        })
    }

    /// Kills the process with SIGKILL and waits for it, so no zombie is left
    /// behind. A process that already exited is only reaped. Calling it again
    /// returns the recorded status.
    pub async fn terminate(&mut self) -> io::Result<ExitStatus> {
        if let Some(status) = self.exit {
            return Ok(status);
        }

        let status = match self.child.try_wait()? {
            Some(status) => {
                self.exited_early = true;
                status
            }
            None => {
                if let Err(e) = self.child.start_kill() {
                    // Raced with a natural exit; wait() below still reaps it
                    warn!(pid = ?self.pid, "kill failed: {}", e);
                }
                self.child.wait().await?
            }
        };

        self.exit = Some(status);
        Ok(status)
    }

    /// Core dump artifacts (`core*`) in the working directory.
    pub fn core_dumps(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.cwd) else {
            return Vec::new();
        };
        let mut dumps: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(CORE_DUMP_PREFIX))
            .map(|entry| entry.path())
            .collect();
        dumps.sort();
        dumps
    }

    pub async fn read_log(&self) -> io::Result<String> {
        let bytes = tokio::fs::read(&self.log_path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// True when the process was found dead at termination time.
    pub fn exited_early(&self) -> bool {
        self.exited_early
    }
}

/// `create_dir` (not `create_dir_all`) on the last component makes the
/// existence check and the creation one step.
fn create_fresh_dir(dir: &Path) -> Result<()> {
    if let Some(parent) = dir.parent() {
        fs::create_dir_all(parent).map_err(|source| SetupError::Workspace {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    match fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            Err(SetupError::EnvironmentConflict {
                path: dir.to_path_buf(),
            }
            .into())
        }
        Err(source) => Err(SetupError::Workspace {
            path: dir.to_path_buf(),
            source,
        }
        .into()),
    }
}
