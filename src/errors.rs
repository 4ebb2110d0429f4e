//! Test Runner Error Hierarchy
//!
//! Errors are grouped by the lifecycle phase that raises them, so the entry
//! point can map any failure onto an exit-code class without inspecting
//! messages.

use std::path::PathBuf;
use std::time::Duration;

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Cluster bring-up failures (workspace, spawn, readiness)
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// Administrative operations against the service coordinator
    #[error(transparent)]
    Admin(#[from] AdminError),

    /// Command template parsing and rendering
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// I/O failures not attributable to a single process
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The run was stopped by a shutdown signal before the command finished
    #[error("Interrupted by {0}")]
    Interrupted(&'static str),

    /// Unrecoverable failures
    #[error("Fatal error: {0}")]
    Fatal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// A process working directory was left behind by an earlier run
    #[error("environment already exists (at least partially): {}", path.display())]
    EnvironmentConflict { path: PathBuf },

    /// The executable could not be launched (missing, permissions)
    #[error("failed to launch {program}: {source}")]
    SpawnFailure {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Workspace or per-process directory could not be prepared
    #[error("failed to prepare {}: {source}", path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Readiness probe gave up on a role group
    #[error("{role} instance listening on {port} not ready after {elapsed:?}")]
    NotReady {
        role: String,
        port: u16,
        elapsed: Duration,
    },

    /// Controller asked to move between states out of order
    #[error("Invalid lifecycle transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// The admin tool could not be started or fed its input
    #[error("admin client for {addr} unreachable: {source}")]
    Unreachable {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The coordinator refused the space definition
    #[error("add-space rejected by {addr} (status {status:?}): {output}")]
    Rejected {
        addr: String,
        status: Option<i32>,
        output: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("test command template is empty")]
    Empty,

    #[error("unknown placeholder {{{token}}} in argument {arg:?}")]
    UnknownToken { token: String, arg: String },

    #[error("unterminated placeholder in argument {0:?}")]
    Unterminated(String),

    #[error("single '}}' outside a placeholder in argument {0:?}")]
    UnmatchedBrace(String),
}

impl Error {
    /// Short machine-friendly class used in the final report.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::Setup(SetupError::EnvironmentConflict { .. }) => "environment_conflict",
            Error::Setup(SetupError::SpawnFailure { .. }) => "spawn_failure",
            Error::Setup(_) => "setup",
            Error::Admin(_) => "admin_operation_failure",
            Error::Template(_) => "template",
            Error::Io(_) => "io",
            Error::Interrupted(_) => "interrupted",
            Error::Fatal(_) => "fatal",
        }
    }
}
