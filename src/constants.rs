// -
// Filesystem layout

/// Combined stdout/stderr capture inside every process working directory
pub const PROCESS_LOG_FILE: &str = "wtf-test-runner.log";

/// Prefix of workspace roots created under the system temp dir
pub const WORKSPACE_PREFIX: &str = "wtf-test-";

/// Core dump artifacts are matched by file-name prefix (`core*`)
pub const CORE_DUMP_PREFIX: &str = "core";

// -
// Network

pub const LOOPBACK_HOST: &str = "127.0.0.1";

// -
// Exit codes

/// Returned when bring-up, schema injection or argument handling failed
/// before the test command could produce a status.
pub const EXIT_SETUP_FAILURE: i32 = 125;

/// Shells report death-by-signal as 128 + signal number.
pub const EXIT_SIGNAL_BASE: i32 = 128;
