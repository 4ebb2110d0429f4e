use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorkspaceConfig {
    /// Workspace root; a fresh `wtf-test-*` temp directory when unset
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Remove the workspace after a run without crashes
    #[serde(default = "default_clean")]
    pub clean: bool,

    /// Print every process log during teardown
    #[serde(default = "default_log_output")]
    pub log_output: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: None,
            clean: default_clean(),
            log_output: default_log_output(),
        }
    }
}

fn default_clean() -> bool {
    true
}
fn default_log_output() -> bool {
    true
}
