use std::env;
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

/// Environment handed to every spawned cluster process.
///
/// Processes do not inherit the runner's environment; they get exactly the
/// variables built by [`EnvironmentConfig::process_env`].
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct EnvironmentConfig {
    /// Out-of-tree build output. When set it is appended to the search
    /// paths and `WTF_EXEC_PATH`/`WTF_COORD_LIB` point into it.
    #[serde(default)]
    pub build_dir: Option<PathBuf>,

    /// glog `GLOG_minloglevel` for the cluster processes
    #[serde(default)]
    pub min_log_level: u8,
}

impl EnvironmentConfig {
    /// Directory appended to `PATH` and `CLASSPATH`: the build directory if
    /// configured, else the directory holding the runner binary.
    pub fn search_dir(&self) -> Option<PathBuf> {
        self.build_dir.clone().or_else(|| {
            env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf))
        })
    }

    /// Builds the full variable set from the runner's own `PATH` and
    /// `CLASSPATH`.
    pub fn process_env(&self) -> Vec<(String, OsString)> {
        self.process_env_from(env::var_os("PATH"), env::var_os("CLASSPATH"))
    }

    pub(crate) fn process_env_from(
        &self,
        path: Option<OsString>,
        classpath: Option<OsString>,
    ) -> Vec<(String, OsString)> {
        let search_dir = self.search_dir();

        let mut vars = vec![
            ("GLOG_logtostderr".to_string(), OsString::new()),
            ("GLOG_minloglevel".to_string(), self.min_log_level.to_string().into()),
            ("GLOG_logbufsecs".to_string(), OsString::from("0")),
        ];

        let dir_entry = search_dir.clone().map(OsString::from);
        vars.push(("PATH".to_string(), join_search_path(path, dir_entry)));

        let jar_glob = search_dir.as_ref().map(|d| d.join("*").into_os_string());
        vars.push(("CLASSPATH".to_string(), join_search_path(classpath, jar_glob)));

        if let Some(build_dir) = &self.build_dir {
            vars.push(("WTF_EXEC_PATH".to_string(), build_dir.clone().into_os_string()));
            vars.push((
                "WTF_COORD_LIB".to_string(),
                build_dir.join(".libs").join("libwtf-coordinator").into_os_string(),
            ));
        }
        vars
    }
}

/// `existing:extra` without empty segments.
fn join_search_path(
    existing: Option<OsString>,
    extra: Option<OsString>,
) -> OsString {
    let mut joined = OsString::new();
    for part in [existing, extra].into_iter().flatten() {
        if part.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push(":");
        }
        joined.push(part);
    }
    joined
}
