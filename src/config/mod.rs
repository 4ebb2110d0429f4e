//! Configuration management for the test runner.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base (the port plan and programs of the stock
//!   HyperDex + WTF test cluster)
//! - Configuration file support (`CONFIG_PATH` or `--config`)
//! - Environment variable overrides (`WTF_TEST__<SECTION>__<KEY>`)
//! - Component-wise validation
mod admin;
mod cluster;
mod environment;
mod retry;
mod settle;
mod workspace;
pub use admin::*;
pub use cluster::*;
pub use environment::*;
pub use retry::*;
pub use settle::*;
pub use workspace::*;

use std::env;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

const ENV_PREFIX: &str = "WTF_TEST";

/// Legacy variable pointing the runner at an out-of-tree build
const BUILD_DIR_ENV: &str = "WTF_BUILDDIR";

/// Main configuration container for a test run
///
/// Sources are merged with increasing priority:
/// 1. Default values from code implementation
/// 2. Configuration file specified by `CONFIG_PATH`
/// 3. Environment variables with `WTF_TEST__` prefix
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct HarnessConfig {
    /// Layers, programs and port plan
    #[serde(default)]
    pub cluster: ClusterConfig,
    /// Where process directories live and what happens to them afterwards
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    /// How the controller waits for a freshly started role group
    #[serde(default)]
    pub settle: SettleConfig,
    /// Environment handed to every cluster process
    #[serde(default)]
    pub environment: EnvironmentConfig,
    /// Space registration against the service coordinator
    #[serde(default)]
    pub admin: AdminConfig,
}

impl HarnessConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Callers MUST call `validate()` once every override (file, CLI) has
    /// been applied.
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(env_source());

        let mut config: Self = builder.build()?.try_deserialize()?;
        if config.environment.build_dir.is_none() {
            config.environment.build_dir = env::var_os(BUILD_DIR_ENV).map(Into::into);
        }
        Ok(config)
    }

    /// Applies a configuration file on top of the current values.
    ///
    /// Environment variables are re-applied afterwards so they keep the
    /// highest priority.
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(env_source())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates every section and returns the validated instance.
    pub fn validate(self) -> Result<Self> {
        self.cluster.validate()?;
        self.settle.validate()?;
        self.admin.validate()?;
        Ok(self)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}
