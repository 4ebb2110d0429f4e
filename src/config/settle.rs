use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use super::BackoffPolicy;
use crate::Error;
use crate::Result;

/// How the controller decides a just-started role group may accept
/// dependents.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SettleStrategy {
    /// Sleep for `delay_ms` unconditionally
    Fixed,
    /// Poll every listen port of the group, then sleep for `delay_ms`
    Tcp,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SettleConfig {
    #[serde(default = "default_strategy")]
    pub strategy: SettleStrategy,

    /// Fixed wait after every bring-up phase (unit: milliseconds)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Polling policy used by the `tcp` strategy
    #[serde(default)]
    pub backoff: BackoffPolicy,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            delay_ms: default_delay_ms(),
            backoff: BackoffPolicy::default(),
        }
    }
}

impl SettleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.strategy == SettleStrategy::Fixed && self.delay_ms == 0 {
            return Err(Error::Config(ConfigError::Message(
                "settle.delay_ms must be positive with the fixed strategy".into(),
            )));
        }
        self.backoff.validate("settle.backoff")
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn default_strategy() -> SettleStrategy {
    SettleStrategy::Fixed
}
fn default_delay_ms() -> u64 {
    1000
}
