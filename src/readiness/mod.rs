//! Settle points between bring-up phases.
//!
//! The controller calls the probe after every role group it starts and
//! around the admin call. [`FixedDelay`] sleeps unconditionally;
//! [`TcpProbe`] additionally polls every listen port of the group.

mod fixed_delay;
mod tcp_probe;

pub use fixed_delay::*;
pub use tcp_probe::*;

#[cfg(test)]
mod readiness_test;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::Result;
use crate::RoleGroup;
use crate::SettleConfig;
use crate::SettleStrategy;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Returns once every process of a just-started group may accept
    /// dependents.
    async fn wait_group(
        &self,
        group: &RoleGroup,
    ) -> Result<()>;

    /// Settle point not tied to a group (before and after the admin call).
    async fn settle(&self) -> Result<()>;
}

pub fn probe_from_config(config: &SettleConfig) -> Box<dyn ReadinessProbe> {
    match config.strategy {
        SettleStrategy::Fixed => Box::new(FixedDelay::new(config.delay())),
        SettleStrategy::Tcp => Box::new(TcpProbe::new(config.backoff, config.delay())),
    }
}
