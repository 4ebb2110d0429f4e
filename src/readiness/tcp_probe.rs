use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::debug;
use tracing::warn;

use super::ReadinessProbe;
use crate::utils::async_task::task_with_timeout_and_exponential_backoff;
use crate::utils::net::connect_once;
use crate::BackoffPolicy;
use crate::Result;
use crate::RoleGroup;
use crate::SetupError;

/// Polls every listen port of a group until it accepts connections, then
/// waits `grace` so the process can finish registering with its peers.
#[derive(Debug, Clone, Copy)]
pub struct TcpProbe {
    backoff: BackoffPolicy,
    grace: Duration,
}

impl TcpProbe {
    pub fn new(
        backoff: BackoffPolicy,
        grace: Duration,
    ) -> Self {
        Self { backoff, grace }
    }
}

#[async_trait]
impl ReadinessProbe for TcpProbe {
    async fn wait_group(
        &self,
        group: &RoleGroup,
    ) -> Result<()> {
        let start = Instant::now();
        let host = group.host();

        for port in group.ports() {
            let polled =
                task_with_timeout_and_exponential_backoff(|| connect_once(host, port), self.backoff)
                    .await;
            if let Err(e) = polled {
                warn!(group = %group.name(), port, "readiness poll gave up: {}", e);
                return Err(SetupError::NotReady {
                    role: group.name(),
                    port,
                    elapsed: start.elapsed(),
                }
                .into());
            }
            debug!(group = %group.name(), port, "accepting connections");
        }

        self.settle().await
    }

    async fn settle(&self) -> Result<()> {
        if !self.grace.is_zero() {
            tokio::time::sleep(self.grace).await;
        }
        Ok(())
    }
}
