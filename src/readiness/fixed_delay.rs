use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::ReadinessProbe;
use crate::Result;
use crate::RoleGroup;

/// Assumes a group is ready after a fixed wait.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ReadinessProbe for FixedDelay {
    async fn wait_group(
        &self,
        group: &RoleGroup,
    ) -> Result<()> {
        debug!(group = %group.name(), "settling for {:?}", self.delay);
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn settle(&self) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}
