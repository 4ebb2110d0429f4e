use std::fmt;

/// Controller states in the order a successful run visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    ServiceStarting,
    ServiceSettled,
    OverlayStarting,
    OverlaySettled,
    SchemaInjected,
    Running,
    TearingDown,
    Done,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Idle => "idle",
            LifecycleState::ServiceStarting => "service_starting",
            LifecycleState::ServiceSettled => "service_settled",
            LifecycleState::OverlayStarting => "overlay_starting",
            LifecycleState::OverlaySettled => "overlay_settled",
            LifecycleState::SchemaInjected => "schema_injected",
            LifecycleState::Running => "running",
            LifecycleState::TearingDown => "tearing_down",
            LifecycleState::Done => "done",
        }
    }

    /// Bring-up moves strictly forward; any state before teardown may jump
    /// to `TearingDown`, which only leads to `Done`.
    pub fn can_transition_to(
        &self,
        next: LifecycleState,
    ) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Idle, ServiceStarting)
                | (ServiceStarting, ServiceSettled)
                | (ServiceSettled, OverlayStarting)
                | (OverlayStarting, OverlaySettled)
                | (OverlaySettled, SchemaInjected)
                | (SchemaInjected, Running)
                | (TearingDown, Done)
        ) || (next == TearingDown && !self.is_tearing_down_or_done())
    }

    pub fn is_tearing_down_or_done(&self) -> bool {
        matches!(self, LifecycleState::TearingDown | LifecycleState::Done)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
