use std::fmt;

/// Role of every process in a [`RoleGroup`](super::RoleGroup).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Instance 0 bootstraps the layer; the others join it
    Coordinator,
    /// Registers with the layer coordinator's bootstrap instance
    Daemon {
        coordinator_port: u16,
        threads: u32,
    },
}

impl Role {
    /// Subcommand passed to the layer program
    pub fn subcommand(&self) -> &'static str {
        match self {
            Role::Coordinator => "coordinator",
            Role::Daemon { .. } => "daemon",
        }
    }

    /// Short tag used in working directory names
    pub fn dir_tag(&self) -> &'static str {
        match self {
            Role::Coordinator => "coord",
            Role::Daemon { .. } => "daemon",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.subcommand())
    }
}
