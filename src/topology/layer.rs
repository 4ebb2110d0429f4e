use super::Role;
use super::RoleGroup;
use crate::LayerConfig;

/// One cluster layer: its coordinators and the daemons registered with them.
#[derive(Debug)]
pub struct ClusterLayer {
    name: String,
    pub coordinators: RoleGroup,
    pub daemons: RoleGroup,
}

impl ClusterLayer {
    pub fn from_config(
        host: &str,
        config: &LayerConfig,
    ) -> Self {
        let coordinators = RoleGroup::new(
            &config.name,
            &config.program,
            host,
            Role::Coordinator,
            config.coordinators,
            config.coordinator_port,
        );
        let daemons = RoleGroup::new(
            &config.name,
            &config.program,
            host,
            Role::Daemon {
                coordinator_port: config.coordinator_port,
                threads: config.daemon_threads,
            },
            config.daemons,
            config.daemon_port,
        );
        Self {
            name: config.name.clone(),
            coordinators,
            daemons,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Address clients use to reach the layer: the bootstrap coordinator.
    pub fn coordinator_endpoint(&self) -> (&str, u16) {
        (self.coordinators.host(), self.coordinators.base_port())
    }

    pub fn process_count(&self) -> usize {
        self.coordinators.processes().len() + self.daemons.processes().len()
    }
}
