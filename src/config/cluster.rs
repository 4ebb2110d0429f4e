use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::LOOPBACK_HOST;
use crate::Error;
use crate::Result;

/// Both cluster layers plus the address every process binds to.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClusterConfig {
    /// Listen/connect host for every process (loopback only)
    #[serde(default = "default_host")]
    pub host: String,

    /// Foundational metadata/coordination layer
    #[serde(default = "default_service_layer")]
    pub service: LayerConfig,

    /// Storage overlay that stores its metadata in the service layer
    #[serde(default = "default_overlay_layer")]
    pub overlay: LayerConfig,
}

/// One cluster layer: a coordinator group and a daemon group run from the
/// same program.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LayerConfig {
    /// Layer name, used for directory names and template tokens
    pub name: String,

    /// Executable providing the `coordinator` and `daemon` subcommands
    pub program: String,

    /// Number of coordinator instances (at least one)
    #[serde(default = "default_count")]
    pub coordinators: usize,

    /// Number of daemon instances
    #[serde(default = "default_count")]
    pub daemons: usize,

    /// Coordinator instance i listens on `coordinator_port + i`
    pub coordinator_port: u16,

    /// Daemon instance i listens on `daemon_port + i`
    pub daemon_port: u16,

    /// Value of the daemon `-t` flag
    #[serde(default = "default_daemon_threads")]
    pub daemon_threads: u32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            service: default_service_layer(),
            overlay: default_overlay_layer(),
        }
    }
}

impl ClusterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(invalid("cluster.host cannot be empty".into()));
        }
        if self.service.name == self.overlay.name {
            return Err(invalid(format!(
                "service and overlay layers share the name {}",
                self.service.name
            )));
        }
        self.service.validate("service")?;
        self.overlay.validate("overlay")?;

        // Every port of every group must be distinct across both layers
        let mut ranges: Vec<_> = [
            self.service.coordinator_ports(),
            self.service.daemon_ports(),
            self.overlay.coordinator_ports(),
            self.overlay.daemon_ports(),
        ]
        .into_iter()
        .filter(|r| !r.is_empty())
        .collect();
        ranges.sort_by_key(|r| r.start);
        for pair in ranges.windows(2) {
            if pair[0].end > pair[1].start {
                return Err(invalid(format!(
                    "port ranges {:?} and {:?} overlap",
                    pair[0], pair[1]
                )));
            }
        }
        Ok(())
    }
}

impl LayerConfig {
    fn validate(
        &self,
        section: &str,
    ) -> Result<()> {
        let identifier = self.name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if self.name.is_empty() || !identifier {
            return Err(invalid(format!(
                "cluster.{section}.name must be a non-empty alphanumeric identifier, got {:?}",
                self.name
            )));
        }
        if self.program.is_empty() {
            return Err(invalid(format!("cluster.{section}.program cannot be empty")));
        }
        if self.coordinators == 0 {
            return Err(invalid(format!(
                "cluster.{section}.coordinators must be at least 1 (instance 0 bootstraps the layer)"
            )));
        }
        if self.coordinator_port == 0 || self.daemon_port == 0 {
            return Err(invalid(format!("cluster.{section} ports must be non-zero")));
        }
        let limit = u16::MAX as u32 + 1;
        if self.coordinator_ports().end > limit || self.daemon_ports().end > limit {
            return Err(invalid(format!("cluster.{section} port range exceeds 65535")));
        }
        if self.daemon_threads == 0 {
            return Err(invalid(format!("cluster.{section}.daemon_threads must be positive")));
        }
        Ok(())
    }

    pub fn coordinator_ports(&self) -> std::ops::Range<u32> {
        port_range(self.coordinator_port, self.coordinators)
    }

    pub fn daemon_ports(&self) -> std::ops::Range<u32> {
        port_range(self.daemon_port, self.daemons)
    }
}

/// Saturates instead of wrapping, so an oversized count always ends past
/// the last valid port.
fn port_range(
    start: u16,
    count: usize,
) -> std::ops::Range<u32> {
    let start = u32::from(start);
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    start..start.saturating_add(count)
}

fn invalid(msg: String) -> Error {
    Error::Config(ConfigError::Message(msg))
}

fn default_host() -> String {
    LOOPBACK_HOST.to_string()
}
fn default_count() -> usize {
    1
}
fn default_daemon_threads() -> u32 {
    1
}
fn default_service_layer() -> LayerConfig {
    LayerConfig {
        name: "hyperdex".to_string(),
        program: "hyperdex".to_string(),
        coordinators: 1,
        daemons: 1,
        coordinator_port: 1982,
        daemon_port: 2012,
        daemon_threads: 1,
    }
}
fn default_overlay_layer() -> LayerConfig {
    LayerConfig {
        name: "wtf".to_string(),
        program: "wtf".to_string(),
        coordinators: 1,
        daemons: 1,
        coordinator_port: 2982,
        daemon_port: 3012,
        daemon_threads: 1,
    }
}
