use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use super::ClusterLayer;
use super::RoleGroup;
use crate::constants::WORKSPACE_PREFIX;
use crate::Bindings;
use crate::HarnessConfig;
use crate::Result;
use crate::SetupError;

/// The service layer, the overlay layer that depends on it, and the
/// workspace their processes run in.
#[derive(Debug)]
pub struct ClusterTopology {
    service: ClusterLayer,
    overlay: ClusterLayer,
    configured_root: Option<PathBuf>,
    workspace: Option<PathBuf>,
    clean: bool,
    log_output: bool,
}

impl ClusterTopology {
    pub fn from_config(config: &HarnessConfig) -> Self {
        let host = &config.cluster.host;
        Self {
            service: ClusterLayer::from_config(host, &config.cluster.service),
            overlay: ClusterLayer::from_config(host, &config.cluster.overlay),
            configured_root: config.workspace.root.clone(),
            workspace: None,
            clean: config.workspace.clean,
            log_output: config.workspace.log_output,
        }
    }

    /// Creates the workspace root on first use: the configured directory, or
    /// a fresh `wtf-test-*` directory under the system temp dir.
    pub fn prepare_workspace(&mut self) -> Result<PathBuf> {
        if let Some(root) = &self.workspace {
            return Ok(root.clone());
        }

        let root = match &self.configured_root {
            Some(root) => {
                std::fs::create_dir_all(root).map_err(|source| SetupError::Workspace {
                    path: root.clone(),
                    source,
                })?;
                root.clone()
            }
            None => tempfile::Builder::new()
                .prefix(WORKSPACE_PREFIX)
                .tempdir()
                .map_err(|source| SetupError::Workspace {
                    path: std::env::temp_dir(),
                    source,
                })?
                .keep(),
        };

        debug!(workspace = %root.display(), "workspace ready");
        self.workspace = Some(root.clone());
        Ok(root)
    }

    /// Workspace root, once created.
    pub fn workspace(&self) -> Option<&Path> {
        self.workspace.as_deref()
    }

    pub fn service(&self) -> &ClusterLayer {
        &self.service
    }

    pub fn overlay(&self) -> &ClusterLayer {
        &self.overlay
    }

    pub fn service_mut(&mut self) -> &mut ClusterLayer {
        &mut self.service
    }

    pub fn overlay_mut(&mut self) -> &mut ClusterLayer {
        &mut self.overlay
    }

    pub fn layers(&self) -> [&ClusterLayer; 2] {
        [&self.service, &self.overlay]
    }

    /// All four groups in bring-up order.
    pub fn groups(&self) -> [&RoleGroup; 4] {
        [
            &self.service.coordinators,
            &self.service.daemons,
            &self.overlay.coordinators,
            &self.overlay.daemons,
        ]
    }

    pub fn groups_mut(&mut self) -> [&mut RoleGroup; 4] {
        [
            &mut self.service.coordinators,
            &mut self.service.daemons,
            &mut self.overlay.coordinators,
            &mut self.overlay.daemons,
        ]
    }

    /// Processes spawned so far across both layers.
    pub fn process_count(&self) -> usize {
        self.service.process_count() + self.overlay.process_count()
    }

    /// `{<LAYER>_HOST}` / `{<LAYER>_PORT}` for each layer's bootstrap
    /// coordinator.
    pub fn template_bindings(&self) -> Bindings {
        let mut bindings = Bindings::default();
        for layer in self.layers() {
            let (host, port) = layer.coordinator_endpoint();
            bindings.bind_endpoint(layer.name(), host, port);
        }
        bindings
    }

    pub fn clean(&self) -> bool {
        self.clean
    }

    pub fn log_output(&self) -> bool {
        self.log_output
    }

    /// Keep the workspace whatever `clean` was configured to.
    pub fn retain_workspace(&mut self) {
        self.clean = false;
    }

    pub fn force_log_output(&mut self) {
        self.log_output = true;
    }
}
