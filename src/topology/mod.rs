//! Cluster topology: two layers, each a coordinator group and a daemon
//! group of homogeneous processes.
//!
//! Groups are planned up front from configuration and start empty; the
//! lifecycle controller fills them in dependency order. Every spawned
//! [`ProcessHandle`](crate::ProcessHandle) is owned by exactly one
//! [`RoleGroup`] until teardown.

mod cluster_topology;
mod layer;
mod role;
mod role_group;

pub use cluster_topology::*;
pub use layer::*;
pub use role::*;
pub use role_group::*;
