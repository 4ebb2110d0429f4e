//! Test-harness orchestrator for a local HyperDex + WTF cluster.
//!
//! A run brings the service layer (HyperDex) and the overlay layer (WTF) up
//! in dependency order, registers the WTF metadata space, runs a test
//! command against the cluster and tears everything down again, reporting
//! crashes along the way.

mod admin;
mod cli;
mod config;
mod errors;
mod lifecycle;
mod process;
mod readiness;
mod template;
mod topology;

pub mod constants;
pub mod harness;
pub(crate) mod utils;

pub use admin::*;
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use lifecycle::*;
pub use process::*;
pub use readiness::*;
pub use template::*;
pub use topology::*;

#[cfg(test)]
mod cli_test;
#[cfg(test)]
mod template_test;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
