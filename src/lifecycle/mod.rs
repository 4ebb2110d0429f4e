//! Cluster lifecycle: ordered bring-up, schema injection, the test command
//! and unconditional teardown.
//!
//! [`LifecycleController::run`] consumes the controller, so teardown runs
//! exactly once whatever the bring-up body returned.

mod builder;
mod controller;
mod report;
mod state;

pub use builder::*;
pub use controller::*;
pub use report::*;
pub use state::*;
