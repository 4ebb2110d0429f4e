//! Administrative access to the service layer's coordinator.
//!
//! The only operation the runner needs is registering the space the overlay
//! layer stores its metadata in. It goes through [`AdminClient`] so the
//! lifecycle controller can be exercised without a live coordinator.

mod admin_client;
mod schema;

pub use admin_client::*;
pub use schema::*;

#[cfg(test)]
mod schema_test;
