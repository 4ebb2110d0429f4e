//! the test_utils folder here will share utils or test components between
//! unit tests of different modules
mod common;
mod fake_cluster;

pub use common::*;
pub use fake_cluster::*;
