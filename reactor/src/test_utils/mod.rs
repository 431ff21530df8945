//! Test utilities
//!
//! Manual mock implementations of the ports and payload fixtures. Mocks
//! record calls and pauses instead of touching the network or the clock.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
