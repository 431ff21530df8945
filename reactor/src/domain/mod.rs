//! Domain layer
//!
//! Entities and the port traits the application layer depends on.

pub mod entities;
pub mod ports;
