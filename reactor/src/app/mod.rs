//! Application layer
//!
//! The run pipeline: enumerate sources, match messages, reconcile reactions.
//! Services are generic over the Discord and pacing ports.

pub mod enumerator;
pub mod matcher;
pub mod reactor_service;
pub mod reconciler;

pub use reactor_service::ReactorService;
