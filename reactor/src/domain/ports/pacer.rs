//! Pacing port
//!
//! All waiting goes through here so tests can record durations instead of
//! sleeping.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::entities::DelayBounds;

#[async_trait]
pub trait Pacer: Send + Sync {
    /// Suspend the run for exactly `duration`
    async fn pause(&self, duration: Duration);

    /// A uniformly random duration within `bounds`
    fn jitter(&self, bounds: DelayBounds) -> Duration;
}
