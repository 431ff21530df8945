//! Real-time pacer backed by tokio timers and the thread-local RNG

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::domain::entities::{seconds, DelayBounds};
use crate::domain::ports::Pacer;

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }

    fn jitter(&self, bounds: DelayBounds) -> Duration {
        let secs = if bounds.min() < bounds.max() {
            rand::thread_rng().gen_range(bounds.min()..=bounds.max())
        } else {
            bounds.min()
        };
        seconds(secs)
    }
}
