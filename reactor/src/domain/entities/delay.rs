//! Pacing bounds

use std::time::Duration;

pub const DEFAULT_DELAY_MIN: f64 = 1.0;
pub const DEFAULT_DELAY_MAX: f64 = 2.0;

/// Inclusive `[min, max]` interval in seconds for the random pause between
/// reaction attempts. Always finite, non-negative and ordered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayBounds {
    min: f64,
    max: f64,
}

impl DelayBounds {
    /// Returns `None` for negative or non-finite values. Reversed bounds are
    /// swapped.
    pub fn new(min: f64, max: f64) -> Option<Self> {
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max < 0.0 {
            return None;
        }
        Some(Self {
            min: min.min(max),
            max: min.max(max),
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    #[cfg(test)]
    pub fn contains(&self, duration: Duration) -> bool {
        let secs = duration.as_secs_f64();
        // Allow for float rounding through Duration
        secs >= self.min - 1e-6 && secs <= self.max + 1e-6
    }
}

impl Default for DelayBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_DELAY_MIN,
            max: DEFAULT_DELAY_MAX,
        }
    }
}

/// Seconds as a Duration, clamping negative or NaN input to zero
pub fn seconds(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or_default()
}
