//! Rate shaping and cancellation.
//!
//! The randomized delays between page interactions are a deliberate policy
//! for driving a shared rendering surface that watches for fixed-rate
//! clients; they are part of the sweep's contract, not a tuning knob.

use crate::error::{Result, SweepError};
use rand::{rng, Rng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// One injectable source of randomized delays, shared by every call site
/// that touches the page.
#[derive(Debug, Clone)]
pub struct Pacing {
    min: Duration,
    max: Duration,
}

impl Pacing {
    pub fn new(min: Duration, max: Duration) -> Self {
        let max = max.max(min);
        Self { min, max }
    }

    /// Zero-delay pacing for tests.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Sleep for a uniformly random duration within the configured bounds.
    pub fn pause(&self) {
        if self.max.is_zero() {
            return;
        }
        let ms = rng().random_range(self.min.as_millis() as u64..=self.max.as_millis() as u64);
        thread::sleep(Duration::from_millis(ms));
    }
}

/// Pixel offset applied above the load-more button before clicking, so the
/// viewport never lands on it at an exact repeatable position.
pub fn click_offset_px() -> i64 {
    rng().random_range(20..=50)
}

/// Cooperative cancellation flag checked between buckets, between scroll
/// steps, and on every iteration of the unbounded retry loops.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(SweepError::Cancelled)
        } else {
            Ok(())
        }
    }
}
