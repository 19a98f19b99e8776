//! Cooperative cancellation for long-running batches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Shared stop flag with an optional wall-clock budget.
///
/// Clones share the same flag, so a token handed to a batch can be
/// cancelled from another thread. The batch only polls it between trials.
#[derive(Debug, Clone)]
pub struct CancelToken {
    /// Shared stop flag
    cancelled: Arc<AtomicBool>,
    /// When the budget started counting
    start_time: Arc<RwLock<Option<Instant>>>,
    /// Budget for the whole batch (None = unlimited)
    time_limit: Option<Duration>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::with_time_limit(None)
    }

    /// Token that also trips once `time_limit` has elapsed since [`start`].
    ///
    /// [`start`]: CancelToken::start
    pub fn with_time_limit(time_limit: Option<Duration>) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            start_time: Arc::new(RwLock::new(None)),
            time_limit,
        }
    }

    /// Start the budget clock and clear any earlier cancellation.
    pub fn start(&self) {
        if let Ok(mut start) = self.start_time.write() {
            *start = Some(Instant::now());
        }
        self.cancelled.store(false, Ordering::SeqCst);
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether the batch should stop. Trips the flag if the budget ran out.
    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return true;
        }

        if self.remaining() == Some(Duration::ZERO) {
            self.cancel();
            return true;
        }

        false
    }

    /// Time since [`start`](CancelToken::start)
    pub fn elapsed(&self) -> Duration {
        self.start_time
            .read()
            .ok()
            .and_then(|start| start.map(|s| s.elapsed()))
            .unwrap_or(Duration::ZERO)
    }

    /// Remaining budget (None if unlimited or not started)
    pub fn remaining(&self) -> Option<Duration> {
        let limit = self.time_limit?;
        let started = self.start_time.read().ok().and_then(|start| *start)?;
        Some(limit.saturating_sub(started.elapsed()))
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "cancel_tests.rs"]
mod cancel_tests;
