//! Progress logging for long record loops.
//!
//! A [`ProgressTracker`] counts processed items and logs a line every time the count
//! crosses a multiple of its interval.

use log::info;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts items and logs progress at regular intervals.
///
/// # Example
/// ```
/// use seedgrow_lib::progress::ProgressTracker;
///
/// let tracker = ProgressTracker::new("Scanned reads").with_interval(100);
/// for _ in 0..250 {
///     tracker.log_if_needed(1); // logs at 100 and 200
/// }
/// tracker.log_final(); // logs "Scanned reads 250 (complete)"
/// ```
pub struct ProgressTracker {
    interval: u64,
    message: String,
    count: AtomicU64,
}

impl ProgressTracker {
    /// Creates a tracker logging `message` every 10,000 items.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: 10_000, message: message.into(), count: AtomicU64::new(0) }
    }

    /// Sets the number of items between log lines.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Adds `additional` items and logs once per interval boundary crossed.
    ///
    /// Returns `true` if the count now sits exactly on an interval boundary.
    pub fn log_if_needed(&self, additional: u64) -> bool {
        let previous = self.count.fetch_add(additional, Ordering::Relaxed);
        let current = previous + additional;

        for milestone in (previous / self.interval + 1)..=(current / self.interval) {
            info!("{} {}", self.message, milestone * self.interval);
        }

        current > 0 && current.is_multiple_of(self.interval)
    }

    /// Logs the final count unless the last [`log_if_needed`](Self::log_if_needed) already did.
    pub fn log_final(&self) {
        let count = self.count();
        if count > 0 && !count.is_multiple_of(self.interval) {
            info!("{} {} (complete)", self.message, count);
        }
    }

    /// Items counted so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}
