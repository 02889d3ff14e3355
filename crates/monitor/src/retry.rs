use std::time::Duration;

/// Tracks the retries of a monitor waiting for the events of a block to be indexed.
///
/// A retry happens once per poll interval, the policy is exhausted once the accumulated waiting
/// time `retries * poll_interval` exceeds the timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    poll_interval: Duration,
    timeout: Duration,
    retries: u32,
}

impl RetryPolicy {
    /// Returns a new [`RetryPolicy`] with no retry recorded.
    pub const fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self { poll_interval, timeout, retries: 0 }
    }

    /// Records a retry. Returns true if the policy is exhausted.
    pub fn record_retry(&mut self) -> bool {
        self.retries = self.retries.saturating_add(1);
        self.elapsed() > self.timeout
    }

    /// Resets the retry counter.
    pub fn reset(&mut self) {
        self.retries = 0;
    }

    /// Returns the number of retries recorded since the last reset.
    pub const fn retries(&self) -> u32 {
        self.retries
    }

    /// Returns the accumulated waiting time.
    pub const fn elapsed(&self) -> Duration {
        self.poll_interval.saturating_mul(self.retries)
    }
}
