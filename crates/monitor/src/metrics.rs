use metrics::{Counter, Gauge};
use metrics_derive::Metrics;

/// The metrics for the [`super::Monitor`].
#[derive(Metrics)]
#[metrics(scope = "monitor")]
pub struct MonitorMetrics {
    /// A counter on the blocks processed through the hooks.
    pub processed_blocks: Counter,
    /// A counter on the blocks skipped for carrying no transaction.
    pub empty_blocks: Counter,
    /// A counter on the retries for events not yet indexed.
    pub retries: Counter,
    /// The synced height of the monitor.
    pub synced_height: Gauge,
}

impl MonitorMetrics {
    /// Records the advance of the synced height, for an empty block or not.
    pub fn advance(&self, height: u64, empty: bool) {
        if empty {
            self.empty_blocks.increment(1);
        } else {
            self.processed_blocks.increment(1);
        }
        self.synced_height.set(height as f64);
    }
}
