use metrics::{Counter, Gauge, Histogram};
use metrics_derive::Metrics;

/// The metrics for the [`super::L2Monitor`].
#[derive(Metrics)]
#[metrics(scope = "executor")]
pub struct ExecutorMetrics {
    /// A counter on the withdrawals recorded.
    pub withdrawals: Counter,
    /// A counter on the withdrawals dropped for referencing an unknown coin.
    pub unknown_coin_withdrawals: Counter,
    /// A counter on the token registrations observed.
    pub token_registrations: Counter,
    /// A counter on the outputs created.
    pub outputs: Counter,
    /// A histogram of the number of withdrawals per output.
    pub output_withdrawals: Histogram,
    /// The index of the last output created.
    pub last_output_index: Gauge,
}
