//! Default values of the executor node arguments.

/// The default database URL.
pub(crate) const DEFAULT_DATABASE_URL: &str = "sqlite://opbridge.db?mode=rwc";

/// The default interval between two refreshes of the latest L2 height, in milliseconds.
pub(crate) const DEFAULT_HEIGHT_POLL_INTERVAL_MS: u64 = 1_000;

/// The default interval between two polls of the monitor, in milliseconds.
pub(crate) const DEFAULT_MONITOR_POLL_INTERVAL_MS: u64 = 5_000;

/// The default timeout for blocks whose events are not indexed, in milliseconds.
pub(crate) const DEFAULT_MONITOR_RETRY_TIMEOUT_MS: u64 = 30_000;

/// The default L2 height of the first checkpoint.
pub(crate) const DEFAULT_STARTING_BLOCK_HEIGHT: u64 = 1;
