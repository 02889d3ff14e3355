use opbridge_db::DatabaseError;

/// A boxed error returned by the chain data source, the height subscription or the hooks of a
/// monitor.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A [`Result`] that uses [`MonitorErrorKind`] as the error type.
pub(crate) type MonitorResult<T> = Result<T, MonitorErrorKind>;

/// A fatal error of a monitor, carrying the identity of the monitor and the height it failed
/// at.
#[derive(Debug, thiserror::Error)]
#[error("monitor {monitor} failed at height {height}: {kind}")]
pub struct MonitorError {
    /// The name of the failed monitor.
    pub monitor: String,
    /// The height the monitor was processing.
    pub height: u64,
    /// The cause of the failure.
    #[source]
    pub kind: MonitorErrorKind,
}

/// The cause of a [`MonitorError`].
#[derive(Debug, thiserror::Error)]
pub enum MonitorErrorKind {
    /// The chain data source returned a block that does not follow the synced height.
    #[error("block height mismatch: expected {expected}, got {got}")]
    HeightMismatch {
        /// The expected height.
        expected: u64,
        /// The received height.
        got: u64,
    },
    /// The events of a block were still not indexed once the retry timeout elapsed.
    #[error("events not indexed after {retries} retries")]
    RetryTimeout {
        /// The number of retries performed.
        retries: u32,
    },
    /// An error of the chain data source or the height subscription.
    #[error("chain data source error: {0}")]
    ChainSource(#[source] BoxedError),
    /// An error returned by the monitor hooks.
    #[error("hook error: {0}")]
    Hook(#[source] BoxedError),
    /// A database error.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl MonitorErrorKind {
    /// Returns a [`MonitorErrorKind::ChainSource`] from the provided error.
    pub(crate) fn chain_source(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::ChainSource(Box::new(err))
    }

    /// Returns a [`MonitorErrorKind::Hook`] from the provided error.
    pub(crate) fn hook(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Hook(Box::new(err))
    }
}
