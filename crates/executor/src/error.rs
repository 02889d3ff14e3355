use opbridge_db::DatabaseError;
use opbridge_merkle::MerkleError;
use opbridge_monitor::BoxedError;
use opbridge_primitives::{ConfigError, EventDecodeError};

/// A [`Result`] that uses [`ExecutorError`] as the error type.
pub(crate) type ExecutorResult<T> = Result<T, ExecutorError>;

/// An error that occurred in the bridge executor.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// An error of the L2 chain data source.
    #[error("l2 chain data source error: {0}")]
    ChainSource(#[source] BoxedError),
    /// A database error.
    #[error(transparent)]
    Database(#[from] DatabaseError),
    /// A recognized bridge event could not be decoded.
    #[error("failed to decode bridge event: {0}")]
    EventDecode(#[from] EventDecodeError),
    /// A withdrawal proof could not be built.
    #[error(transparent)]
    Merkle(#[from] MerkleError),
    /// The bridge configuration is invalid.
    #[error("invalid bridge configuration: {0}")]
    Config(#[from] ConfigError),
    /// A block was handled before the checkpoint schedule was loaded.
    #[error("checkpoint schedule not initialized")]
    NotStarted,
}

impl ExecutorError {
    /// Returns an [`ExecutorError::ChainSource`] from the provided error.
    pub(crate) fn chain_source(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::ChainSource(Box::new(err))
    }
}
