use opbridge_db::{Database, DatabaseTransaction};
use opbridge_primitives::BlockMeta;

/// The per-block behavior of a [`crate::Monitor`].
///
/// The monitor drives the synchronization loop and calls into the hooks for every block
/// carrying transactions. All writes of a block must go through the provided transaction, which
/// the monitor commits together with the synced height.
#[async_trait::async_trait]
pub trait MonitorHooks: Send + Sync {
    /// The error type for the hooks.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The name of the monitor, used as the key of its synced height.
    fn name(&self) -> &str;

    /// Called once each time the monitor starts, before the first block is processed.
    async fn on_start(&mut self, db: &Database) -> Result<(), Self::Error>;

    /// Handles the events of the block. Returns false if the events of the block are not
    /// indexed yet, in which case the transaction is rolled back and the block retried later.
    async fn handle_events(
        &mut self,
        tx: &DatabaseTransaction,
        block: &BlockMeta,
    ) -> Result<bool, Self::Error>;

    /// Handles the block once its events were processed, before the synced height advances.
    async fn handle_block(
        &mut self,
        tx: &DatabaseTransaction,
        block: &BlockMeta,
    ) -> Result<(), Self::Error>;
}
