//! The L2 monitor of the bridge executor.
//!
//! The [`L2Monitor`] records the withdrawals initiated on the L2 and the tokens registered on
//! the bridge. Every `submission_interval` blocks it commits the pending withdrawals into a
//! merkle tree and creates the [`Output`] anchoring them, which an L1 submitter later proposes.

mod checkpoint;
pub use checkpoint::CheckpointSchedule;

mod error;
pub use error::ExecutorError;
use error::ExecutorResult;

mod metrics;
pub use metrics::ExecutorMetrics;

use opbridge_db::{Database, DatabaseOperations, DatabaseTransaction};
use opbridge_merkle::WithdrawalStorage;
use opbridge_monitor::{ChainDataSource, MonitorHooks};
use opbridge_primitives::{
    BlockMeta, BridgeConfig, BridgeEvent, Output, TokenRegistered, WithdrawalInitiated,
    WithdrawalTx, BRIDGE_EVENT_CATEGORY,
};

/// The name of the L2 monitor, keying its synced height.
pub const L2_MONITOR_NAME: &str = "executor_l2_monitor";

/// The configuration of the bridge executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// The identifier of the bridge, committed in every withdrawal leaf.
    pub bridge_id: String,
    /// The bridge parameters.
    pub bridge: BridgeConfig,
}

/// The [`MonitorHooks`] of the bridge executor on the L2.
#[derive(Debug)]
pub struct L2Monitor<C> {
    /// The L2 chain data source.
    chain: C,
    /// The executor configuration.
    config: ExecutorConfig,
    /// The checkpoint schedule, loaded when the monitor starts.
    schedule: Option<CheckpointSchedule>,
    /// The metrics for the executor.
    metrics: ExecutorMetrics,
}

impl<C: ChainDataSource> L2Monitor<C> {
    /// Returns a new [`L2Monitor`].
    pub fn new(chain: C, config: ExecutorConfig) -> Self {
        Self { chain, config, schedule: None, metrics: ExecutorMetrics::default() }
    }

    /// Returns the checkpoint schedule, once the monitor started.
    pub const fn schedule(&self) -> Option<&CheckpointSchedule> {
        self.schedule.as_ref()
    }

    /// Recomputes the checkpoint schedule from the bridge configuration and the last committed
    /// checkpoint.
    async fn configure_bridge(&mut self, db: &Database) -> ExecutorResult<()> {
        self.config.bridge.validate()?;
        let last_checkpoint_height = db.last_checkpoint_height().await?;
        let schedule = CheckpointSchedule::new(&self.config.bridge, last_checkpoint_height);

        tracing::info!(
            target: "opbridge::executor",
            ?last_checkpoint_height,
            next_checkpoint_height = schedule.next_checkpoint_height(),
            submission_interval = schedule.submission_interval(),
            "Configured bridge"
        );
        self.schedule = Some(schedule);

        Ok(())
    }

    async fn handle_withdrawal(
        &self,
        tx: &DatabaseTransaction,
        height: u64,
        withdrawal: WithdrawalInitiated,
    ) -> ExecutorResult<()> {
        let Some(coin) = tx.find_coin(withdrawal.metadata).await? else {
            tracing::warn!(target: "opbridge::executor", height, sequence = withdrawal.sequence, metadata = ?withdrawal.metadata, "Coin not found, dropping withdrawal");
            self.metrics.unknown_coin_withdrawals.increment(1);
            return Ok(())
        };

        let output_index = tx.last_output_index().await? + 1;
        let withdrawal = WithdrawalTx {
            sequence: withdrawal.sequence,
            sender: withdrawal.sender,
            receiver: withdrawal.receiver,
            amount: withdrawal.amount,
            bridge_id: self.config.bridge_id.clone(),
            metadata: coin.l1_metadata,
            output_index,
            merkle_root: None,
            merkle_proof: vec![],
        };

        tracing::info!(target: "opbridge::executor", height, sequence = withdrawal.sequence, output_index, "Recorded withdrawal");
        tx.upsert_withdrawal(withdrawal).await?;
        self.metrics.withdrawals.increment(1);

        Ok(())
    }

    async fn handle_token_registered(
        &self,
        tx: &DatabaseTransaction,
        registered: TokenRegistered,
    ) -> ExecutorResult<()> {
        let updated = match registered.l1_metadata {
            Some(metadata) => tx.register_coin_denom(metadata, &registered.l2_denom).await?,
            None => tx.mark_coin_checked(&registered.l2_denom).await?,
        };

        if updated == 0 {
            tracing::debug!(target: "opbridge::executor", l2_denom = %registered.l2_denom, "No coin matches the registered token");
        } else {
            tracing::info!(target: "opbridge::executor", l2_denom = %registered.l2_denom, "Token registered");
            self.metrics.token_registrations.increment(1);
        }

        Ok(())
    }

    /// Commits the pending withdrawals into a new [`Output`] at the block `height`.
    #[tracing::instrument(skip_all, level = "trace", fields(height = height, next_checkpoint_height = schedule.next_checkpoint_height()))]
    async fn commit_output(
        &self,
        tx: &DatabaseTransaction,
        schedule: &CheckpointSchedule,
        height: u64,
    ) -> ExecutorResult<Output> {
        let last_index = tx.last_output_index().await?;
        let block_info =
            self.chain.block_info(height).await.map_err(ExecutorError::chain_source)?;

        let mut withdrawals = tx.pending_withdrawals(last_index).await?;
        let storage = WithdrawalStorage::new(&withdrawals);
        let storage_root = storage.root();

        let num_withdrawals = withdrawals.len();
        for withdrawal in &mut withdrawals {
            withdrawal.merkle_proof = storage.proof(withdrawal)?;
            withdrawal.merkle_root = Some(storage_root);
        }
        for withdrawal in withdrawals {
            tx.upsert_withdrawal(withdrawal).await?;
        }

        let output = Output {
            index: last_index + 1,
            output_root: Output::compute_output_root(
                block_info.state_root,
                storage_root,
                block_info.hash,
            ),
            state_root: block_info.state_root,
            storage_root,
            l2_block_hash: block_info.hash,
            l2_block_height: height,
            timestamp: block_info.timestamp,
            start_height: schedule.start_height(),
            end_height: height,
        };
        tx.upsert_output(output.clone()).await?;

        tracing::info!(
            target: "opbridge::executor",
            index = output.index,
            start_height = output.start_height,
            end_height = output.end_height,
            num_withdrawals,
            storage_root = %output.storage_root,
            output_root = %output.output_root,
            "Created output"
        );
        self.metrics.outputs.increment(1);
        self.metrics.output_withdrawals.record(num_withdrawals as f64);
        self.metrics.last_output_index.set(output.index as f64);

        Ok(output)
    }
}

#[async_trait::async_trait]
impl<C: ChainDataSource> MonitorHooks for L2Monitor<C> {
    type Error = ExecutorError;

    fn name(&self) -> &str {
        L2_MONITOR_NAME
    }

    async fn on_start(&mut self, db: &Database) -> Result<(), Self::Error> {
        self.configure_bridge(db).await
    }

    async fn handle_events(
        &mut self,
        tx: &DatabaseTransaction,
        block: &BlockMeta,
    ) -> Result<bool, Self::Error> {
        let Some(events) = self
            .chain
            .events(block.height, BRIDGE_EVENT_CATEGORY)
            .await
            .map_err(ExecutorError::chain_source)?
        else {
            return Ok(false)
        };

        for event in &events {
            match BridgeEvent::try_from(event)? {
                BridgeEvent::WithdrawalInitiated(withdrawal) => {
                    self.handle_withdrawal(tx, block.height, withdrawal).await?
                }
                BridgeEvent::TokenRegistered(registered) => {
                    self.handle_token_registered(tx, registered).await?
                }
                BridgeEvent::Unknown(type_tag) => {
                    tracing::trace!(target: "opbridge::executor", height = block.height, %type_tag, "Ignoring event");
                }
            }
        }

        Ok(true)
    }

    async fn handle_block(
        &mut self,
        tx: &DatabaseTransaction,
        block: &BlockMeta,
    ) -> Result<(), Self::Error> {
        let schedule = self.schedule.ok_or(ExecutorError::NotStarted)?;
        if !schedule.is_boundary(block.height) {
            return Ok(())
        }

        self.commit_output(tx, &schedule, block.height).await?;
        if let Some(schedule) = self.schedule.as_mut() {
            schedule.advance();
        }

        Ok(())
    }
}
