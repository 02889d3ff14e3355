//! A generic chain monitor, following a chain block by block and persisting its synced height.

mod error;
pub use error::{BoxedError, MonitorError, MonitorErrorKind};
use error::MonitorResult;

mod handle;
pub use handle::{MonitorCommand, MonitorHandle};

mod hooks;
pub use hooks::MonitorHooks;

mod metrics;
pub use metrics::MonitorMetrics;

mod retry;
pub use retry::RetryPolicy;

mod source;
pub use source::{ChainDataSource, HeightSubscription, WatchHeightSubscription};

#[cfg(any(test, feature = "test-utils"))]
/// Common test helpers
pub mod test_utils;

use opbridge_db::{Database, DatabaseOperations};
use opbridge_primitives::BlockMeta;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

/// The maximum number of blocks fetched in a single block range query.
pub const MAX_BLOCK_RANGE: u64 = 20;

/// The number of blocks between two progress logs.
const LOG_INTERVAL: u64 = 10;

/// The configuration of a [`Monitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// The interval between two polls of the chain, and between two processed blocks.
    pub poll_interval: Duration,
    /// The maximum accumulated time spent waiting for the events of a block to be indexed.
    pub retry_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { poll_interval: Duration::from_secs(5), retry_timeout: Duration::from_secs(30) }
    }
}

/// The state of a [`Monitor`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MonitorState {
    /// The monitor is not running.
    #[default]
    Stopped,
    /// The monitor is loading its state.
    Initializing,
    /// The monitor is following the chain.
    Running,
    /// The monitor stopped on a fatal error.
    Failed,
}

impl MonitorState {
    /// Returns true if the monitor will not make further progress.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Failed)
    }
}

/// The monitor follows a chain from its persisted synced height, calling into its
/// [`MonitorHooks`] for every block and advancing the synced height once a block is fully
/// processed.
#[derive(Debug)]
pub struct Monitor<C, S, H> {
    /// The chain data source.
    chain: C,
    /// The subscription to the latest chain height.
    subscription: S,
    /// The per-block behavior.
    hooks: H,
    /// The database.
    db: Arc<Database>,
    /// The monitor configuration.
    config: MonitorConfig,
    /// The height of the last fully processed block.
    synced_height: u64,
    /// The retry policy for blocks with events not indexed yet.
    retry: RetryPolicy,
    /// The state of the monitor, published to the handles once it starts.
    state: watch::Sender<Option<MonitorState>>,
    /// The receiver for commands from the handles.
    command_rx: mpsc::UnboundedReceiver<MonitorCommand>,
    /// The metrics for the monitor.
    metrics: MonitorMetrics,
}

impl<C, S, H> Monitor<C, S, H>
where
    C: ChainDataSource,
    S: HeightSubscription,
    H: MonitorHooks,
{
    /// Returns a new stopped [`Monitor`] and a [`MonitorHandle`] to control it.
    pub fn new(
        chain: C,
        subscription: S,
        hooks: H,
        db: Arc<Database>,
        config: MonitorConfig,
    ) -> (Self, MonitorHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state, state_rx) = watch::channel(None);
        let monitor = Self {
            chain,
            subscription,
            hooks,
            db,
            config,
            synced_height: 0,
            retry: RetryPolicy::new(config.poll_interval, config.retry_timeout),
            state,
            command_rx,
            metrics: MonitorMetrics::default(),
        };
        (monitor, MonitorHandle::new(command_tx, state_rx))
    }

    /// Spawns a new [`Monitor`] on the runtime. The returned task resolves once the monitor
    /// stopped, with the fatal error if any.
    pub fn spawn(
        chain: C,
        subscription: S,
        hooks: H,
        db: Arc<Database>,
        config: MonitorConfig,
    ) -> (MonitorHandle, JoinHandle<Result<(), MonitorError>>)
    where
        C: 'static,
        S: 'static,
        H: 'static,
    {
        let (monitor, handle) = Self::new(chain, subscription, hooks, db, config);
        (handle, tokio::spawn(monitor.run()))
    }

    /// Returns the name of the monitor.
    pub fn name(&self) -> &str {
        self.hooks.name()
    }

    /// Returns the state of the monitor.
    pub fn state(&self) -> MonitorState {
        self.state.borrow().unwrap_or_default()
    }

    /// Returns the height of the last fully processed block.
    pub const fn synced_height(&self) -> u64 {
        self.synced_height
    }

    /// Starts the monitor and follows the chain until stopped or a fatal error occurs.
    pub async fn run(mut self) -> Result<(), MonitorError> {
        let result = self.start().await;
        match result {
            Ok(()) => {
                self.stop();
                Ok(())
            }
            Err(kind) => {
                let err = MonitorError {
                    monitor: self.name().to_owned(),
                    height: self.synced_height + 1,
                    kind,
                };
                tracing::error!(target: "opbridge::monitor", monitor = %err.monitor, height = err.height, %err, "Monitor failed");
                self.subscription.stop();
                self.set_state(MonitorState::Failed);
                Err(err)
            }
        }
    }

    /// Loads the synced height, starts the hooks and the subscription, then enters the poll
    /// loop.
    async fn start(&mut self) -> MonitorResult<()> {
        self.set_state(MonitorState::Initializing);

        self.synced_height = self.db.get_synced_height(self.hooks.name()).await?;
        self.metrics.synced_height.set(self.synced_height as f64);
        tracing::info!(target: "opbridge::monitor", monitor = self.hooks.name(), synced_height = self.synced_height, "Starting monitor");

        self.hooks.on_start(&self.db).await.map_err(MonitorErrorKind::hook)?;
        self.subscription.initialize().await.map_err(MonitorErrorKind::chain_source)?;
        self.retry.reset();

        self.set_state(MonitorState::Running);
        self.poll_loop().await
    }

    /// Stops the monitor. Stopping an already stopped monitor is a no-op.
    fn stop(&mut self) {
        if self.state() == MonitorState::Stopped {
            return
        }
        tracing::info!(target: "opbridge::monitor", monitor = self.hooks.name(), synced_height = self.synced_height, "Stopping monitor");
        self.subscription.stop();
        self.set_state(MonitorState::Stopped);
    }

    /// The main loop of the monitor.
    async fn poll_loop(&mut self) -> MonitorResult<()> {
        loop {
            while let Ok(command) = self.command_rx.try_recv() {
                self.handle_command(command);
            }
            if !self.is_running() {
                return Ok(())
            }

            match self.subscription.latest_height() {
                Some(latest) if latest > self.synced_height => self.step(latest).await?,
                _ => {
                    tracing::trace!(target: "opbridge::monitor", monitor = self.hooks.name(), synced_height = self.synced_height, "No new height");
                }
            }

            self.sleep().await;
        }
    }

    /// A step of work for the [`Monitor`]: processes the next range of blocks up to `latest`.
    async fn step(&mut self, latest: u64) -> MonitorResult<()> {
        let from = self.synced_height + 1;
        let to = latest.min(self.synced_height + MAX_BLOCK_RANGE);
        let blocks =
            self.chain.block_range(from, to).await.map_err(MonitorErrorKind::chain_source)?;

        for block in blocks {
            if !self.is_running() {
                break
            }

            let expected = self.synced_height + 1;
            if block.height != expected {
                return Err(MonitorErrorKind::HeightMismatch { expected, got: block.height })
            }

            if block.is_empty() {
                self.db.set_synced_height(self.hooks.name(), block.height).await?;
                self.advance(block.height, true);
                continue
            }

            if !self.process_block(&block).await? {
                self.metrics.retries.increment(1);
                let exhausted = self.retry.record_retry();
                tracing::debug!(target: "opbridge::monitor", monitor = self.hooks.name(), height = block.height, retries = self.retry.retries(), "Events not indexed yet");
                if exhausted {
                    return Err(MonitorErrorKind::RetryTimeout { retries: self.retry.retries() })
                }
                break
            }
            self.retry.reset();
            self.advance(block.height, false);

            self.sleep().await;
        }

        Ok(())
    }

    /// Processes a block carrying transactions in a single database transaction. Returns false
    /// if the events of the block are not indexed yet.
    #[tracing::instrument(skip_all, level = "trace", fields(monitor = self.hooks.name(), height = block.height, num_txs = block.num_txs))]
    async fn process_block(&mut self, block: &BlockMeta) -> MonitorResult<bool> {
        let tx = self.db.tx().await?;

        if !self.hooks.handle_events(&tx, block).await.map_err(MonitorErrorKind::hook)? {
            tx.rollback().await?;
            return Ok(false)
        }
        self.hooks.handle_block(&tx, block).await.map_err(MonitorErrorKind::hook)?;
        tx.set_synced_height(self.hooks.name(), block.height).await?;
        tx.commit().await?;

        Ok(true)
    }

    /// Advances the in-memory synced height once it is persisted.
    fn advance(&mut self, height: u64, empty: bool) {
        self.synced_height = height;
        self.metrics.advance(height, empty);
        if height % LOG_INTERVAL == 0 {
            tracing::info!(target: "opbridge::monitor", monitor = self.hooks.name(), height, "Synced");
        }
    }

    /// Waits for one poll interval, handling the commands received in the meantime.
    async fn sleep(&mut self) {
        let sleep = tokio::time::sleep(self.config.poll_interval);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => return,
                Some(command) = self.command_rx.recv() => {
                    self.handle_command(command);
                    if !self.is_running() {
                        return
                    }
                }
            }
        }
    }

    fn handle_command(&mut self, command: MonitorCommand) {
        tracing::debug!(target: "opbridge::monitor", monitor = self.hooks.name(), ?command, "Received command");
        match command {
            MonitorCommand::Stop => self.stop(),
        }
    }

    fn is_running(&self) -> bool {
        self.state() == MonitorState::Running
    }

    fn set_state(&self, state: MonitorState) {
        self.state.send_replace(Some(state));
    }
}
