use crate::constants;
use opbridge_executor::ExecutorConfig;
use opbridge_monitor::MonitorConfig;
use opbridge_primitives::BridgeConfig;
use std::time::Duration;

/// The arguments of the bridge executor node.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "opbridge-executor", about = "Commits L2 withdrawals into outputs for the L1")]
pub struct ExecutorNodeConfig {
    /// Database args
    #[command(flatten)]
    pub database_args: DatabaseArgs,
    /// The L2 provider arguments
    #[command(flatten)]
    pub l2_provider_args: L2ProviderArgs,
    /// The bridge arguments
    #[command(flatten)]
    pub bridge_args: BridgeArgs,
    /// The monitor arguments
    #[command(flatten)]
    pub monitor_args: MonitorArgs,
}

impl ExecutorNodeConfig {
    /// Validate that the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        self.bridge_args.bridge_config().validate().map_err(|err| err.to_string())?;

        if self.bridge_args.bridge_id.is_empty() {
            return Err("Bridge id must not be empty".to_string());
        }

        if self.monitor_args.poll_interval_ms == 0 {
            return Err("Monitor poll interval must be greater than zero".to_string());
        }

        if self.l2_provider_args.height_poll_interval_ms == 0 {
            return Err("L2 height poll interval must be greater than zero".to_string());
        }

        Ok(())
    }

    /// Returns the [`ExecutorConfig`] of the node.
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            bridge_id: self.bridge_args.bridge_id.clone(),
            bridge: self.bridge_args.bridge_config(),
        }
    }

    /// Returns the [`MonitorConfig`] of the node.
    pub const fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            poll_interval: Duration::from_millis(self.monitor_args.poll_interval_ms),
            retry_timeout: Duration::from_millis(self.monitor_args.retry_timeout_ms),
        }
    }
}

/// The database arguments.
#[derive(Debug, Clone, clap::Args)]
pub struct DatabaseArgs {
    /// The database URL.
    #[arg(
        long = "db.url",
        id = "db_url",
        value_name = "DB_URL",
        env = "OPBRIDGE_DB_URL",
        default_value = constants::DEFAULT_DATABASE_URL
    )]
    pub url: String,
    /// Whether to clear the database before starting.
    #[arg(long = "db.reset", id = "db_reset")]
    pub reset: bool,
}

/// The L2 provider arguments.
#[derive(Debug, Clone, clap::Args)]
pub struct L2ProviderArgs {
    /// The URL for the L2 CometBFT RPC.
    #[arg(long = "l2.url", id = "l2_url", value_name = "L2_URL", env = "OPBRIDGE_L2_RPC_URL")]
    pub url: reqwest::Url,
    /// The interval between two refreshes of the latest L2 height, in milliseconds.
    #[arg(long = "l2.height-poll-interval-ms", id = "l2_height_poll_interval_ms", value_name = "MILLISECONDS", default_value_t = constants::DEFAULT_HEIGHT_POLL_INTERVAL_MS)]
    pub height_poll_interval_ms: u64,
}

impl L2ProviderArgs {
    /// Returns the interval between two refreshes of the latest L2 height.
    pub const fn height_poll_interval(&self) -> Duration {
        Duration::from_millis(self.height_poll_interval_ms)
    }
}

/// The bridge arguments.
#[derive(Debug, Clone, clap::Args)]
pub struct BridgeArgs {
    /// The bridge identifier.
    #[arg(long = "bridge.id", id = "bridge_id", value_name = "BRIDGE_ID", env = "OPBRIDGE_BRIDGE_ID")]
    pub bridge_id: String,
    /// The number of L2 blocks between two outputs.
    #[arg(long = "bridge.submission-interval", id = "bridge_submission_interval", value_name = "BLOCKS", env = "OPBRIDGE_SUBMISSION_INTERVAL")]
    pub submission_interval: u64,
    /// The time after which a proposed output is final on L1, in seconds.
    #[arg(long = "bridge.finalized-time", id = "bridge_finalized_time", value_name = "SECONDS", default_value_t = 0)]
    pub finalized_time: u64,
    /// The L2 height of the first checkpoint.
    #[arg(long = "bridge.starting-block-height", id = "bridge_starting_block_height", value_name = "HEIGHT", default_value_t = constants::DEFAULT_STARTING_BLOCK_HEIGHT)]
    pub starting_block_height: u64,
}

impl BridgeArgs {
    /// Returns the [`BridgeConfig`] from the arguments.
    pub const fn bridge_config(&self) -> BridgeConfig {
        BridgeConfig {
            submission_interval: self.submission_interval,
            finalized_time: self.finalized_time,
            starting_block_height: self.starting_block_height,
        }
    }
}

/// The monitor arguments.
#[derive(Debug, Clone, clap::Args)]
pub struct MonitorArgs {
    /// The interval between two polls of the L2, in milliseconds.
    #[arg(long = "monitor.poll-interval-ms", id = "monitor_poll_interval_ms", value_name = "MILLISECONDS", default_value_t = constants::DEFAULT_MONITOR_POLL_INTERVAL_MS)]
    pub poll_interval_ms: u64,
    /// The maximum time to wait for the events of a block to be indexed, in milliseconds.
    #[arg(long = "monitor.retry-timeout-ms", id = "monitor_retry_timeout_ms", value_name = "MILLISECONDS", default_value_t = constants::DEFAULT_MONITOR_RETRY_TIMEOUT_MS)]
    pub retry_timeout_ms: u64,
}
