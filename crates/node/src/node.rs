use crate::args::ExecutorNodeConfig;
use eyre::WrapErr;
use opbridge_db::{Database, DatabaseConnectionProvider, DatabaseOperations};
use opbridge_executor::L2Monitor;
use opbridge_migration::{Migrator, MigratorTrait};
use opbridge_monitor::Monitor;
use opbridge_providers::{CometRpcClient, PollingHeightSubscription};
use std::sync::Arc;

/// Runs the bridge executor until it is interrupted or its L2 monitor fails.
pub async fn run(config: ExecutorNodeConfig) -> eyre::Result<()> {
    config.validate().map_err(|err| eyre::eyre!("invalid configuration: {err}"))?;

    // Instantiate the database
    let db = Database::new(&config.database_args.url)
        .await
        .wrap_err("failed to connect to the database")?;
    Migrator::up(db.get_connection(), None).await.wrap_err("failed to run migrations")?;
    if config.database_args.reset {
        db.clear_all().await?;
    }
    let db = Arc::new(db);

    // Instantiate the L2 provider
    let client = Arc::new(CometRpcClient::new_http(config.l2_provider_args.url.clone()));
    let subscription = PollingHeightSubscription::new(
        client.clone(),
        config.l2_provider_args.height_poll_interval(),
    );

    let executor_config = config.executor_config();
    tracing::info!(
        target: "opbridge::node",
        bridge_id = %executor_config.bridge_id,
        submission_interval = executor_config.bridge.submission_interval,
        starting_block_height = executor_config.bridge.starting_block_height,
        l2_url = %config.l2_provider_args.url,
        "Launching bridge executor"
    );

    let hooks = L2Monitor::new(client.clone(), executor_config);
    let (handle, mut task) =
        Monitor::spawn(client, subscription, hooks, db, config.monitor_config());

    tokio::select! {
        res = &mut task => {
            res??;
            tracing::info!(target: "opbridge::node", "L2 monitor exited");
            return Ok(())
        }
        res = tokio::signal::ctrl_c() => {
            res?;
            tracing::info!(target: "opbridge::node", "Received shutdown signal");
        }
    }

    handle.stop();
    task.await??;
    tracing::info!(target: "opbridge::node", "Bridge executor stopped");

    Ok(())
}
