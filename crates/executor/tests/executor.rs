//! Integration tests of the bridge executor on a mock L2.

use alloy_primitives::{address, b256, Address, B256};
use arbitrary::{Arbitrary, Unstructured};
use opbridge_db::{test_utils::setup_test_db, Database, DatabaseOperations};
use opbridge_executor::{ExecutorConfig, ExecutorError, L2Monitor, L2_MONITOR_NAME};
use opbridge_merkle::{verify_withdrawal, EMPTY_ROOT};
use opbridge_monitor::{
    test_utils::MockChain, Monitor, MonitorConfig, MonitorErrorKind, MonitorHooks, MonitorState,
    WatchHeightSubscription,
};
use opbridge_primitives::{
    BlockMeta, BridgeConfig, ChainEvent, Coin, EventDecodeError, Output, WithdrawalTx,
    MAX_WITHDRAWAL_SEQUENCE, TOKEN_BRIDGE_INITIATED_EVENT_TAG, TOKEN_REGISTERED_EVENT_TAG,
};
use rand::Rng;
use std::{sync::Arc, time::Duration};

const SENDER: Address = address!("0x1111111111111111111111111111111111111111");
const RECEIVER: Address = address!("0x2222222222222222222222222222222222222222");
const USDC: B256 = b256!("0x00000000000000000000000000000000000000000000000000000000000000aa");
const UNKNOWN: B256 = b256!("0x00000000000000000000000000000000000000000000000000000000000000bb");

fn config(submission_interval: u64) -> ExecutorConfig {
    ExecutorConfig {
        bridge_id: "1".to_owned(),
        bridge: BridgeConfig { submission_interval, finalized_time: 60, starting_block_height: 1 },
    }
}

fn withdrawal_event(sequence: u64, amount: u64, metadata: B256) -> ChainEvent {
    withdrawal_event_from(sequence, SENDER, RECEIVER, amount, metadata)
}

fn withdrawal_event_from(
    sequence: u64,
    from: Address,
    to: Address,
    amount: u64,
    metadata: B256,
) -> ChainEvent {
    ChainEvent::new(
        TOKEN_BRIDGE_INITIATED_EVENT_TAG,
        [
            ("l2_sequence", sequence.to_string()),
            ("from", from.to_string()),
            ("to", to.to_string()),
            ("amount", amount.to_string()),
            ("metadata", metadata.to_string()),
        ],
    )
}

fn fast_config() -> MonitorConfig {
    MonitorConfig { poll_interval: Duration::from_millis(1), retry_timeout: Duration::from_secs(1) }
}

async fn setup() -> eyre::Result<Arc<Database>> {
    let db = Arc::new(setup_test_db().await);
    db.upsert_coin(Coin::new(USDC, Some("l2/usdc".to_owned()))).await?;
    Ok(db)
}

/// Runs the executor over the mock chain up to `height`, then stops it.
async fn run_until(
    db: &Arc<Database>,
    chain: &Arc<MockChain>,
    config: ExecutorConfig,
    height: u64,
) -> eyre::Result<()> {
    let (height_tx, subscription) = WatchHeightSubscription::channel();
    height_tx.send_replace(Some(height));

    let hooks = L2Monitor::new(chain.clone(), config);
    let (handle, task) =
        Monitor::spawn(chain.clone(), subscription, hooks, db.clone(), fast_config());

    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let synced =
                db.get_sync_state(L2_MONITOR_NAME).await.unwrap().map(|state| state.height);
            if synced >= Some(height) || task.is_finished() {
                break
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await?;
    handle.stop();
    task.await??;

    Ok(())
}

#[tokio::test]
async fn test_should_commit_withdrawals_at_checkpoint() -> eyre::Result<()> {
    // Given: withdrawals at 2, 3 and 5, a checkpoint every 5 blocks from height 1.
    let db = setup().await?;
    let chain = Arc::new(MockChain::with_blocks(11));
    chain.set_events(2, vec![withdrawal_event(1, 100, USDC)]);
    chain.set_events(3, vec![withdrawal_event(2, 200, USDC), withdrawal_event(3, 300, USDC)]);
    chain.set_events(5, vec![withdrawal_event(4, 400, USDC)]);
    chain.set_events(8, vec![withdrawal_event(5, 500, USDC)]);

    // When
    run_until(&db, &chain, config(5), 11).await?;

    // Then: output 1 covers [1, 6] and commits the first four withdrawals.
    let output = db.get_output(1).await?.expect("output 1");
    assert_eq!((output.start_height, output.end_height), (1, 6));
    let block_info = MockChain::block_info_at(6);
    assert_eq!(output.l2_block_hash, block_info.hash);
    assert_eq!(output.timestamp, block_info.timestamp);
    assert_eq!(
        output.output_root,
        Output::compute_output_root(block_info.state_root, output.storage_root, block_info.hash)
    );

    let committed = db.pending_withdrawals(0).await?;
    assert_eq!(committed.iter().map(|tx| tx.sequence).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    for tx in &committed {
        assert_eq!(tx.merkle_root, Some(output.storage_root));
        assert!(verify_withdrawal(tx, &tx.merkle_proof, output.storage_root));
    }

    // Then: output 2 covers [6, 11] and commits the withdrawal at 8.
    let output = db.get_output(2).await?.expect("output 2");
    assert_eq!((output.start_height, output.end_height), (6, 11));
    let committed = db.pending_withdrawals(1).await?;
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].sequence, 5);
    assert!(verify_withdrawal(&committed[0], &committed[0].merkle_proof, output.storage_root));
    assert_eq!(db.last_output_index().await?, 2);

    Ok(())
}

#[tokio::test]
async fn test_should_drop_withdrawal_of_unknown_coin() -> eyre::Result<()> {
    // Given
    let db = setup().await?;
    let chain = Arc::new(MockChain::with_blocks(4));
    chain.set_events(2, vec![withdrawal_event(1, 100, UNKNOWN)]);
    chain.set_events(3, vec![withdrawal_event(2, 100, USDC)]);

    // When
    run_until(&db, &chain, config(100), 4).await?;

    // Then: the withdrawal is dropped and the executor keeps following the chain.
    assert!(db.get_withdrawal(1).await?.is_none());
    let tx = db.get_withdrawal(2).await?.expect("withdrawal 2");
    assert_eq!(tx.output_index, 1);
    assert_eq!(tx.bridge_id, "1");
    assert_eq!((tx.sender, tx.receiver, tx.amount), (SENDER, RECEIVER, 100));
    assert!(!tx.is_committed());
    assert_eq!(db.get_synced_height(L2_MONITOR_NAME).await?, 4);

    Ok(())
}

#[tokio::test]
async fn test_should_create_empty_outputs_without_gaps() -> eyre::Result<()> {
    // Given: no withdrawal at all.
    let db = setup().await?;
    let chain = Arc::new(MockChain::with_blocks(30));

    // When
    run_until(&db, &chain, config(5), 30).await?;

    // Then
    let outputs = db.get_outputs_from(1).await?;
    assert_eq!(outputs.iter().map(|o| o.index).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    assert_eq!(
        outputs.iter().map(|o| (o.start_height, o.end_height)).collect::<Vec<_>>(),
        vec![(1, 6), (6, 11), (11, 16), (16, 21), (21, 26)]
    );
    assert!(outputs.iter().all(|o| o.storage_root == EMPTY_ROOT));

    Ok(())
}

#[tokio::test]
async fn test_should_resume_checkpoints_after_restart() -> eyre::Result<()> {
    // Given
    let db = setup().await?;
    let chain = Arc::new(MockChain::with_blocks(8));
    run_until(&db, &chain, config(5), 8).await?;
    assert_eq!(db.last_output_index().await?, 1);

    // When
    for height in 9..=16 {
        chain.push_block(BlockMeta::new(height, 1));
    }
    chain.set_events(12, vec![withdrawal_event(1, 100, USDC)]);
    run_until(&db, &chain, config(5), 16).await?;

    // Then
    let outputs = db.get_outputs_from(1).await?;
    assert_eq!(
        outputs.iter().map(|o| (o.index, o.start_height, o.end_height)).collect::<Vec<_>>(),
        vec![(1, 1, 6), (2, 6, 11), (3, 11, 16)]
    );
    let tx = db.get_withdrawal(1).await?.expect("withdrawal 1");
    assert_eq!(tx.output_index, 3);
    assert_eq!(tx.merkle_root, Some(outputs[2].storage_root));

    Ok(())
}

#[tokio::test]
async fn test_should_skip_boundary_on_empty_block() -> eyre::Result<()> {
    // Given: the boundary block 6 carries no transaction.
    let db = setup().await?;
    let chain = Arc::new(MockChain::with_blocks(8));
    chain.push_block(BlockMeta::new(6, 0));

    // When
    run_until(&db, &chain, config(5), 8).await?;

    // Then: the output is created at the next block carrying transactions.
    let output = db.get_output(1).await?.expect("output 1");
    assert_eq!((output.start_height, output.end_height, output.l2_block_height), (1, 7, 7));
    assert_eq!(db.last_output_index().await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_should_register_tokens() -> eyre::Result<()> {
    // Given
    let db = setup().await?;
    let weth = B256::repeat_byte(0x02);
    db.upsert_coin(Coin::new(weth, None)).await?;
    let chain = Arc::new(MockChain::with_blocks(2));
    chain.set_events(
        1,
        vec![ChainEvent::new(TOKEN_REGISTERED_EVENT_TAG, [("l2_denom", "l2/usdc")])],
    );
    chain.set_events(
        2,
        vec![ChainEvent::new(
            TOKEN_REGISTERED_EVENT_TAG,
            [("l1_metadata", weth.to_string()), ("l2_denom", "l2/weth".to_owned())],
        )],
    );

    // When
    run_until(&db, &chain, config(100), 2).await?;

    // Then
    let usdc = db.find_coin(USDC).await?.expect("usdc");
    assert!(usdc.is_checked);
    let weth = db.find_coin(weth).await?.expect("weth");
    assert!(weth.is_checked);
    assert_eq!(weth.l2_denom.as_deref(), Some("l2/weth"));

    Ok(())
}

#[tokio::test]
async fn test_should_fail_on_malformed_withdrawal() -> eyre::Result<()> {
    // Given: a withdrawal event without amount at height 2.
    let db = setup().await?;
    let chain = Arc::new(MockChain::with_blocks(3));
    chain.set_events(
        2,
        vec![ChainEvent::new(TOKEN_BRIDGE_INITIATED_EVENT_TAG, [("l2_sequence", "1")])],
    );
    let (height_tx, subscription) = WatchHeightSubscription::channel();
    height_tx.send_replace(Some(3));

    // When
    let hooks = L2Monitor::new(chain.clone(), config(100));
    let (monitor, _handle) = Monitor::new(
        chain.clone(),
        subscription,
        hooks,
        db.clone(),
        MonitorConfig { poll_interval: Duration::from_millis(1), retry_timeout: Duration::ZERO },
    );
    let err = monitor.run().await.unwrap_err();

    // Then
    assert_eq!(err.monitor, L2_MONITOR_NAME);
    assert_eq!(err.height, 2);
    let MonitorErrorKind::Hook(source) = err.kind else { panic!("expected hook error") };
    assert!(matches!(source.downcast_ref::<ExecutorError>(), Some(ExecutorError::EventDecode(_))));
    assert_eq!(db.get_synced_height(L2_MONITOR_NAME).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_should_replay_block_idempotently() -> eyre::Result<()> {
    // Given: a withdrawal at the boundary block 6.
    let db = setup().await?;
    let chain = Arc::new(MockChain::with_blocks(6));
    chain.set_events(6, vec![withdrawal_event(1, 100, USDC)]);
    let block = BlockMeta::new(6, 1);
    let mut hooks = L2Monitor::new(chain.clone(), config(5));
    hooks.on_start(&db).await?;

    // When: the block is processed, then replayed after a crash before commit.
    let tx = db.tx().await?;
    assert!(hooks.handle_events(&tx, &block).await?);
    assert!(hooks.handle_events(&tx, &block).await?);
    hooks.handle_block(&tx, &block).await?;
    tx.rollback().await?;

    hooks.on_start(&db).await?;
    let tx = db.tx().await?;
    assert!(hooks.handle_events(&tx, &block).await?);
    hooks.handle_block(&tx, &block).await?;
    tx.commit().await?;

    // Then
    let outputs = db.get_outputs_from(1).await?;
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].index, 1);
    let committed = db.pending_withdrawals(0).await?;
    assert_eq!(committed.len(), 1);
    assert!(verify_withdrawal(&committed[0], &committed[0].merkle_proof, outputs[0].storage_root));
    assert_eq!(hooks.schedule().map(|s| s.next_checkpoint_height()), Some(11));

    Ok(())
}

#[tokio::test]
async fn test_should_fail_on_out_of_range_sequence() -> eyre::Result<()> {
    // Given: a withdrawal of a known coin with a sequence that cannot be persisted.
    let db = setup().await?;
    let chain = Arc::new(MockChain::with_blocks(3));
    chain.set_events(2, vec![withdrawal_event(u64::MAX, 100, USDC)]);
    let (height_tx, subscription) = WatchHeightSubscription::channel();
    height_tx.send_replace(Some(3));

    // When
    let hooks = L2Monitor::new(chain.clone(), config(100));
    let (mut handle, task) = Monitor::spawn(chain, subscription, hooks, db.clone(), fast_config());
    let err = task.await?.unwrap_err();

    // Then: the monitor fails with its identity and height instead of panicking.
    assert_eq!(handle.stopped().await, MonitorState::Failed);
    assert_eq!(err.monitor, L2_MONITOR_NAME);
    assert_eq!(err.height, 2);
    let MonitorErrorKind::Hook(source) = err.kind else { panic!("expected hook error") };
    assert!(matches!(
        source.downcast_ref::<ExecutorError>(),
        Some(ExecutorError::EventDecode(EventDecodeError::InvalidAttribute { key: "l2_sequence", .. }))
    ));
    assert_eq!(db.get_synced_height(L2_MONITOR_NAME).await?, 1);
    assert!(db.get_withdrawal(MAX_WITHDRAWAL_SEQUENCE).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_should_commit_random_withdrawals_across_checkpoints() -> eyre::Result<()> {
    // Given: random withdrawals spread over 40 blocks, a checkpoint every 7 blocks.
    let db = setup().await?;
    let chain = Arc::new(MockChain::with_blocks(40));

    let mut bytes = vec![0u8; 1 << 16];
    rand::rng().fill(bytes.as_mut_slice());
    let mut u = Unstructured::new(&bytes);

    let mut sequence = 0;
    for height in 1..=40 {
        let count: u8 = u.int_in_range(0..=4)?;
        let events = (0..count)
            .map(|_| {
                sequence += 1;
                let tx = WithdrawalTx::arbitrary(&mut u)?;
                Ok(withdrawal_event_from(sequence, tx.sender, tx.receiver, tx.amount, USDC))
            })
            .collect::<arbitrary::Result<Vec<_>>>()?;
        chain.set_events(height, events);
    }

    // When
    run_until(&db, &chain, config(7), 40).await?;

    // Then: every committed withdrawal verifies against the storage root of its output.
    let outputs = db.get_outputs_from(1).await?;
    assert_eq!(outputs.iter().map(|o| o.end_height).collect::<Vec<_>>(), vec![8, 15, 22, 29, 36]);

    let mut committed = 0;
    for output in &outputs {
        let withdrawals = db.pending_withdrawals(output.index - 1).await?;
        for tx in &withdrawals {
            assert_eq!(tx.merkle_root, Some(output.storage_root));
            assert!(verify_withdrawal(tx, &tx.merkle_proof, output.storage_root));
        }
        committed += withdrawals.len();
    }

    // Then: the withdrawals after the last checkpoint are pending in the next output.
    let pending = db.pending_withdrawals(outputs.len() as u64).await?;
    assert!(pending.iter().all(|tx| !tx.is_committed()));
    assert_eq!(committed + pending.len(), sequence as usize);

    Ok(())
}

#[tokio::test]
async fn test_should_overlap_outputs_on_sparse_chain() -> eyre::Result<()> {
    // Given: only the blocks 30 and 50 carry transactions, a checkpoint every 5 blocks.
    let db = setup().await?;
    let chain = Arc::new(MockChain::with_blocks(50));
    for height in (1..=50).filter(|h| ![30, 50].contains(h)) {
        chain.push_block(BlockMeta::new(height, 0));
    }

    // When
    run_until(&db, &chain, config(5), 50).await?;

    // Then: a late boundary advances the schedule by a single interval, so the ranges overlap.
    let outputs = db.get_outputs_from(1).await?;
    assert_eq!(
        outputs.iter().map(|o| (o.index, o.start_height, o.end_height)).collect::<Vec<_>>(),
        vec![(1, 1, 30), (2, 6, 50)]
    );

    Ok(())
}
