use crate::ChainDataSource;
use alloy_primitives::B256;
use opbridge_primitives::{BlockInfo, BlockMeta, ChainEvent};
use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

/// An error of the [`MockChain`].
#[derive(Debug, thiserror::Error)]
pub enum MockChainError {
    /// The requested block is unknown.
    #[error("unknown block {0}")]
    UnknownBlock(u64),
}

/// An in-memory [`ChainDataSource`].
///
/// Blocks are registered with their metadata and events. A block can be marked as not indexed
/// for a number of event queries, after which its events become available.
#[derive(Debug, Default)]
pub struct MockChain {
    blocks: Mutex<BTreeMap<u64, BlockMeta>>,
    events: Mutex<HashMap<u64, Vec<ChainEvent>>>,
    unindexed: Mutex<HashMap<u64, usize>>,
    event_queries: AtomicUsize,
}

impl MockChain {
    /// Returns a chain with the blocks `1..=len`, each carrying a single transaction.
    pub fn with_blocks(len: u64) -> Self {
        let chain = Self::default();
        for height in 1..=len {
            chain.push_block(BlockMeta::new(height, 1));
        }
        chain
    }

    /// Adds or replaces a block.
    pub fn push_block(&self, block: BlockMeta) {
        self.blocks.lock().unwrap().insert(block.height, block);
    }

    /// Removes a block.
    pub fn remove_block(&self, height: u64) {
        self.blocks.lock().unwrap().remove(&height);
    }

    /// Sets the events emitted at `height`.
    pub fn set_events(&self, height: u64, events: Vec<ChainEvent>) {
        self.events.lock().unwrap().insert(height, events);
    }

    /// Marks the events at `height` as not indexed for the next `queries` event queries.
    pub fn set_unindexed(&self, height: u64, queries: usize) {
        self.unindexed.lock().unwrap().insert(height, queries);
    }

    /// Returns the number of event queries served.
    pub fn event_queries(&self) -> usize {
        self.event_queries.load(Ordering::Relaxed)
    }

    /// Returns the deterministic [`BlockInfo`] of the mock block at `height`.
    pub fn block_info_at(height: u64) -> BlockInfo {
        BlockInfo {
            height,
            hash: B256::left_padding_from(&height.to_be_bytes()),
            state_root: B256::repeat_byte(0x5a),
            timestamp: 1_700_000_000 + height,
        }
    }
}

#[async_trait::async_trait]
impl ChainDataSource for MockChain {
    type Error = MockChainError;

    async fn block_range(&self, from: u64, to: u64) -> Result<Vec<BlockMeta>, Self::Error> {
        assert!(to >= from && to - from < crate::MAX_BLOCK_RANGE, "invalid range [{from}, {to}]");
        Ok(self.blocks.lock().unwrap().range(from..=to).map(|(_, block)| *block).collect())
    }

    async fn events(
        &self,
        height: u64,
        _category: &str,
    ) -> Result<Option<Vec<ChainEvent>>, Self::Error> {
        self.event_queries.fetch_add(1, Ordering::Relaxed);
        if !self.blocks.lock().unwrap().contains_key(&height) {
            return Err(MockChainError::UnknownBlock(height))
        }

        let mut unindexed = self.unindexed.lock().unwrap();
        if let Some(remaining) = unindexed.get_mut(&height) {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(None)
            }
        }
        drop(unindexed);

        Ok(Some(self.events.lock().unwrap().get(&height).cloned().unwrap_or_default()))
    }

    async fn block_info(&self, height: u64) -> Result<BlockInfo, Self::Error> {
        if !self.blocks.lock().unwrap().contains_key(&height) {
            return Err(MockChainError::UnknownBlock(height))
        }
        Ok(Self::block_info_at(height))
    }
}
