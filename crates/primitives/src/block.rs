use alloy_primitives::B256;

/// Block metadata as returned by a block range query on the L2.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, derive_more::Display)]
#[display("BlockMeta {{ height: {height}, num_txs: {num_txs} }}")]
pub struct BlockMeta {
    /// The block height.
    pub height: u64,
    /// The number of transactions in the block.
    pub num_txs: u64,
}

impl BlockMeta {
    /// Returns a new instance of [`BlockMeta`].
    pub const fn new(height: u64, num_txs: u64) -> Self {
        Self { height, num_txs }
    }

    /// Returns true if the block contains no transaction.
    pub const fn is_empty(&self) -> bool {
        self.num_txs == 0
    }
}

/// Information about an L2 block, used to anchor an output.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BlockInfo {
    /// The block height.
    pub height: u64,
    /// The block hash.
    pub hash: B256,
    /// The application state root committed by the block.
    pub state_root: B256,
    /// The block timestamp, in seconds.
    pub timestamp: u64,
}

#[cfg(feature = "arbitrary")]
impl arbitrary::Arbitrary<'_> for BlockInfo {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let height = u.int_in_range(0..=u32::MAX)?;
        Ok(Self {
            height: height as u64,
            hash: u.arbitrary()?,
            state_root: u.arbitrary()?,
            timestamp: u.int_in_range(0..=u32::MAX)? as u64,
        })
    }
}
