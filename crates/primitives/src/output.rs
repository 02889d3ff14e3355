use alloy_primitives::{keccak256, B256};

/// The version of the output root format.
pub const OUTPUT_VERSION: B256 = B256::ZERO;

/// A checkpoint of the L2, committing the withdrawals of a range of blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    /// The output index, strictly increasing and gap-free from 1.
    pub index: u64,
    /// The output root proposed to the L1.
    pub output_root: B256,
    /// The L2 application state root at [`Output::l2_block_height`].
    pub state_root: B256,
    /// The merkle root over the withdrawals of the output.
    pub storage_root: B256,
    /// The hash of the L2 block at [`Output::l2_block_height`].
    pub l2_block_hash: B256,
    /// The L2 height the output was created at.
    pub l2_block_height: u64,
    /// The timestamp of the L2 block at [`Output::l2_block_height`].
    pub timestamp: u64,
    /// The first L2 height covered by the output.
    pub start_height: u64,
    /// The last L2 height covered by the output.
    pub end_height: u64,
}

impl Output {
    /// Computes the output root `keccak256(version ‖ state_root ‖ storage_root ‖ block_hash)`.
    pub fn compute_output_root(state_root: B256, storage_root: B256, block_hash: B256) -> B256 {
        let mut buf = [0u8; 4 * 32];
        buf[..32].copy_from_slice(OUTPUT_VERSION.as_slice());
        buf[32..64].copy_from_slice(state_root.as_slice());
        buf[64..96].copy_from_slice(storage_root.as_slice());
        buf[96..].copy_from_slice(block_hash.as_slice());
        keccak256(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    #[test]
    fn test_output_root_binds_every_component() {
        let state_root = b256!("0x1111111111111111111111111111111111111111111111111111111111111111");
        let storage_root =
            b256!("0x2222222222222222222222222222222222222222222222222222222222222222");
        let block_hash = b256!("0x3333333333333333333333333333333333333333333333333333333333333333");

        let root = Output::compute_output_root(state_root, storage_root, block_hash);
        assert_eq!(root, Output::compute_output_root(state_root, storage_root, block_hash));
        assert_ne!(root, Output::compute_output_root(storage_root, state_root, block_hash));
        assert_ne!(root, Output::compute_output_root(state_root, storage_root, B256::ZERO));
    }
}
