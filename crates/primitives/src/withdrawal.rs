use crate::ProofStep;
use alloy_primitives::{Address, B256};

/// A withdrawal from the L2 to the L1, recorded by the executor.
///
/// The leaf fields (sequence, sender, receiver, amount, bridge id and token metadata) are fixed
/// at creation. The merkle root and proof are written once, when the output the withdrawal
/// belongs to is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalTx {
    /// The L2 sequence number of the withdrawal, unique per bridge.
    pub sequence: u64,
    /// The L2 sender.
    pub sender: Address,
    /// The L1 receiver.
    pub receiver: Address,
    /// The withdrawn amount.
    pub amount: u64,
    /// The bridge identifier.
    pub bridge_id: String,
    /// The L1 metadata of the withdrawn token.
    pub metadata: B256,
    /// The index of the output committing this withdrawal.
    pub output_index: u64,
    /// The storage root of the committing output, once committed.
    pub merkle_root: Option<B256>,
    /// The inclusion proof against [`WithdrawalTx::merkle_root`].
    pub merkle_proof: Vec<ProofStep>,
}

impl WithdrawalTx {
    /// Returns true if the withdrawal has been committed into an output.
    pub const fn is_committed(&self) -> bool {
        self.merkle_root.is_some()
    }
}

#[cfg(feature = "arbitrary")]
impl arbitrary::Arbitrary<'_> for WithdrawalTx {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        Ok(Self {
            sequence: u.int_in_range(0..=u32::MAX)? as u64,
            sender: u.arbitrary()?,
            receiver: u.arbitrary()?,
            amount: u.arbitrary()?,
            bridge_id: u.int_in_range(1..=u16::MAX)?.to_string(),
            metadata: u.arbitrary()?,
            output_index: u.int_in_range(1..=u16::MAX)? as u64,
            merkle_root: None,
            merkle_proof: Vec::new(),
        })
    }
}
