use alloy_primitives::B256;

/// An error building a withdrawal commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MerkleError {
    /// The requested withdrawal is not a member of the batch.
    #[error("withdrawal with leaf hash {0} not found in batch")]
    NotFound(B256),
}
