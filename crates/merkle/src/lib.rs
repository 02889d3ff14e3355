//! Merkle commitment over batches of withdrawals.
//!
//! The tree is a binary Keccak-256 tree built over the withdrawals of a batch in input order:
//!
//! - a leaf is `keccak256(0x00 ‖ encode_leaf(withdrawal))`, see [`encode_leaf`] for the byte
//!   layout;
//! - an internal node is `keccak256(0x01 ‖ left ‖ right)`;
//! - when a level holds an odd number of nodes, the last node is paired with itself;
//! - the root of an empty batch is [`EMPTY_ROOT`] and the root of a single withdrawal is its
//!   leaf hash.
//!
//! A proof is the list of siblings from the leaf up to the root, each tagged with the side it
//! sits on. [`verify`] only needs the leaf, the proof and the root.

mod error;
pub use error::MerkleError;

use alloy_primitives::{keccak256, B256};
use opbridge_primitives::{ProofStep, Side, WithdrawalTx};

/// The root of an empty batch.
pub const EMPTY_ROOT: B256 = B256::ZERO;

/// The domain prefix of a leaf hash.
pub const LEAF_PREFIX: u8 = 0x00;

/// The domain prefix of an internal node hash.
pub const NODE_PREFIX: u8 = 0x01;

/// Encodes the committed fields of a withdrawal, with big-endian integers:
/// `sequence (8) ‖ sender (20) ‖ receiver (20) ‖ amount (8) ‖ len(bridge_id) (4) ‖ bridge_id ‖
/// metadata (32)`.
pub fn encode_leaf(tx: &WithdrawalTx) -> Vec<u8> {
    let bridge_id = tx.bridge_id.as_bytes();
    let mut out = Vec::with_capacity(8 + 20 + 20 + 8 + 4 + bridge_id.len() + 32);
    out.extend_from_slice(&tx.sequence.to_be_bytes());
    out.extend_from_slice(tx.sender.as_slice());
    out.extend_from_slice(tx.receiver.as_slice());
    out.extend_from_slice(&tx.amount.to_be_bytes());
    out.extend_from_slice(&(bridge_id.len() as u32).to_be_bytes());
    out.extend_from_slice(bridge_id);
    out.extend_from_slice(tx.metadata.as_slice());
    out
}

/// Returns the leaf hash of a withdrawal.
pub fn leaf_hash(tx: &WithdrawalTx) -> B256 {
    let encoded = encode_leaf(tx);
    let mut buf = Vec::with_capacity(1 + encoded.len());
    buf.push(LEAF_PREFIX);
    buf.extend_from_slice(&encoded);
    keccak256(buf)
}

/// Returns the hash of an internal node.
pub fn node_hash(left: B256, right: B256) -> B256 {
    let mut buf = [0u8; 1 + 64];
    buf[0] = NODE_PREFIX;
    buf[1..33].copy_from_slice(left.as_slice());
    buf[33..].copy_from_slice(right.as_slice());
    keccak256(buf)
}

/// Folds the proof over the leaf hash and checks the result against the root.
pub fn verify(leaf: B256, proof: &[ProofStep], root: B256) -> bool {
    let computed = proof.iter().fold(leaf, |acc, step| match step.side {
        Side::Left => node_hash(step.sibling, acc),
        Side::Right => node_hash(acc, step.sibling),
    });
    computed == root
}

/// Verifies the inclusion of a withdrawal against a root.
pub fn verify_withdrawal(tx: &WithdrawalTx, proof: &[ProofStep], root: B256) -> bool {
    verify(leaf_hash(tx), proof, root)
}

/// The merkle tree over a batch of withdrawals.
#[derive(Debug, Clone)]
pub struct WithdrawalStorage {
    /// The levels of the tree, from the leaves to the root.
    layers: Vec<Vec<B256>>,
}

impl WithdrawalStorage {
    /// Builds the tree over the batch, in input order.
    pub fn new(batch: &[WithdrawalTx]) -> Self {
        let leaves: Vec<B256> = batch.iter().map(leaf_hash).collect();
        Self::from_leaves(leaves)
    }

    /// Builds the tree over already hashed leaves.
    pub fn from_leaves(leaves: Vec<B256>) -> Self {
        let mut layers = vec![leaves];
        while let Some(layer) = layers.last().filter(|layer| layer.len() > 1) {
            let next = layer
                .chunks(2)
                .map(|pair| node_hash(pair[0], *pair.get(1).unwrap_or(&pair[0])))
                .collect();
            layers.push(next);
        }
        Self { layers }
    }

    /// Returns the number of leaves in the tree.
    pub fn len(&self) -> usize {
        self.layers[0].len()
    }

    /// Returns true if the tree has no leaves.
    pub fn is_empty(&self) -> bool {
        self.layers[0].is_empty()
    }

    /// Returns the root of the tree.
    pub fn root(&self) -> B256 {
        self.layers.last().and_then(|layer| layer.first().copied()).unwrap_or(EMPTY_ROOT)
    }

    /// Returns the inclusion proof of the withdrawal.
    pub fn proof(&self, tx: &WithdrawalTx) -> Result<Vec<ProofStep>, MerkleError> {
        let leaf = leaf_hash(tx);
        self.layers[0]
            .iter()
            .position(|l| *l == leaf)
            .and_then(|index| self.proof_at(index))
            .ok_or(MerkleError::NotFound(leaf))
    }

    /// Returns the inclusion proof of the leaf at `index`, if any.
    pub fn proof_at(&self, mut index: usize) -> Option<Vec<ProofStep>> {
        if index >= self.len() {
            return None
        }

        let mut proof = Vec::with_capacity(self.layers.len().saturating_sub(1));
        for layer in &self.layers[..self.layers.len() - 1] {
            let step = if index % 2 == 0 {
                ProofStep::new(Side::Right, layer.get(index + 1).copied().unwrap_or(layer[index]))
            } else {
                ProofStep::new(Side::Left, layer[index - 1])
            };
            proof.push(step);
            index /= 2;
        }
        Some(proof)
    }
}
