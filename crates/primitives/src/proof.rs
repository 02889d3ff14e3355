use alloy_primitives::B256;

/// The length of an encoded [`ProofStep`]: one side byte followed by the sibling hash.
pub const PROOF_STEP_LENGTH: usize = 1 + 32;

/// The position of a sibling relative to the node being folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(any(test, feature = "arbitrary"), derive(arbitrary::Arbitrary))]
pub enum Side {
    /// The sibling is the left operand of the parent hash.
    Left,
    /// The sibling is the right operand of the parent hash.
    Right,
}

impl Side {
    const fn as_byte(self) -> u8 {
        match self {
            Self::Left => 0x00,
            Self::Right => 0x01,
        }
    }
}

/// A single step of a Merkle inclusion proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(any(test, feature = "arbitrary"), derive(arbitrary::Arbitrary))]
pub struct ProofStep {
    /// Which side the sibling sits on.
    pub side: Side,
    /// The sibling hash.
    pub sibling: B256,
}

impl ProofStep {
    /// Returns a new [`ProofStep`].
    pub const fn new(side: Side, sibling: B256) -> Self {
        Self { side, sibling }
    }

    /// Encodes a proof into its persisted form: a concatenation of `side ‖ sibling` steps.
    pub fn encode_proof(proof: &[Self]) -> Vec<u8> {
        let mut out = Vec::with_capacity(proof.len() * PROOF_STEP_LENGTH);
        for step in proof {
            out.push(step.side.as_byte());
            out.extend_from_slice(step.sibling.as_slice());
        }
        out
    }

    /// Decodes a proof from its persisted form.
    pub fn decode_proof(bytes: &[u8]) -> Result<Vec<Self>, ProofDecodeError> {
        if bytes.len() % PROOF_STEP_LENGTH != 0 {
            return Err(ProofDecodeError::InvalidLength(bytes.len()))
        }

        bytes
            .chunks_exact(PROOF_STEP_LENGTH)
            .map(|chunk| {
                let side = match chunk[0] {
                    0x00 => Side::Left,
                    0x01 => Side::Right,
                    other => return Err(ProofDecodeError::InvalidSide(other)),
                };
                Ok(Self { side, sibling: B256::from_slice(&chunk[1..]) })
            })
            .collect()
    }
}

/// An error decoding a persisted proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProofDecodeError {
    /// The encoded proof is not a multiple of [`PROOF_STEP_LENGTH`].
    #[error("invalid proof length {0}")]
    InvalidLength(usize),
    /// Unknown side byte.
    #[error("invalid proof side byte {0:#04x}")]
    InvalidSide(u8),
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbitrary::{Arbitrary, Unstructured};
    use rand::Rng;

    #[test]
    fn test_should_decode_encoded_proof() {
        let mut bytes = [0u8; 1024];
        rand::rng().fill(bytes.as_mut_slice());
        let mut u = Unstructured::new(&bytes);

        let proof: Vec<ProofStep> = Vec::arbitrary(&mut u).unwrap();
        let encoded = ProofStep::encode_proof(&proof);

        assert_eq!(encoded.len(), proof.len() * PROOF_STEP_LENGTH);
        assert_eq!(ProofStep::decode_proof(&encoded).unwrap(), proof);
    }

    #[test]
    fn test_should_reject_malformed_proof() {
        assert_eq!(ProofStep::decode_proof(&[0u8; 32]), Err(ProofDecodeError::InvalidLength(32)));

        let mut bytes = [0u8; PROOF_STEP_LENGTH];
        bytes[0] = 0x02;
        assert_eq!(ProofStep::decode_proof(&bytes), Err(ProofDecodeError::InvalidSide(0x02)));
    }
}
