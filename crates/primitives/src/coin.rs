use alloy_primitives::B256;

/// A token registered on the bridge, mapping its L1 identity to its L2 denomination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    /// The L1 metadata identifying the token.
    pub l1_metadata: B256,
    /// The L2 denomination, once known.
    pub l2_denom: Option<String>,
    /// Whether the token registration has been observed on the L2.
    pub is_checked: bool,
}

impl Coin {
    /// Returns a new unchecked [`Coin`].
    pub const fn new(l1_metadata: B256, l2_denom: Option<String>) -> Self {
        Self { l1_metadata, l2_denom, is_checked: false }
    }
}
