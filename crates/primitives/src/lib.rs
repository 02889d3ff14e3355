//! Primitive types for the bridge executor.

pub use block::{BlockInfo, BlockMeta};
mod block;

pub use coin::Coin;
mod coin;

pub use config::{BridgeConfig, ConfigError};
mod config;

pub use event::{
    BridgeEvent, ChainEvent, EventDecodeError, TokenRegistered, WithdrawalInitiated,
    BRIDGE_EVENT_CATEGORY, MAX_WITHDRAWAL_SEQUENCE, TOKEN_BRIDGE_INITIATED_EVENT_TAG,
    TOKEN_REGISTERED_EVENT_TAG,
};
mod event;

pub use output::{Output, OUTPUT_VERSION};
mod output;

pub use proof::{ProofDecodeError, ProofStep, Side, PROOF_STEP_LENGTH};
mod proof;

pub use sync::SyncState;
mod sync;

pub use withdrawal::WithdrawalTx;
mod withdrawal;
