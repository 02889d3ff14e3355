//! The crate exposes the providers of L2 chain data for the bridge executor.

pub use error::ProviderError;
mod error;

pub use rpc::CometRpcClient;
mod rpc;

pub use subscription::{LatestHeightProvider, PollingHeightSubscription};
mod subscription;

mod types;
