//! The bridge executor node: follows the L2 and commits its withdrawals into outputs.

mod args;
pub use args::{BridgeArgs, DatabaseArgs, ExecutorNodeConfig, L2ProviderArgs, MonitorArgs};

mod constants;

mod node;
pub use node::run;
