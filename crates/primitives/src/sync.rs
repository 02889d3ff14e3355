/// The durable synchronization cursor of a monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncState {
    /// The monitor identity.
    pub name: String,
    /// The height of the last fully processed block.
    pub height: u64,
}
