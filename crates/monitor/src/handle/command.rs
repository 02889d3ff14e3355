/// Commands that can be sent to a [`crate::Monitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorCommand {
    /// Stop the monitor after the block currently processed.
    Stop,
}
