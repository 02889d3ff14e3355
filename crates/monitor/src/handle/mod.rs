//! Command handle for the monitor.

mod command;
pub use command::MonitorCommand;

use crate::MonitorState;
use tokio::sync::{mpsc::UnboundedSender, watch};

/// Handle to interact with a running [`crate::Monitor`].
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    to_monitor_tx: UnboundedSender<MonitorCommand>,
    state_rx: watch::Receiver<Option<MonitorState>>,
}

impl MonitorHandle {
    /// Create a new handle with the given command sender and state receiver.
    pub const fn new(
        to_monitor_tx: UnboundedSender<MonitorCommand>,
        state_rx: watch::Receiver<Option<MonitorState>>,
    ) -> Self {
        Self { to_monitor_tx, state_rx }
    }

    /// Requests the monitor to stop. Stopping an already stopped monitor is a no-op.
    pub fn stop(&self) {
        self.send_command(MonitorCommand::Stop);
    }

    /// Returns the current state of the monitor. A monitor that did not start yet is
    /// [`MonitorState::Stopped`].
    pub fn state(&self) -> MonitorState {
        self.state_rx.borrow().unwrap_or_default()
    }

    /// Waits until the monitor started and then reached a terminal state, and returns it.
    pub async fn stopped(&mut self) -> MonitorState {
        let state = self
            .state_rx
            .wait_for(|state| state.is_some_and(|state| state.is_terminal()))
            .await
            .map(|state| state.unwrap_or_default());
        // the monitor was dropped, return the last state it published.
        state.unwrap_or_else(|_| self.state())
    }

    /// Send a command to the monitor without waiting for a response.
    fn send_command(&self, command: MonitorCommand) {
        if let Err(err) = self.to_monitor_tx.send(command) {
            tracing::debug!(target: "opbridge::monitor", ?err, "Monitor already exited");
        }
    }
}
