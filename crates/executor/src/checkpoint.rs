use opbridge_primitives::BridgeConfig;

/// The checkpoint cadence of the executor, derived from the bridge configuration and the last
/// committed checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointSchedule {
    submission_interval: u64,
    next_checkpoint_height: u64,
}

impl CheckpointSchedule {
    /// Returns the schedule following the checkpoint at `last_checkpoint_height`, or the first
    /// schedule of the bridge if no checkpoint was committed yet.
    pub const fn new(config: &BridgeConfig, last_checkpoint_height: Option<u64>) -> Self {
        let checkpoint_height = match last_checkpoint_height {
            Some(height) => height + config.submission_interval,
            None => config.starting_block_height,
        };
        Self {
            submission_interval: config.submission_interval,
            next_checkpoint_height: checkpoint_height + config.submission_interval,
        }
    }

    /// Returns the height from which the block at `height` triggers an output.
    pub const fn next_checkpoint_height(&self) -> u64 {
        self.next_checkpoint_height
    }

    /// Returns the number of blocks between two outputs.
    pub const fn submission_interval(&self) -> u64 {
        self.submission_interval
    }

    /// Returns true if the block at `height` reaches the checkpoint boundary.
    pub const fn is_boundary(&self, height: u64) -> bool {
        height >= self.next_checkpoint_height
    }

    /// Returns the first height covered by the next output.
    pub const fn start_height(&self) -> u64 {
        self.next_checkpoint_height.saturating_sub(self.submission_interval)
    }

    /// Moves the boundary to the next checkpoint.
    pub fn advance(&mut self) {
        self.next_checkpoint_height += self.submission_interval;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: BridgeConfig =
        BridgeConfig { submission_interval: 10, finalized_time: 60, starting_block_height: 1 };

    #[test]
    fn test_first_schedule_starts_at_starting_height() {
        let schedule = CheckpointSchedule::new(&CONFIG, None);

        assert_eq!(schedule.next_checkpoint_height(), 11);
        assert_eq!(schedule.start_height(), 1);
        assert!(!schedule.is_boundary(10));
        assert!(schedule.is_boundary(11));
        assert!(schedule.is_boundary(12));
    }

    #[test]
    fn test_schedule_resumes_after_last_checkpoint() {
        let mut schedule = CheckpointSchedule::new(&CONFIG, None);
        schedule.advance();
        assert_eq!(schedule.next_checkpoint_height(), 21);
        assert_eq!(schedule.start_height(), 11);

        // a restart after the output starting at 11 was committed yields the same schedule.
        let resumed = CheckpointSchedule::new(&CONFIG, Some(11));
        assert_eq!(resumed.next_checkpoint_height(), 31);
        schedule.advance();
        assert_eq!(schedule, resumed);
    }
}
