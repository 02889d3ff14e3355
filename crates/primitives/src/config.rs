/// The bridge parameters the executor derives its checkpoint cadence from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    /// The number of L2 blocks between two consecutive outputs.
    pub submission_interval: u64,
    /// The time, in seconds, after which a proposed output is considered final on L1.
    pub finalized_time: u64,
    /// The L2 height of the first checkpoint.
    pub starting_block_height: u64,
}

impl BridgeConfig {
    /// Validates the configuration.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.submission_interval == 0 {
            return Err(ConfigError::ZeroSubmissionInterval)
        }
        Ok(())
    }
}

/// An invalid [`BridgeConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The submission interval must be strictly positive.
    #[error("submission interval must be greater than zero")]
    ZeroSubmissionInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_reject_zero_submission_interval() {
        let config =
            BridgeConfig { submission_interval: 0, finalized_time: 10, starting_block_height: 1 };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSubmissionInterval));

        let config = BridgeConfig { submission_interval: 5, ..config };
        assert_eq!(config.validate(), Ok(()));
    }
}
