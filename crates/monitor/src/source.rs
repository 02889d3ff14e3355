use opbridge_primitives::{BlockInfo, BlockMeta, ChainEvent};
use std::convert::Infallible;
use tokio::sync::watch;

/// A source of chain data for a monitor.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait ChainDataSource: Sync + Send {
    /// The error type for the chain data source.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the metadata of the blocks in the inclusive range `[from, to]`, in ascending
    /// height order. The range never spans more than [`crate::MAX_BLOCK_RANGE`] blocks.
    async fn block_range(&self, from: u64, to: u64) -> Result<Vec<BlockMeta>, Self::Error>;

    /// Returns the events of the provided category emitted at `height`, in emission order, or
    /// [`None`] if the events at this height are not indexed yet.
    async fn events(
        &self,
        height: u64,
        category: &str,
    ) -> Result<Option<Vec<ChainEvent>>, Self::Error>;

    /// Returns the [`BlockInfo`] of the block at `height`.
    async fn block_info(&self, height: u64) -> Result<BlockInfo, Self::Error>;
}

/// A subscription to the latest height observed on a chain.
#[async_trait::async_trait]
pub trait HeightSubscription: Send {
    /// The error type for the subscription.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Initializes the subscription.
    async fn initialize(&mut self) -> Result<(), Self::Error>;

    /// Returns the latest observed height, if any. Never blocks.
    fn latest_height(&self) -> Option<u64>;

    /// Stops the subscription. Stopping twice is a no-op.
    fn stop(&mut self);
}

/// A [`HeightSubscription`] backed by a [`watch`] channel fed by an external producer.
#[derive(Debug, Clone)]
pub struct WatchHeightSubscription {
    rx: watch::Receiver<Option<u64>>,
    stopped: bool,
}

impl WatchHeightSubscription {
    /// Returns a new subscription and the sender used to publish new heights.
    pub fn channel() -> (watch::Sender<Option<u64>>, Self) {
        let (tx, rx) = watch::channel(None);
        (tx, Self::new(rx))
    }

    /// Returns a new subscription reading from the provided receiver.
    pub const fn new(rx: watch::Receiver<Option<u64>>) -> Self {
        Self { rx, stopped: false }
    }

    /// Resumes reading heights after a [`HeightSubscription::stop`].
    pub fn resume(&mut self) {
        self.stopped = false;
    }
}

#[async_trait::async_trait]
impl HeightSubscription for WatchHeightSubscription {
    type Error = Infallible;

    async fn initialize(&mut self) -> Result<(), Self::Error> {
        self.resume();
        Ok(())
    }

    fn latest_height(&self) -> Option<u64> {
        if self.stopped {
            return None
        }
        *self.rx.borrow()
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_watch_subscription_resumes_after_stop() {
        let (tx, mut subscription) = WatchHeightSubscription::channel();
        assert_eq!(subscription.latest_height(), None);

        tx.send_replace(Some(7));
        assert_eq!(subscription.latest_height(), Some(7));

        subscription.stop();
        subscription.stop();
        assert_eq!(subscription.latest_height(), None);

        subscription.initialize().await.unwrap();
        tx.send_replace(Some(8));
        assert_eq!(subscription.latest_height(), Some(8));
    }
}
