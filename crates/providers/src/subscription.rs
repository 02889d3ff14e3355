use crate::ProviderError;
use opbridge_monitor::{HeightSubscription, WatchHeightSubscription};
use std::time::Duration;
use tokio::{sync::watch, task::JoinHandle};

/// An instance of the trait can return the latest height of a chain.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait LatestHeightProvider: Sync + Send {
    /// Returns the latest height of the chain.
    async fn latest_height(&self) -> Result<u64, ProviderError>;
}

/// A [`HeightSubscription`] refreshing the latest height from a [`LatestHeightProvider`] at a
/// fixed interval in a background task.
#[derive(Debug)]
pub struct PollingHeightSubscription<P> {
    /// The provider of the latest height.
    provider: P,
    /// The interval between two refreshes.
    interval: Duration,
    /// The subscription to the refreshed heights.
    inner: WatchHeightSubscription,
    /// The sender of the refreshed heights.
    tx: watch::Sender<Option<u64>>,
    /// The refresh task, while running.
    task: Option<JoinHandle<()>>,
}

impl<P> PollingHeightSubscription<P>
where
    P: LatestHeightProvider + Clone + 'static,
{
    /// Returns a new [`PollingHeightSubscription`]. Polling starts on initialization.
    pub fn new(provider: P, interval: Duration) -> Self {
        let (tx, inner) = WatchHeightSubscription::channel();
        Self { provider, interval, inner, tx, task: None }
    }

    async fn refresh(provider: P, interval: Duration, tx: watch::Sender<Option<u64>>) {
        loop {
            tokio::time::sleep(interval).await;
            match provider.latest_height().await {
                Ok(height) => {
                    tx.send_replace(Some(height));
                }
                Err(err) => {
                    tracing::warn!(target: "opbridge::providers", %err, "Failed to refresh latest height");
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl<P> HeightSubscription for PollingHeightSubscription<P>
where
    P: LatestHeightProvider + Clone + 'static,
{
    type Error = ProviderError;

    async fn initialize(&mut self) -> Result<(), Self::Error> {
        self.stop();

        let height = self.provider.latest_height().await?;
        tracing::info!(target: "opbridge::providers", height, "Subscribed to latest height");
        self.tx.send_replace(Some(height));
        self.inner.resume();

        self.task =
            Some(tokio::spawn(Self::refresh(self.provider.clone(), self.interval, self.tx.clone())));
        Ok(())
    }

    fn latest_height(&self) -> Option<u64> {
        self.inner.latest_height()
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            tracing::debug!(target: "opbridge::providers", "Stopping latest height subscription");
            task.abort();
        }
        self.inner.stop();
    }
}

impl<P> Drop for PollingHeightSubscription<P> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
