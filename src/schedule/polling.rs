//! `PollingScheduler`: one repeating refresh timer per signature.
//!
//! Each tick invalidates the cached entry and reloads it through the
//! `AssetCache`, so a tick that overlaps a manual refresh or a regular `get`
//! joins the same request. Outcomes are delivered on an mpsc channel.

use crate::cache::AssetCache;
use crate::error::SdkError;
use crate::shared::Signature;

use async_lock::Mutex;
use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

const EVENT_BUFFER: usize = 16;

/// Produces one fresh load per call.
pub type PollLoader<V> = Arc<dyn Fn() -> BoxFuture<'static, Result<V, SdkError>> + Send + Sync>;

/// Outcome of one polling tick.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent<V> {
    Updated(V),
    Failed(SdkError),
}

/// Registry of polling timers keyed by signature.
///
/// Dropping the scheduler aborts every timer.
pub struct PollingScheduler<V> {
    cache: AssetCache<V>,
    timers: Mutex<HashMap<Signature, JoinHandle<()>>>,
}

impl<V> std::fmt::Debug for PollingScheduler<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingScheduler").finish_non_exhaustive()
    }
}

impl<V> PollingScheduler<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(cache: AssetCache<V>) -> Self {
        Self {
            cache,
            timers: Mutex::new(HashMap::new()),
        }
    }

    /// Start polling `signature` every `interval`, fetching once immediately.
    ///
    /// An existing timer for the same signature is cancelled and replaced.
    /// The timer also stops by itself once the returned receiver is dropped.
    pub async fn start(
        &self,
        signature: Signature,
        loader: PollLoader<V>,
        interval: Duration,
    ) -> mpsc::Receiver<PollEvent<V>> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let handle = tokio::spawn(run_timer(
            self.cache.clone(),
            signature.clone(),
            loader,
            interval,
            tx,
        ));

        let mut timers = self.timers.lock().await;
        if let Some(previous) = timers.insert(signature.clone(), handle) {
            previous.abort();
            tracing::info!(signature = %signature, "Polling restarted");
        } else {
            tracing::info!(signature = %signature, ?interval, "Polling started");
        }
        rx
    }

    /// Cancel the timer for `signature`. Returns whether one was running.
    pub async fn stop(&self, signature: &Signature) -> bool {
        match self.timers.lock().await.remove(signature) {
            Some(handle) => {
                let was_running = !handle.is_finished();
                handle.abort();
                tracing::info!(signature = %signature, "Polling stopped");
                was_running
            }
            None => false,
        }
    }

    pub async fn stop_all(&self) {
        let mut timers = self.timers.lock().await;
        for (signature, handle) in timers.drain() {
            handle.abort();
            tracing::info!(signature = %signature, "Polling stopped");
        }
    }

    pub async fn is_running(&self, signature: &Signature) -> bool {
        self.timers
            .lock()
            .await
            .get(signature)
            .is_some_and(|h| !h.is_finished())
    }

    /// One immediate invalidate-and-fetch, independent of any timer.
    pub async fn refresh_now(
        &self,
        signature: &Signature,
        loader: PollLoader<V>,
    ) -> Result<V, SdkError> {
        self.cache.invalidate(signature).await;
        self.cache.get(signature, move || loader()).await
    }
}

impl<V> Drop for PollingScheduler<V> {
    fn drop(&mut self) {
        for (_, handle) in self.timers.get_mut().drain() {
            handle.abort();
        }
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

async fn run_timer<V>(
    cache: AssetCache<V>,
    signature: Signature,
    loader: PollLoader<V>,
    interval: Duration,
    tx: mpsc::Sender<PollEvent<V>>,
) where
    V: Clone + Send + Sync + 'static,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        cache.invalidate(&signature).await;
        let load = loader.clone();
        let event = match cache.get(&signature, move || load()).await {
            Ok(value) => PollEvent::Updated(value),
            Err(e) => {
                tracing::warn!(signature = %signature, error = %e, "Polling fetch failed");
                PollEvent::Failed(e)
            }
        };

        if tx.send(event).await.is_err() {
            tracing::debug!(signature = %signature, "Poll receiver dropped, stopping timer");
            break;
        }
    }
}
