//! `AssetCache`: in-memory TTL cache with request coalescing.
//!
//! At most one load per signature is in flight at any time. Callers that
//! arrive while a load is running attach to it and receive the same result.
//! Failures are never cached.
//!
//! Waiters hold strong handles to the shared load; the in-flight registry
//! only holds a weak one. A waiter dropping its future leaves the others
//! untouched, and once every waiter is gone the load itself is dropped.

use crate::error::SdkError;
use crate::shared::Signature;

use async_lock::Mutex;
use futures_util::future::{BoxFuture, FutureExt, Shared, WeakShared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Default time-to-live, matching the 30 s auto-refresh cadence.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

type Load<V> = BoxFuture<'static, Result<V, SdkError>>;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        now.duration_since(self.fetched_at) < self.ttl
    }
}

struct InFlight<V> {
    id: u64,
    load: WeakShared<Load<V>>,
}

struct CacheInner<V> {
    entries: HashMap<Signature, CacheEntry<V>>,
    in_flight: HashMap<Signature, InFlight<V>>,
    next_id: u64,
}

impl<V> CacheInner<V> {
    /// Drop expired entries and in-flight records no waiter holds anymore.
    fn sweep(&mut self, now: Instant) {
        self.entries.retain(|_, e| e.is_live(now));
        self.in_flight.retain(|_, f| f.load.upgrade().is_some());
    }
}

impl<V> Default for CacheInner<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            in_flight: HashMap::new(),
            next_id: 0,
        }
    }
}

/// Thread-safe coalescing cache. Cloning shares the underlying store.
pub struct AssetCache<V> {
    inner: Arc<Mutex<CacheInner<V>>>,
    ttl: Duration,
}

impl<V> Clone for AssetCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            ttl: self.ttl,
        }
    }
}

impl<V> std::fmt::Debug for AssetCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache").field("ttl", &self.ttl).finish()
    }
}

impl<V> Default for AssetCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<V> AssetCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheInner::default())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the live entry for `signature`, attach to an in-flight load,
    /// or start a new load with `loader`.
    ///
    /// `loader` is only invoked when a new load is started.
    pub async fn get<F, Fut>(&self, signature: &Signature, loader: F) -> Result<V, SdkError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<V, SdkError>> + Send + 'static,
    {
        let load = {
            let mut inner = self.inner.lock().await;
            let now = Instant::now();
            inner.sweep(now);

            if let Some(entry) = inner.entries.get(signature) {
                if entry.is_live(now) {
                    tracing::debug!(signature = %signature, "Cache hit");
                    return Ok(entry.value.clone());
                }
            }

            let attached = inner
                .in_flight
                .get(signature)
                .and_then(|flight| flight.load.upgrade());

            match attached {
                Some(load) => {
                    tracing::debug!(signature = %signature, "Joining in-flight request");
                    load
                }
                None => self.start_load(&mut inner, signature, loader()),
            }
        };

        load.await
    }

    fn start_load<Fut>(
        &self,
        inner: &mut CacheInner<V>,
        signature: &Signature,
        fut: Fut,
    ) -> Shared<Load<V>>
    where
        Fut: Future<Output = Result<V, SdkError>> + Send + 'static,
    {
        let id = inner.next_id;
        inner.next_id += 1;

        let state = self.inner.clone();
        let key = signature.clone();
        let ttl = self.ttl;

        let load: Shared<Load<V>> = async move {
            let result = fut.await;
            let mut inner = state.lock().await;
            if inner.in_flight.get(&key).map(|f| f.id) == Some(id) {
                inner.in_flight.remove(&key);
            }
            if let Ok(value) = &result {
                inner.entries.insert(
                    key,
                    CacheEntry {
                        value: value.clone(),
                        fetched_at: Instant::now(),
                        ttl,
                    },
                );
            }
            result
        }
        .boxed()
        .shared();

        if let Some(weak) = load.downgrade() {
            inner
                .in_flight
                .insert(signature.clone(), InFlight { id, load: weak });
        }
        tracing::debug!(signature = %signature, "Starting request");
        load
    }

    /// Live value for `signature`, without loading.
    pub async fn peek(&self, signature: &Signature) -> Option<V> {
        let inner = self.inner.lock().await;
        let now = Instant::now();
        inner
            .entries
            .get(signature)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone())
    }

    pub async fn contains_live(&self, signature: &Signature) -> bool {
        self.peek(signature).await.is_some()
    }

    /// Drop the entry for `signature` so the next `get` loads fresh data.
    /// An in-flight load for the same signature is left running.
    pub async fn invalidate(&self, signature: &Signature) {
        self.inner.lock().await.entries.remove(signature);
    }

    /// Remove expired entries and abandoned loads. `get` does the same on
    /// every call.
    pub async fn clear_expired(&self) {
        self.inner.lock().await.sweep(Instant::now());
    }

    /// Clear all entries.
    pub async fn clear(&self) {
        self.inner.lock().await.entries.clear();
    }

    /// Number of stored entries (including expired ones not yet evicted).
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    #[cfg(test)]
    async fn in_flight_len(&self) -> usize {
        self.inner.lock().await.in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_loader(
        calls: &Arc<AtomicUsize>,
        value: u32,
        delay: Duration,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<u32, SdkError>> + Send {
        let calls = calls.clone();
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::time::sleep(delay).await;
                Ok(value)
            }
            .boxed()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_gets_coalesce_into_one_load() {
        let cache = AssetCache::<u32>::new(DEFAULT_TTL);
        let calls = Arc::new(AtomicUsize::new(0));
        let sig = Signature::assets(100);

        let (a, b) = tokio::join!(
            cache.get(&sig, counting_loader(&calls, 1, Duration::from_millis(100))),
            cache.get(&sig, counting_loader(&calls, 2, Duration::from_millis(100))),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.unwrap(), 1);
        assert_eq!(b.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_entry_skips_loader() {
        let cache = AssetCache::<u32>::new(DEFAULT_TTL);
        let calls = Arc::new(AtomicUsize::new(0));
        let sig = Signature::asset("bitcoin");

        cache.get(&sig, counting_loader(&calls, 7, Duration::ZERO)).await.unwrap();
        let again = cache.get(&sig, counting_loader(&calls, 8, Duration::ZERO)).await;

        assert_eq!(again.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.peek(&sig).await, Some(7));
        assert!(cache.contains_live(&sig).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_reloads() {
        let cache = AssetCache::<u32>::new(Duration::from_secs(30));
        let calls = Arc::new(AtomicUsize::new(0));
        let sig = Signature::asset("bitcoin");

        cache.get(&sig, counting_loader(&calls, 1, Duration::ZERO)).await.unwrap();
        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(cache.peek(&sig).await, None);

        let fresh = cache.get(&sig, counting_loader(&calls, 2, Duration::ZERO)).await;
        assert_eq!(fresh.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_bypasses_ttl() {
        let cache = AssetCache::<u32>::new(DEFAULT_TTL);
        let calls = Arc::new(AtomicUsize::new(0));
        let sig = Signature::assets(100);

        cache.get(&sig, counting_loader(&calls, 1, Duration::ZERO)).await.unwrap();
        cache.invalidate(&sig).await;
        let fresh = cache.get(&sig, counting_loader(&calls, 2, Duration::ZERO)).await;

        assert_eq!(fresh.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_reaches_every_waiter_and_is_not_cached() {
        let cache = AssetCache::<u32>::new(DEFAULT_TTL);
        let sig = Signature::assets(100);
        let failing = || {
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Err(SdkError::Http(HttpError::Transport("down".into())))
            }
            .boxed()
        };

        let (a, b) = tokio::join!(cache.get(&sig, failing), cache.get(&sig, failing));
        assert!(a.is_err());
        assert_eq!(a, b);
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_waiter_does_not_cancel_others() {
        let cache = AssetCache::<u32>::new(DEFAULT_TTL);
        let calls = Arc::new(AtomicUsize::new(0));
        let sig = Signature::assets(100);

        let survivor = {
            let cache = cache.clone();
            let sig = sig.clone();
            let loader = counting_loader(&calls, 42, Duration::from_millis(200));
            tokio::spawn(async move { cache.get(&sig, loader).await })
        };
        tokio::task::yield_now().await;

        let quitter = tokio::time::timeout(
            Duration::from_millis(50),
            cache.get(&sig, counting_loader(&calls, 99, Duration::from_millis(200))),
        )
        .await;
        assert!(quitter.is_err());

        assert_eq!(survivor.await.unwrap().unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_load_is_restarted() {
        let cache = AssetCache::<u32>::new(DEFAULT_TTL);
        let calls = Arc::new(AtomicUsize::new(0));
        let sig = Signature::assets(100);

        let abandoned = tokio::time::timeout(
            Duration::from_millis(10),
            cache.get(&sig, counting_loader(&calls, 1, Duration::from_secs(1))),
        )
        .await;
        assert!(abandoned.is_err());

        let fresh = cache
            .get(&sig, counting_loader(&calls, 2, Duration::from_millis(10)))
            .await;
        assert_eq!(fresh.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_expired() {
        let cache = AssetCache::<u32>::new(Duration::from_secs(1));
        let calls = Arc::new(AtomicUsize::new(0));

        for (id, value) in [("a", 1), ("b", 2)] {
            cache
                .get(&Signature::asset(id), counting_loader(&calls, value, Duration::ZERO))
                .await
                .unwrap();
        }
        assert_eq!(cache.len().await, 2);

        tokio::time::advance(Duration::from_secs(2)).await;
        cache.clear_expired().await;
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_evicts_expired_entries_of_other_signatures() {
        let cache = AssetCache::<u32>::new(Duration::from_secs(30));
        let calls = Arc::new(AtomicUsize::new(0));

        for i in 0..50 {
            let sig = Signature::search(&format!("query {i}"), 10);
            cache
                .get(&sig, counting_loader(&calls, i, Duration::ZERO))
                .await
                .unwrap();
        }
        assert_eq!(cache.len().await, 50);

        tokio::time::advance(Duration::from_secs(3600)).await;
        let hot = Signature::assets(100);
        cache
            .get(&hot, counting_loader(&calls, 7, Duration::ZERO))
            .await
            .unwrap();

        assert_eq!(cache.len().await, 1);
        assert!(cache.contains_live(&hot).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_loads_do_not_linger() {
        let cache = AssetCache::<u32>::new(DEFAULT_TTL);
        let calls = Arc::new(AtomicUsize::new(0));

        for i in 0..20 {
            let sig = Signature::asset(&format!("coin-{i}"));
            let abandoned = tokio::time::timeout(
                Duration::from_millis(1),
                cache.get(&sig, counting_loader(&calls, i, Duration::from_secs(1))),
            )
            .await;
            assert!(abandoned.is_err());
        }

        cache
            .get(&Signature::assets(100), counting_loader(&calls, 1, Duration::ZERO))
            .await
            .unwrap();
        assert_eq!(cache.in_flight_len().await, 0);
        assert_eq!(cache.len().await, 1);
    }
}
