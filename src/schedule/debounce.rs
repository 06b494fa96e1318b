//! `SearchDebouncer`: only the last call inside a quiet window runs.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Quiet window applied to search-as-you-type.
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(300);

/// Debounces async work. Cloning shares the generation counter, so clones
/// supersede each other.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    quiet: Duration,
    generation: Arc<AtomicU64>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_WINDOW)
    }
}

impl SearchDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn quiet_window(&self) -> Duration {
        self.quiet
    }

    /// Wait out the quiet window, then run `work` unless a newer call arrived
    /// in the meantime. Superseded calls resolve to `None` without running.
    pub async fn run<F, Fut, T>(&self, work: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.quiet).await;

        if self.generation.load(Ordering::SeqCst) != ticket {
            tracing::debug!(ticket, "Debounced call superseded");
            return None;
        }
        Some(work().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tokio_test::{assert_pending, assert_ready_eq, task};

    #[tokio::test(start_paused = true)]
    async fn test_only_last_call_in_window_runs() {
        let debouncer = SearchDebouncer::default();
        let runs = Arc::new(AtomicUsize::new(0));

        let call = |query: &'static str| {
            let debouncer = debouncer.clone();
            let runs = runs.clone();
            async move {
                debouncer
                    .run(|| async move {
                        runs.fetch_add(1, Ordering::SeqCst);
                        query
                    })
                    .await
            }
        };

        let typing = async {
            let b = call("b");
            let bi = async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                call("bi").await
            };
            let bit = async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                call("bit").await
            };
            tokio::join!(b, bi, bit)
        };

        let (b, bi, bit) = typing.await;
        assert_eq!(b, None);
        assert_eq!(bi, None);
        assert_eq!(bit, Some("bit"));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_until_quiet_window_elapses() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(300));
        let mut call = task::spawn(debouncer.run(|| async { "done" }));

        assert_pending!(call.poll());
        tokio::time::advance(Duration::from_millis(250)).await;
        assert_pending!(call.poll());
        tokio::time::advance(Duration::from_millis(60)).await;
        assert_ready_eq!(call.poll(), Some("done"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_spaced_beyond_window_all_run() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(300));

        let first = debouncer.run(|| async { 1 }).await;
        tokio::time::sleep(Duration::from_millis(400)).await;
        let second = debouncer.run(|| async { 2 }).await;

        assert_eq!(first, Some(1));
        assert_eq!(second, Some(2));
    }
}
