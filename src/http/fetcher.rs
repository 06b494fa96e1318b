//! `RetryingFetcher`: one logical GET with bounded retry and linear backoff.
//!
//! Transport-only: a non-2xx status is a failure like any transport error,
//! and the body is handed back untouched. Dropping the returned future
//! cancels the in-flight attempt and any pending backoff, so a cancelled
//! request is never retried.

use crate::error::HttpError;
use crate::http::retry::{RetryConfig, RetryPolicy};
use crate::http::transport::{RawResponse, Transport};

use std::sync::Arc;

#[derive(Clone)]
pub struct RetryingFetcher {
    transport: Arc<dyn Transport>,
    config: RetryConfig,
    /// Bearer credential. NEVER logged.
    api_key: Option<String>,
}

impl RetryingFetcher {
    pub fn new(transport: Arc<dyn Transport>, config: RetryConfig) -> Self {
        Self {
            transport,
            config,
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Fetch with the configured retry envelope.
    pub async fn fetch(&self, url: &str) -> Result<RawResponse, HttpError> {
        self.fetch_with(url, &RetryPolicy::Idempotent).await
    }

    pub async fn fetch_with(
        &self,
        url: &str,
        policy: &RetryPolicy,
    ) -> Result<RawResponse, HttpError> {
        let config = match policy {
            RetryPolicy::None => return self.attempt(url).await,
            RetryPolicy::Idempotent => &self.config,
            RetryPolicy::Custom(c) => c,
        };

        let max = config.attempts();
        let mut attempt = 1;

        loop {
            match self.attempt(url).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max => {
                    let delay = config.delay_after_attempt(attempt);
                    tracing::debug!(
                        attempt,
                        max,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying request to {}",
                        url
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::warn!(attempts = max, error = %e, "Giving up on {}", url);
                    if max == 1 {
                        return Err(e);
                    }
                    return Err(HttpError::MaxRetriesExceeded {
                        attempts: max,
                        last: Box::new(e),
                    });
                }
            }
        }
    }

    async fn attempt(&self, url: &str) -> Result<RawResponse, HttpError> {
        let resp = self.transport.get(url, self.api_key.as_deref()).await?;
        if resp.is_success() {
            Ok(resp)
        } else {
            Err(HttpError::Status {
                status: resp.status,
                body: resp.body,
            })
        }
    }
}

impl std::fmt::Debug for RetryingFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingFetcher")
            .field("config", &self.config)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::transport::TransportFuture;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Replays a fixed script of outcomes and records when each call happened.
    struct Scripted {
        script: Mutex<VecDeque<Result<RawResponse, HttpError>>>,
        calls: Mutex<Vec<(Instant, Option<String>)>>,
    }

    impl Scripted {
        fn new(script: Vec<Result<RawResponse, HttpError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn gaps(&self) -> Vec<Duration> {
            let calls = self.calls.lock().unwrap();
            calls.windows(2).map(|w| w[1].0 - w[0].0).collect()
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl Transport for Scripted {
        fn get<'a>(&'a self, _url: &'a str, bearer: Option<&'a str>) -> TransportFuture<'a> {
            self.calls
                .lock()
                .unwrap()
                .push((Instant::now(), bearer.map(str::to_string)));
            let next = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(HttpError::Transport("script exhausted".into())));
            Box::pin(async move { next })
        }
    }

    fn server_error() -> Result<RawResponse, HttpError> {
        Ok(RawResponse {
            status: 503,
            body: "unavailable".into(),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_fails_twice_then_succeeds_with_linear_backoff() {
        let transport = Scripted::new(vec![
            Err(HttpError::Transport("connection reset".into())),
            server_error(),
            Ok(RawResponse::ok("{\"data\":[]}")),
        ]);
        let fetcher = RetryingFetcher::new(transport.clone(), RetryConfig::default());

        let resp = fetcher.fetch("https://example.test/assets").await.unwrap();

        assert_eq!(resp.body, "{\"data\":[]}");
        assert_eq!(transport.call_count(), 3);
        assert_eq!(
            transport.gaps(),
            vec![Duration::from_millis(1000), Duration::from_millis(2000)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_surface_last_status() {
        let transport = Scripted::new(vec![server_error(), server_error(), server_error()]);
        let fetcher = RetryingFetcher::new(transport.clone(), RetryConfig::default());

        let err = fetcher.fetch("https://example.test/assets").await.unwrap_err();

        assert_eq!(transport.call_count(), 3);
        assert_eq!(err.status(), Some(503));
        assert!(matches!(err, HttpError::MaxRetriesExceeded { attempts: 3, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_policy_none_makes_single_attempt() {
        let transport = Scripted::new(vec![server_error(), Ok(RawResponse::ok("{}"))]);
        let fetcher = RetryingFetcher::new(transport.clone(), RetryConfig::default());

        let err = fetcher
            .fetch_with("https://example.test/assets", &RetryPolicy::None)
            .await
            .unwrap_err();

        assert_eq!(transport.call_count(), 1);
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bearer_is_forwarded_when_configured() {
        let transport = Scripted::new(vec![Ok(RawResponse::ok("{}"))]);
        let fetcher = RetryingFetcher::new(transport.clone(), RetryConfig::default())
            .with_api_key(Some("secret".into()));

        fetcher.fetch("https://example.test/assets").await.unwrap();

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls[0].1.as_deref(), Some("secret"));
        assert!(!format!("{:?}", fetcher).contains("secret"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_future_stops_retrying() {
        let transport = Scripted::new(vec![server_error(), Ok(RawResponse::ok("{}"))]);
        let fetcher = RetryingFetcher::new(transport.clone(), RetryConfig::default());

        let result = tokio::time::timeout(
            Duration::from_millis(500),
            fetcher.fetch("https://example.test/assets"),
        )
        .await;
        assert!(result.is_err());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(transport.call_count(), 1);
    }
}
