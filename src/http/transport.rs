//! Transport seam: one GET, no retries, no JSON.
//!
//! `ReqwestTransport` is the production implementation. Tests substitute a
//! scripted transport to exercise retry and coalescing behavior offline.

use crate::error::HttpError;

use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Raw HTTP response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<RawResponse, HttpError>> + Send + 'a>>;

/// Issues a single GET request.
pub trait Transport: Send + Sync {
    /// `bearer` is sent as `Authorization: Bearer <token>` when present.
    fn get<'a>(&'a self, url: &'a str, bearer: Option<&'a str>) -> TransportFuture<'a>;
}

/// Production transport backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("coincap-sdk/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    fn get<'a>(&'a self, url: &'a str, bearer: Option<&'a str>) -> TransportFuture<'a> {
        Box::pin(async move {
            let mut req = self.client.get(url);
            if let Some(token) = bearer {
                req = req.bearer_auth(token);
            }

            let resp = req.send().await?;
            let status = resp.status().as_u16();
            let body = resp.text().await?;

            Ok(RawResponse { status, body })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_status(status: u16) -> RawResponse {
        RawResponse {
            status,
            body: String::new(),
        }
    }

    #[test]
    fn test_raw_response_success_range() {
        assert!(RawResponse::ok("{}").is_success());
        assert!(with_status(204).is_success());
        assert!(!with_status(304).is_success());
        assert!(!with_status(503).is_success());
    }
}
