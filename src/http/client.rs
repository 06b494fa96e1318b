//! Low-level HTTP client: `CoinCapHttp`.
//!
//! One method per API endpoint. Unwraps the `{ "data": ... }` envelope and
//! returns wire types (conversion to domain types happens at the client
//! boundary). Internal to the SDK: `CoinCapClient` wraps this.

use crate::domain::asset::wire::AssetResponse;
use crate::domain::price_history::wire::HistoryPointResponse;
use crate::error::SdkError;
use crate::http::fetcher::RetryingFetcher;
use crate::http::retry::{RetryConfig, RetryPolicy};
use crate::http::transport::Transport;
use crate::shared::TimeRange;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Low-level HTTP client for the CoinCap REST API.
#[derive(Debug, Clone)]
pub struct CoinCapHttp {
    base_url: String,
    fetcher: RetryingFetcher,
}

impl CoinCapHttp {
    pub fn new(
        base_url: &str,
        transport: Arc<dyn Transport>,
        retry: RetryConfig,
        api_key: Option<String>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            fetcher: RetryingFetcher::new(transport, retry).with_api_key(api_key),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Assets ───────────────────────────────────────────────────────────

    /// `GET /assets?limit=N`. Records that fail to decode are skipped.
    pub async fn get_assets(&self, limit: u32) -> Result<Vec<AssetResponse>, SdkError> {
        let url = format!("{}/assets?limit={}", self.base_url, limit);
        let data = self.get_data(&url, RetryPolicy::Idempotent).await?;
        decode_records(data, "asset")
    }

    /// `GET /assets?search=Q&limit=N`.
    pub async fn search_assets(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<AssetResponse>, SdkError> {
        let url = format!(
            "{}/assets?search={}&limit={}",
            self.base_url,
            urlencoding::encode(query.trim()),
            limit
        );
        let data = self.get_data(&url, RetryPolicy::Idempotent).await?;
        decode_records(data, "asset")
    }

    /// `GET /assets/{id}`. A 404 or a `null` payload is `NotFound`.
    pub async fn get_asset(&self, id: &str) -> Result<AssetResponse, SdkError> {
        let url = format!("{}/assets/{}", self.base_url, urlencoding::encode(id));
        let data = match self.get_data(&url, RetryPolicy::Idempotent).await {
            Err(e) if e.status() == Some(404) => {
                return Err(SdkError::NotFound(format!("Asset not found: {}", id)))
            }
            other => other?,
        };
        if data.is_null() {
            return Err(SdkError::NotFound(format!("Asset not found: {}", id)));
        }
        serde_json::from_value(data)
            .map_err(|e| SdkError::MalformedResponse(format!("asset {}: {}", id, e)))
    }

    // ── History ──────────────────────────────────────────────────────────

    /// `GET /assets/{id}/history?interval=I&start=S&end=E` for the window
    /// ending at `now_ms`.
    pub async fn get_asset_history(
        &self,
        id: &str,
        range: TimeRange,
        now_ms: i64,
    ) -> Result<Vec<HistoryPointResponse>, SdkError> {
        let (interval, start, end) = range.query_window(now_ms);
        let url = format!(
            "{}/assets/{}/history?interval={}&start={}&end={}",
            self.base_url,
            urlencoding::encode(id),
            interval,
            start,
            end
        );
        let data = match self.get_data(&url, RetryPolicy::Idempotent).await {
            Err(e) if e.status() == Some(404) => {
                return Err(SdkError::NotFound(format!("Asset not found: {}", id)))
            }
            other => other?,
        };
        decode_records(data, "history point")
    }

    // ── Internal ─────────────────────────────────────────────────────────

    async fn get_data(&self, url: &str, retry: RetryPolicy) -> Result<Value, SdkError> {
        let resp = self.fetcher.fetch_with(url, &retry).await?;
        extract_data(&resp.body)
    }
}

/// Pull the `data` member out of a response body.
///
/// A body that is not JSON, or a JSON object without `data`, is malformed.
/// An explicit `"data": null` is returned as `Value::Null`.
pub(crate) fn extract_data(body: &str) -> Result<Value, SdkError> {
    let mut root: Value = serde_json::from_str(body)?;
    match root.get_mut("data") {
        Some(data) => Ok(data.take()),
        None => Err(SdkError::MalformedResponse(
            "response is missing the `data` field".to_string(),
        )),
    }
}

/// Decode an array of records, skipping (and logging) the ones that don't fit.
pub(crate) fn decode_records<T: DeserializeOwned>(
    data: Value,
    what: &str,
) -> Result<Vec<T>, SdkError> {
    let Value::Array(records) = data else {
        return Err(SdkError::MalformedResponse(format!(
            "expected an array of {} records",
            what
        )));
    };

    let mut decoded = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<T>(record) {
            Ok(item) => decoded.push(item),
            Err(e) => tracing::warn!(index, error = %e, "Skipping malformed {} record", what),
        }
    }
    Ok(decoded)
}
