//! High-level client: `CoinCapClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, shared cache state, polling, and the
//! flat convenience API.

use crate::cache::{AssetCache, DEFAULT_TTL};
use crate::domain::asset::client::{listing_loader, Assets};
use crate::domain::asset::{Asset, AssetListing, AssetRow, SortMode};
use crate::domain::price_history::client::PriceHistoryClient;
use crate::domain::price_history::{local_offset, HistorySeries};
use crate::error::SdkError;
use crate::http::{CoinCapHttp, ReqwestTransport, RetryConfig, Transport};
use crate::network::{API_KEY_ENV, DEFAULT_API_URL, DEFAULT_ASSET_LIMIT};
use crate::schedule::{PollEvent, PollingScheduler, SearchDebouncer, DEFAULT_QUIET_WINDOW};
use crate::settings::Settings;
use crate::shared::{Signature, TimeRange};

use chrono::FixedOffset;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

// Re-export sub-client types for convenience.
pub use crate::domain::asset::client::Assets as AssetsClient;
pub use crate::domain::price_history::client::PriceHistoryClient as PriceHistorySubClient;

/// Upper bound CoinCap accepts for `limit`.
const MAX_ASSET_LIMIT: u32 = 2000;

/// Receiver for listing updates produced by [`CoinCapClient::start_polling`].
pub type ListingEvents = mpsc::Receiver<PollEvent<Arc<Vec<Asset>>>>;

/// The primary entry point for the SDK.
///
/// Provides nested sub-client accessors (`client.assets()`,
/// `client.price_history()`) and a flat API for the common calls.
/// Cloning is cheap and clones share caches and the polling timer.
pub struct CoinCapClient {
    pub(crate) http: CoinCapHttp,
    /// Listing and server-search results, keyed by signature.
    pub(crate) asset_lists: AssetCache<Arc<Vec<Asset>>>,
    pub(crate) asset_details: AssetCache<Asset>,
    pub(crate) histories: AssetCache<HistorySeries>,
    pub(crate) poller: Arc<PollingScheduler<Arc<Vec<Asset>>>>,
    pub(crate) debouncer: SearchDebouncer,
    pub(crate) asset_limit: u32,
    /// Zone chart labels are rendered in.
    pub(crate) time_offset: FixedOffset,
}

impl CoinCapClient {
    pub fn builder() -> CoinCapClientBuilder {
        CoinCapClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn assets(&self) -> Assets<'_> {
        Assets { client: self }
    }

    pub fn price_history(&self) -> PriceHistoryClient<'_> {
        PriceHistoryClient { client: self }
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    pub(crate) fn listing_signature(&self) -> Signature {
        Signature::assets(self.asset_limit)
    }

    // ── Flat API ─────────────────────────────────────────────────────────

    /// Top-N assets. Never fails: errors land in `AssetListing::error`.
    pub async fn list_assets(&self) -> AssetListing {
        self.assets().listing().await
    }

    pub async fn get_asset(&self, id: &str) -> Result<Asset, SdkError> {
        self.assets().get(id).await
    }

    pub async fn get_history(&self, id: &str, range: TimeRange) -> Result<HistorySeries, SdkError> {
        self.price_history().get(id, range).await
    }

    pub async fn search(&self, query: &str) -> AssetListing {
        self.assets().search(query).await
    }

    pub async fn search_debounced(&self, query: &str) -> Option<AssetListing> {
        self.assets().search_debounced(query).await
    }

    /// Manual refresh: bypasses the TTL and refetches the listing.
    pub async fn refresh(&self) -> AssetListing {
        self.assets().refresh().await
    }

    pub async fn assets_view(
        &self,
        settings: &Settings,
        query: &str,
        mode: SortMode,
        top_n: usize,
    ) -> AssetListing<AssetRow> {
        self.assets().view(settings, query, mode, top_n).await
    }

    // ── Polling ──────────────────────────────────────────────────────────

    /// Poll the listing every `interval`, starting now. Replaces a running
    /// poll; dropping the receiver stops it.
    pub async fn start_polling(&self, interval: Duration) -> ListingEvents {
        self.poller
            .start(self.listing_signature(), listing_loader(self), interval)
            .await
    }

    /// Returns whether a poll was running.
    pub async fn stop_polling(&self) -> bool {
        self.poller.stop(&self.listing_signature()).await
    }

    pub async fn is_polling(&self) -> bool {
        self.poller.is_running(&self.listing_signature()).await
    }

    /// Start or stop polling according to `settings.auto_refresh`.
    pub async fn apply_auto_refresh(
        &self,
        settings: &Settings,
        interval: Duration,
    ) -> Option<ListingEvents> {
        if settings.auto_refresh {
            Some(self.start_polling(interval).await)
        } else {
            self.stop_polling().await;
            None
        }
    }

    /// Clear all caches.
    pub async fn clear_all_caches(&self) {
        self.asset_lists.clear().await;
        self.asset_details.clear().await;
        self.histories.clear().await;
    }
}

impl Clone for CoinCapClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            asset_lists: self.asset_lists.clone(),
            asset_details: self.asset_details.clone(),
            histories: self.histories.clone(),
            poller: self.poller.clone(),
            debouncer: self.debouncer.clone(),
            asset_limit: self.asset_limit,
            time_offset: self.time_offset,
        }
    }
}

impl std::fmt::Debug for CoinCapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinCapClient")
            .field("http", &self.http)
            .field("asset_limit", &self.asset_limit)
            .field("time_offset", &self.time_offset)
            .finish_non_exhaustive()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct CoinCapClientBuilder {
    base_url: String,
    api_key: Option<String>,
    retry: RetryConfig,
    cache_ttl: Duration,
    asset_limit: u32,
    time_offset: Option<FixedOffset>,
    debounce: Duration,
    transport: Option<Arc<dyn Transport>>,
}

impl Default for CoinCapClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            retry: RetryConfig::default(),
            cache_ttl: DEFAULT_TTL,
            asset_limit: DEFAULT_ASSET_LIMIT,
            time_offset: None,
            debounce: DEFAULT_QUIET_WINDOW,
            transport: None,
        }
    }
}

impl CoinCapClientBuilder {
    /// Defaults plus the API key from `COINCAP_API_KEY`, when set.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok();
        Self::default().api_key(api_key)
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Bearer credential. Blank keys are ignored.
    pub fn api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn asset_limit(mut self, limit: u32) -> Self {
        self.asset_limit = limit;
        self
    }

    /// Zone for chart labels. Defaults to the process-local offset.
    pub fn time_zone(mut self, offset: FixedOffset) -> Self {
        self.time_offset = Some(offset);
        self
    }

    pub fn search_debounce(mut self, quiet: Duration) -> Self {
        self.debounce = quiet;
        self
    }

    /// Swap the HTTP transport (defaults to reqwest).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<CoinCapClient, SdkError> {
        if self.base_url.trim().is_empty() {
            return Err(SdkError::Validation("base_url must not be empty".into()));
        }
        if self.asset_limit == 0 || self.asset_limit > MAX_ASSET_LIMIT {
            return Err(SdkError::Validation(format!(
                "asset_limit must be between 1 and {}, got {}",
                MAX_ASSET_LIMIT, self.asset_limit
            )));
        }

        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::new()),
        };
        let asset_lists = AssetCache::new(self.cache_ttl);

        Ok(CoinCapClient {
            http: CoinCapHttp::new(&self.base_url, transport, self.retry, self.api_key),
            poller: Arc::new(PollingScheduler::new(asset_lists.clone())),
            asset_lists,
            asset_details: AssetCache::new(self.cache_ttl),
            histories: AssetCache::new(self.cache_ttl),
            debouncer: SearchDebouncer::new(self.debounce),
            asset_limit: self.asset_limit,
            time_offset: self.time_offset.unwrap_or_else(local_offset),
        })
    }
}
