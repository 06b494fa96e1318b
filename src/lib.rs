//! # CoinCap SDK
//!
//! A Rust client for the CoinCap market data API, plus the view pipeline a
//! market dashboard needs on top of it.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core**: Shared newtypes, domain models, formatting, settings (no I/O)
//! 2. **HTTP API**: `CoinCapHttp` over a `Transport` seam with retry + backoff
//! 3. **Caching & timers**: `AssetCache` (TTL + request coalescing),
//!    `PollingScheduler`, `SearchDebouncer`
//! 4. **High-Level Client**: `CoinCapClient` with nested sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coincap_sdk::prelude::*;
//!
//! let client = CoinCapClientBuilder::from_env().build()?;
//!
//! let listing = client.list_assets().await;
//! let rows = client
//!     .assets_view(&Settings::default(), "bit", SortMode::Gainers, 10)
//!     .await;
//! let chart = client.get_history("bitcoin", TimeRange::H24).await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes: signatures, time ranges, currencies, formatting.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, views.
pub mod domain;

/// User settings snapshot and store.
pub mod settings;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
pub mod http;

// ── Layer 3: Caching & timers ────────────────────────────────────────────────

/// TTL cache with request coalescing.
pub mod cache;

/// Polling and debouncing.
pub mod schedule;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `CoinCapClient`: the primary entry point.
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{convert_currency, Currency, Signature, TimeRange};
    pub use crate::shared::fmt::{
        format_axis_label, format_large_number, format_percent, format_price,
    };

    // Domain types: asset
    pub use crate::domain::asset::{
        filter_by_text, sort_by_mode, suggestions, Asset, AssetListing, AssetRow, SortMode,
    };

    // Domain types: price history
    pub use crate::domain::price_history::{resample, HistoryPoint, HistorySeries};

    // Settings
    pub use crate::settings::{MemorySettingsStore, Settings, SettingsStore};

    // Errors
    pub use crate::error::{HttpError, SdkError};

    // Network
    pub use crate::network::DEFAULT_API_URL;

    // Caching + timers
    pub use crate::cache::AssetCache;
    pub use crate::schedule::{PollEvent, PollingScheduler, SearchDebouncer};

    // HTTP client + sub-clients
    pub use crate::client::{
        AssetsClient, CoinCapClient, CoinCapClientBuilder, ListingEvents, PriceHistorySubClient,
    };
    pub use crate::http::retry::{RetryConfig, RetryPolicy};
    pub use crate::http::{RawResponse, Transport, TransportFuture};
}
