//! Assets sub-client: listing, lookup, search, view rows.

use crate::client::CoinCapClient;
use crate::domain::asset::convert::convert_batch;
use crate::domain::asset::view::{
    filter_by_text, sort_by_mode, suggestions, AssetListing, AssetRow, SortMode,
};
use crate::domain::asset::{Asset, ValidationError};
use crate::error::SdkError;
use crate::schedule::PollLoader;
use crate::settings::Settings;
use crate::shared::Signature;

use futures_util::FutureExt;
use std::sync::Arc;

/// Loader for the top-N listing, shared by `Assets::list` and the poller.
pub(crate) fn listing_loader(client: &CoinCapClient) -> PollLoader<Arc<Vec<Asset>>> {
    let http = client.http.clone();
    let limit = client.asset_limit;
    Arc::new(move || {
        let http = http.clone();
        async move {
            let records = http.get_assets(limit).await?;
            Ok(Arc::new(convert_batch(records)))
        }
        .boxed()
    })
}

/// Sub-client for asset operations.
pub struct Assets<'a> {
    pub(crate) client: &'a CoinCapClient,
}

impl<'a> Assets<'a> {
    /// Top-N assets by rank. Uses the TTL cache; overlapping calls (and
    /// polling ticks) share one request.
    pub async fn list(&self) -> Result<Arc<Vec<Asset>>, SdkError> {
        let loader = listing_loader(self.client);
        self.client
            .asset_lists
            .get(&self.client.listing_signature(), move || loader())
            .await
    }

    /// Like [`list`](Self::list), but a failure yields an empty listing
    /// carrying the error message.
    pub async fn listing(&self) -> AssetListing {
        match self.list().await {
            Ok(assets) => AssetListing::ok(assets.as_ref().clone()),
            Err(e) => {
                tracing::warn!(error = %e, "Asset listing failed");
                AssetListing::failed(e.to_string())
            }
        }
    }

    /// Single asset by id. A 404 or `null` payload is `SdkError::NotFound`; a
    /// record that fails validation is `SdkError::MalformedResponse`.
    pub async fn get(&self, id: &str) -> Result<Asset, SdkError> {
        let http = self.client.http.clone();
        let asset_id = id.to_string();
        self.client
            .asset_details
            .get(&Signature::asset(id), move || async move {
                let record = http.get_asset(&asset_id).await?;
                Asset::try_from(record)
                    .map_err(|e: ValidationError| SdkError::MalformedResponse(e.to_string()))
            })
            .await
    }

    /// Filter the cached listing by name or symbol.
    pub async fn search(&self, query: &str) -> AssetListing {
        let listing = self.listing().await;
        listing.map(|assets| filter_by_text(&assets, query))
    }

    /// [`search`](Self::search) behind the debouncer. `None` when a newer
    /// call arrived inside the quiet window.
    pub async fn search_debounced(&self, query: &str) -> Option<AssetListing> {
        self.client.debouncer.run(|| self.search(query)).await
    }

    /// Server-side search (`GET /assets?search=`), cached per query.
    pub async fn search_remote(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Arc<Vec<Asset>>, SdkError> {
        let http = self.client.http.clone();
        let needle = query.trim().to_string();
        self.client
            .asset_lists
            .get(&Signature::search(query, limit), move || async move {
                let records = http.search_assets(&needle, limit).await?;
                Ok(Arc::new(convert_batch(records)))
            })
            .await
    }

    /// Search-bar suggestions from the cached listing.
    pub async fn suggestions(&self, query: &str, limit: usize) -> Vec<Asset> {
        match self.list().await {
            Ok(assets) => suggestions(&assets, query, limit),
            Err(e) => {
                tracing::warn!(error = %e, "Asset suggestions unavailable");
                Vec::new()
            }
        }
    }

    /// Filtered, sorted and formatted rows for the given settings snapshot.
    pub async fn view(
        &self,
        settings: &Settings,
        query: &str,
        mode: SortMode,
        top_n: usize,
    ) -> AssetListing<AssetRow> {
        let currency = settings.currency.code();
        self.search(query).await.map(|assets| {
            sort_by_mode(&assets, mode, top_n)
                .iter()
                .map(|asset| AssetRow::new(asset, currency))
                .collect()
        })
    }

    /// Drop the cached listing and fetch it again.
    pub async fn refresh(&self) -> AssetListing {
        let loader = listing_loader(self.client);
        match self
            .client
            .poller
            .refresh_now(&self.client.listing_signature(), loader)
            .await
        {
            Ok(assets) => AssetListing::ok(assets.as_ref().clone()),
            Err(e) => {
                tracing::warn!(error = %e, "Asset refresh failed");
                AssetListing::failed(e.to_string())
            }
        }
    }

    /// Invalidate the cached entry for one asset.
    pub async fn invalidate(&self, id: &str) {
        self.client
            .asset_details
            .invalidate(&Signature::asset(id))
            .await;
    }
}
