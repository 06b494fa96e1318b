//! Price history sub-client: cached, resampled chart series.

use crate::client::CoinCapClient;
use crate::domain::price_history::{resample, HistorySeries};
use crate::error::SdkError;
use crate::shared::{Signature, TimeRange};

/// Sub-client for price history operations.
pub struct PriceHistoryClient<'a> {
    pub(crate) client: &'a CoinCapClient,
}

impl<'a> PriceHistoryClient<'a> {
    /// Chart series for `id` over `range`. Uses the TTL cache; concurrent
    /// calls for the same asset and range share one request.
    pub async fn get(&self, id: &str, range: TimeRange) -> Result<HistorySeries, SdkError> {
        let http = self.client.http.clone();
        let offset = self.client.time_offset;
        let asset_id = id.to_string();

        self.client
            .histories
            .get(&Signature::history(id, range), move || async move {
                let now_ms = chrono::Utc::now().timestamp_millis();
                let raw = http.get_asset_history(&asset_id, range, now_ms).await?;
                Ok(resample(raw, range, now_ms, offset))
            })
            .await
    }

    /// Drop the cached series so the next `get` refetches.
    pub async fn invalidate(&self, id: &str, range: TimeRange) {
        self.client
            .histories
            .invalidate(&Signature::history(id, range))
            .await;
    }
}
