//! Wire types for price history (REST).

use crate::shared::serde_util::string_or_number;
use serde::{Deserialize, Serialize};

/// A single history sample as CoinCap sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPointResponse {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub price_usd: String,
    /// Unix timestamp in milliseconds.
    pub time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}
