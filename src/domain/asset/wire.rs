//! Wire types for asset responses (REST).

use crate::shared::serde_util::{opt_string_or_number, string_or_number};
use serde::{Deserialize, Serialize};

/// Raw asset record as CoinCap sends it. Numerics arrive as decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetResponse {
    pub id: String,
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub rank: String,
    pub symbol: String,
    pub name: String,
    #[serde(default, deserialize_with = "opt_string_or_number::deserialize")]
    pub price_usd: Option<String>,
    #[serde(
        rename = "changePercent24Hr",
        default,
        deserialize_with = "opt_string_or_number::deserialize"
    )]
    pub change_percent_24h: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number::deserialize")]
    pub market_cap_usd: Option<String>,
    #[serde(
        rename = "volumeUsd24Hr",
        default,
        deserialize_with = "opt_string_or_number::deserialize"
    )]
    pub volume_usd_24h: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number::deserialize")]
    pub supply: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number::deserialize")]
    pub max_supply: Option<String>,
    #[serde(
        rename = "vwap24Hr",
        default,
        deserialize_with = "opt_string_or_number::deserialize"
    )]
    pub vwap_24h: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_coincap_record() {
        let json = r#"{
            "id": "bitcoin",
            "rank": "1",
            "symbol": "BTC",
            "name": "Bitcoin",
            "supply": "19700000.0000000000000000",
            "maxSupply": "21000000.0000000000000000",
            "marketCapUsd": "1265000000000.1234",
            "volumeUsd24Hr": "15000000000.5",
            "priceUsd": "64231.9871",
            "changePercent24Hr": "-1.2345",
            "vwap24Hr": "64100.1",
            "explorer": "https://blockchain.info/"
        }"#;
        let resp: AssetResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.rank, "1");
        assert_eq!(resp.change_percent_24h.as_deref(), Some("-1.2345"));
        assert_eq!(resp.volume_usd_24h.as_deref(), Some("15000000000.5"));
        assert_eq!(resp.max_supply.as_deref(), Some("21000000.0000000000000000"));
    }

    #[test]
    fn test_deserialize_numeric_rank_and_nulls() {
        let json = r#"{
            "id": "tether", "rank": 3, "symbol": "USDT", "name": "Tether",
            "priceUsd": "1.0001", "changePercent24Hr": null, "maxSupply": null
        }"#;
        let resp: AssetResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.rank, "3");
        assert_eq!(resp.change_percent_24h, None);
        assert_eq!(resp.market_cap_usd, None);
    }
}
