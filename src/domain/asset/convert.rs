//! Conversion: AssetResponse → Asset (TryFrom + validation).

use super::wire::AssetResponse;
use super::{icon_url, Asset, ValidationError};
use rust_decimal::Decimal;
use std::str::FromStr;

fn parse_decimal(field: &'static str, raw: &str) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

fn non_negative(field: &'static str, value: Decimal) -> Result<Decimal, ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(ValidationError::Negative { field, value })
    } else {
        Ok(value)
    }
}

/// Missing or `null` maps to zero; present values must parse.
fn decimal_or_zero(field: &'static str, raw: Option<&str>) -> Result<Decimal, ValidationError> {
    match raw {
        Some(s) => parse_decimal(field, s),
        None => Ok(Decimal::ZERO),
    }
}

/// Optional values that don't parse are dropped rather than failing the record.
fn optional_decimal(field: &'static str, raw: Option<&str>) -> Option<Decimal> {
    raw.and_then(|s| parse_decimal(field, s).ok())
}

impl TryFrom<AssetResponse> for Asset {
    type Error = ValidationError;

    fn try_from(source: AssetResponse) -> Result<Self, Self::Error> {
        if source.id.trim().is_empty() {
            return Err(ValidationError::MissingId);
        }
        if source.symbol.trim().is_empty() {
            return Err(ValidationError::MissingSymbol);
        }

        let rank = source
            .rank
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|r| *r > 0)
            .ok_or_else(|| ValidationError::InvalidRank(source.rank.clone()))?;

        let price_raw = source
            .price_usd
            .as_deref()
            .ok_or(ValidationError::MissingField("priceUsd"))?;
        let price_usd = non_negative("priceUsd", parse_decimal("priceUsd", price_raw)?)?;

        let change_percent_24h =
            decimal_or_zero("changePercent24Hr", source.change_percent_24h.as_deref())?;
        let market_cap_usd = non_negative(
            "marketCapUsd",
            decimal_or_zero("marketCapUsd", source.market_cap_usd.as_deref())?,
        )?;
        let volume_usd_24h = non_negative(
            "volumeUsd24Hr",
            decimal_or_zero("volumeUsd24Hr", source.volume_usd_24h.as_deref())?,
        )?;

        Ok(Asset {
            icon_url: icon_url(&source.symbol),
            id: source.id,
            rank,
            symbol: source.symbol,
            name: source.name,
            price_usd,
            change_percent_24h,
            market_cap_usd,
            volume_usd_24h,
            supply: optional_decimal("supply", source.supply.as_deref()),
            max_supply: optional_decimal("maxSupply", source.max_supply.as_deref()),
            vwap_24h: optional_decimal("vwap24Hr", source.vwap_24h.as_deref()),
            explorer: source.explorer,
        })
    }
}

/// Convert a batch, skipping records that fail validation.
pub(crate) fn convert_batch(records: Vec<AssetResponse>) -> Vec<Asset> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id.clone();
            match Asset::try_from(record) {
                Ok(asset) => Some(asset),
                Err(e) => {
                    tracing::warn!(asset = %id, error = %e, "Skipping invalid asset record");
                    None
                }
            }
        })
        .collect()
}
