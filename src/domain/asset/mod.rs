//! Asset domain: asset types, validation, conversion, view derivation.

pub mod client;
mod convert;
pub mod view;
pub mod wire;

use crate::network::ICON_BASE_URL;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use view::{
    filter_by_text, sort_by_mode, suggestions, AssetListing, AssetRow, SortMode,
    DEFAULT_SUGGESTION_LIMIT,
};

// ─── Asset ───────────────────────────────────────────────────────────────────

/// A validated asset snapshot.
///
/// Built fresh on every successful fetch and never mutated afterwards; a new
/// fetch replaces the previous snapshot wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub rank: u32,
    pub symbol: String,
    pub name: String,
    pub price_usd: Decimal,
    pub change_percent_24h: Decimal,
    pub market_cap_usd: Decimal,
    pub volume_usd_24h: Decimal,
    pub supply: Option<Decimal>,
    pub max_supply: Option<Decimal>,
    pub vwap_24h: Option<Decimal>,
    pub explorer: Option<String>,
    /// Derived from the symbol; not authoritative.
    pub icon_url: String,
}

impl Asset {
    pub fn price_f64(&self) -> f64 {
        self.price_usd.to_f64().unwrap_or_default()
    }

    pub fn change_f64(&self) -> f64 {
        self.change_percent_24h.to_f64().unwrap_or_default()
    }

    pub fn market_cap_f64(&self) -> f64 {
        self.market_cap_usd.to_f64().unwrap_or_default()
    }

    pub fn volume_f64(&self) -> f64 {
        self.volume_usd_24h.to_f64().unwrap_or_default()
    }
}

/// Icon URL for a symbol: `{ICON_BASE_URL}/{symbol_lowercase}@2x.png`.
pub fn icon_url(symbol: &str) -> String {
    format!("{}/{}@2x.png", ICON_BASE_URL, symbol.to_lowercase())
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingId,
    MissingSymbol,
    MissingField(&'static str),
    InvalidRank(String),
    InvalidNumber { field: &'static str, value: String },
    Negative { field: &'static str, value: Decimal },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingId => write!(f, "Missing id"),
            ValidationError::MissingSymbol => write!(f, "Missing symbol"),
            ValidationError::MissingField(field) => write!(f, "Missing {}", field),
            ValidationError::InvalidRank(rank) => write!(f, "Invalid rank: {}", rank),
            ValidationError::InvalidNumber { field, value } => {
                write!(f, "Invalid {}: {:?}", field, value)
            }
            ValidationError::Negative { field, value } => {
                write!(f, "Negative {}: {}", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
