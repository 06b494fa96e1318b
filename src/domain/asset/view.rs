//! Pure view derivation over an asset snapshot: text filter, sort modes,
//! and display rows.
//!
//! Nothing here holds state. Every function is a function of its inputs.

use super::Asset;
use crate::shared::fmt::{format_large_number, format_percent, format_price};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

// ─── SortMode ────────────────────────────────────────────────────────────────

/// Dashboard tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Ascending rank, untruncated.
    #[default]
    All,
    /// Descending 24h change, top N.
    Gainers,
    /// Ascending 24h change, top N.
    Losers,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "gainers" => Ok(Self::Gainers),
            "losers" => Ok(Self::Losers),
            other => Err(format!("Unknown sort mode: {}", other)),
        }
    }
}

// ─── Filter / sort ───────────────────────────────────────────────────────────

/// Case-insensitive substring match against name or symbol.
/// A blank query returns the input unchanged.
pub fn filter_by_text(assets: &[Asset], query: &str) -> Vec<Asset> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return assets.to_vec();
    }
    assets
        .iter()
        .filter(|a| {
            a.name.to_lowercase().contains(&needle) || a.symbol.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Order by mode. `Gainers`/`Losers` keep the first `top_n`; ties on change
/// break by ascending rank.
pub fn sort_by_mode(assets: &[Asset], mode: SortMode, top_n: usize) -> Vec<Asset> {
    let mut sorted = assets.to_vec();
    match mode {
        SortMode::All => {
            sorted.sort_by_key(|a| a.rank);
        }
        SortMode::Gainers => {
            sorted.sort_by(|a, b| by_change(b, a).then(a.rank.cmp(&b.rank)));
            sorted.truncate(top_n);
        }
        SortMode::Losers => {
            sorted.sort_by(|a, b| by_change(a, b).then(a.rank.cmp(&b.rank)));
            sorted.truncate(top_n);
        }
    }
    sorted
}

fn by_change(a: &Asset, b: &Asset) -> Ordering {
    a.change_percent_24h.cmp(&b.change_percent_24h)
}

pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Search-bar suggestions: filtered, then the first `limit` in input order.
pub fn suggestions(assets: &[Asset], query: &str, limit: usize) -> Vec<Asset> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let mut matched = filter_by_text(assets, query);
    matched.truncate(limit);
    matched
}

// ─── Display rows ────────────────────────────────────────────────────────────

/// One formatted table/grid row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetRow {
    pub id: String,
    pub rank: u32,
    pub symbol: String,
    pub name: String,
    pub icon_url: String,
    pub price: String,
    pub change: String,
    pub is_positive: bool,
    pub market_cap: String,
    pub volume: String,
}

impl AssetRow {
    pub fn new(asset: &Asset, currency_code: &str) -> Self {
        let change = asset.change_f64();
        Self {
            id: asset.id.clone(),
            rank: asset.rank,
            symbol: asset.symbol.clone(),
            name: asset.name.clone(),
            icon_url: asset.icon_url.clone(),
            price: format_price(asset.price_f64(), currency_code),
            change: format_percent(change),
            is_positive: change >= 0.0,
            market_cap: format_large_number(asset.market_cap_f64(), currency_code),
            volume: format_large_number(asset.volume_f64(), currency_code),
        }
    }
}

/// Result of a listing or search that never fails outright: on error the
/// rows are empty and `error` carries a message for a retry affordance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetListing<T = Asset> {
    pub items: Vec<T>,
    pub error: Option<String>,
}

impl<T> AssetListing<T> {
    pub fn ok(items: Vec<T>) -> Self {
        Self { items, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn map<U>(self, f: impl FnOnce(Vec<T>) -> Vec<U>) -> AssetListing<U> {
        AssetListing {
            items: f(self.items),
            error: self.error,
        }
    }
}
