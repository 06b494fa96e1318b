//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the strings the backend and the persisted settings use.

pub mod fmt;
pub mod serde_util;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── Signature ───────────────────────────────────────────────────────────────

/// Cache and coalescing key: endpoint plus parameters (e.g. `"assets/bitcoin"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(String);

impl Signature {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `assets?limit=N`
    pub fn assets(limit: u32) -> Self {
        Self(format!("assets?limit={}", limit))
    }

    /// `assets/{id}`
    pub fn asset(id: &str) -> Self {
        Self(format!("assets/{}", id))
    }

    /// `assets?search=Q&limit=N`. The query is lowercased so case variants share a key.
    pub fn search(query: &str, limit: u32) -> Self {
        Self(format!(
            "assets?search={}&limit={}",
            query.trim().to_lowercase(),
            limit
        ))
    }

    /// `assets/{id}/history?range=R`. Keyed by range, not by the start/end instants.
    pub fn history(id: &str, range: TimeRange) -> Self {
        Self(format!("assets/{}/history?range={}", id, range.as_str()))
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Signature {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Signature {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ─── TimeRange ───────────────────────────────────────────────────────────────

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Chart time range. Each range maps to exactly one upstream sample interval
/// and one look-back window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeRange {
    H24,
    D7,
    #[default]
    D30,
    D90,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [Self::H24, Self::D7, Self::D30, Self::D90];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::H24 => "24h",
            Self::D7 => "7d",
            Self::D30 => "30d",
            Self::D90 => "90d",
        }
    }

    /// Upstream `interval` query value.
    pub fn interval(&self) -> &'static str {
        match self {
            Self::H24 => "m30",
            Self::D7 => "h6",
            Self::D30 | Self::D90 => "d1",
        }
    }

    /// Look-back window in milliseconds.
    pub fn window_millis(&self) -> i64 {
        match self {
            Self::H24 => DAY_MS,
            Self::D7 => 7 * DAY_MS,
            Self::D30 => 30 * DAY_MS,
            Self::D90 => 90 * DAY_MS,
        }
    }

    /// `(interval, start, end)` query triple for a window ending at `now_ms`.
    pub fn query_window(&self, now_ms: i64) -> (&'static str, i64, i64) {
        (self.interval(), now_ms - self.window_millis(), now_ms)
    }

    /// Parse, falling back to the default range (`30d`) for unknown input.
    pub fn parse_lossy(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "24h" => Ok(Self::H24),
            "7d" => Ok(Self::D7),
            "30d" => Ok(Self::D30),
            "90d" => Ok(Self::D90),
            other => Err(format!("Unknown time range: {}", other)),
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for TimeRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TimeRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(TimeRange::parse_lossy(&s))
    }
}

// ─── Currency ────────────────────────────────────────────────────────────────

/// Display currency. Rates against USD are static.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
}

impl Currency {
    /// Look up a currency code (case-insensitive). Unknown codes map to USD.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "eur" => Self::Eur,
            "gbp" => Self::Gbp,
            "jpy" => Self::Jpy,
            _ => Self::Usd,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "usd",
            Self::Eur => "eur",
            Self::Gbp => "gbp",
            Self::Jpy => "jpy",
        }
    }

    /// Units of this currency per one USD.
    pub fn rate(&self) -> f64 {
        match self {
            Self::Usd => 1.0,
            Self::Eur => 0.91,
            Self::Gbp => 0.79,
            Self::Jpy => 149.5,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Gbp => "£",
            Self::Jpy => "¥",
        }
    }

    /// Currencies displayed without a fractional part.
    pub fn is_zero_decimal(&self) -> bool {
        matches!(self, Self::Jpy)
    }

    pub fn convert(&self, amount_usd: f64) -> f64 {
        amount_usd * self.rate()
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for Currency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Currency::from_code(&s))
    }
}

/// Multiply a USD amount by the static rate for `currency_code`.
/// Unknown codes fall back to USD (rate 1); this never fails.
pub fn convert_currency(amount_usd: f64, currency_code: &str) -> f64 {
    Currency::from_code(currency_code).convert(amount_usd)
}
