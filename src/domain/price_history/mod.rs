//! Price history domain: chart points, resampling, chart helpers.

pub mod client;
pub mod resample;
pub mod wire;

use crate::shared::TimeRange;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use resample::{local_offset, resample};

/// A single chart point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Unix timestamp in milliseconds.
    pub time: i64,
    pub price_usd: Decimal,
    /// Axis label: `HH:MM` for the 24h range, `MM/DD` otherwise.
    pub label: String,
}

impl HistoryPoint {
    pub fn price_f64(&self) -> f64 {
        self.price_usd.to_f64().unwrap_or_default()
    }
}

/// Chart-ready series, strictly ascending by `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySeries {
    pub range: TimeRange,
    pub points: Vec<HistoryPoint>,
}

impl HistorySeries {
    pub fn empty(range: TimeRange) -> Self {
        Self {
            range,
            points: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_price(&self) -> Option<Decimal> {
        self.points.iter().map(|p| p.price_usd).max()
    }

    pub fn min_price(&self) -> Option<Decimal> {
        self.points.iter().map(|p| p.price_usd).min()
    }

    /// Y-axis domain: `(0, max * 1.1)`, or `(0, 0)` when empty.
    pub fn chart_domain(&self) -> (f64, f64) {
        let max = self
            .max_price()
            .and_then(|m| m.to_f64())
            .unwrap_or_default();
        (0.0, max * 1.1)
    }

    /// Percent change from the first to the last point.
    /// `None` for fewer than two points or a zero starting price.
    pub fn change_percent(&self) -> Option<f64> {
        if self.points.len() < 2 {
            return None;
        }
        let first = self.points.first()?.price_usd;
        let last = self.points.last()?.price_usd;
        if first.is_zero() {
            return None;
        }
        ((last - first) / first * Decimal::ONE_HUNDRED).to_f64()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|p| p.label.as_str())
    }
}
