//! Raw history samples → chart-ready `HistorySeries`.

use super::wire::HistoryPointResponse;
use super::{HistoryPoint, HistorySeries};
use crate::shared::TimeRange;

use chrono::{DateTime, FixedOffset, Local, Offset};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Offset of the process-local zone at the current instant.
pub fn local_offset() -> FixedOffset {
    Local::now().offset().fix()
}

/// Sort, window, dedupe and label raw samples.
///
/// Points outside `[now_ms - window, now_ms]` are dropped. Points sharing a
/// timestamp collapse to the last one seen in `raw`. Samples whose price
/// doesn't parse are skipped.
pub fn resample(
    raw: Vec<HistoryPointResponse>,
    range: TimeRange,
    now_ms: i64,
    offset: FixedOffset,
) -> HistorySeries {
    let start = now_ms - range.window_millis();

    let mut samples: Vec<(i64, Decimal)> = raw
        .into_iter()
        .filter(|p| p.time >= start && p.time <= now_ms)
        .filter_map(|p| match parse_price(&p.price_usd) {
            Some(price) => Some((p.time, price)),
            None => {
                tracing::warn!(time = p.time, price = %p.price_usd, "Skipping history point");
                None
            }
        })
        .collect();

    // Stable sort keeps input order among equal timestamps.
    samples.sort_by_key(|(time, _)| *time);

    let mut points: Vec<HistoryPoint> = Vec::with_capacity(samples.len());
    for (time, price_usd) in samples {
        match points.last_mut() {
            Some(last) if last.time == time => last.price_usd = price_usd,
            _ => points.push(HistoryPoint {
                time,
                price_usd,
                label: label(time, range, &offset),
            }),
        }
    }

    HistorySeries { range, points }
}

fn parse_price(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

fn label(time_ms: i64, range: TimeRange, offset: &FixedOffset) -> String {
    let Some(utc) = DateTime::from_timestamp_millis(time_ms) else {
        return String::new();
    };
    let local = utc.with_timezone(offset);
    match range {
        TimeRange::H24 => local.format("%H:%M").to_string(),
        _ => local.format("%m/%d").to_string(),
    }
}
