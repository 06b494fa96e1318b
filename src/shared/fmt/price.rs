//! Currency-aware price formatting for dashboard display.
//!
//! All inputs are USD amounts; conversion to the display currency uses the
//! static rates on [`Currency`].

use super::num;
use crate::shared::Currency;

/// Fractional digits shown after the first nonzero fractional digit of a
/// sub-unit price.
const SUB_UNIT_SIGNIFICANT_TAIL: usize = 4;

/// 1-based position of the first nonzero fractional digit: `0.0012` is 3.
fn first_significant_place(value: f64) -> usize {
    let expanded = format!("{:.20}", value.abs());
    let leading_zeros = expanded
        .split('.')
        .nth(1)
        .map(|fraction| fraction.chars().take_while(|c| *c == '0').count())
        .unwrap_or(0);
    leading_zeros + 1
}

/// Format a USD price in the display currency.
///
/// - zero-decimal currencies (JPY) round to an integer: `¥184,567`
/// - positive values below 1.0 keep the first nonzero fractional digit plus
///   four more, trimming trailing zeros down to two places: `$0.00012345`
/// - everything else uses exactly two places: `$1,234.50`
pub fn format_price(amount_usd: f64, currency_code: &str) -> String {
    let currency = Currency::from_code(currency_code);
    let value = currency.convert(amount_usd);
    let symbol = currency.symbol();

    if currency.is_zero_decimal() {
        return format!("{}{}", symbol, num::display_integer(value));
    }

    if value > 0.0 && value < 1.0 {
        let decimals = first_significant_place(value) + SUB_UNIT_SIGNIFICANT_TAIL;
        let formatted = format!("{:.1$}", value, decimals);
        return format!("{}{}", symbol, num::trim_fraction(&formatted, 2));
    }

    format!("{}{}", symbol, num::display_fixed(value, 2))
}

/// Format a market cap or volume: converted, rounded to an integer, grouped.
pub fn format_large_number(amount_usd: f64, currency_code: &str) -> String {
    let currency = Currency::from_code(currency_code);
    format!(
        "{}{}",
        currency.symbol(),
        num::display_integer(currency.convert(amount_usd))
    )
}

/// Compact K/M notation for chart axis labels. `value` is already in the
/// display currency; values below 1,000 fall back to [`format_price`]
/// semantics without re-converting.
pub fn format_axis_label(value: f64, currency_code: &str) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value >= 1_000_000.0 {
        return format!("{:.1}M", value / 1_000_000.0);
    }
    if value >= 1_000.0 {
        return format!("{:.1}K", value / 1_000.0);
    }
    let currency = Currency::from_code(currency_code);
    format_price(value / currency.rate(), currency_code)
}

/// Sign-prefixed percentage with two decimals: `+1.23%`, `-4.50%`.
pub fn format_percent(change: f64) -> String {
    let sign = if change >= 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, change)
}
