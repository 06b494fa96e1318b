//! Number formatting utilities for human-readable display.
//!
//! Handles f64 values with thousands separators. Currency-aware formatting
//! lives in the `price` sibling module.

/// Inserts thousands separators into the integer part of an already
/// formatted number. The fractional part is kept as-is.
pub fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };

    let mut parts = unsigned.splitn(2, '.');
    let integer = parts.next().unwrap_or_default();
    let fraction = parts.next();

    let integer_part = integer
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|c| std::str::from_utf8(c).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",");

    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, integer_part, fraction),
        None => format!("{}{}", sign, integer_part),
    }
}

/// Trims trailing fractional zeros but keeps at least `min_decimals` digits.
pub fn trim_fraction(formatted: &str, min_decimals: usize) -> String {
    let Some(dot) = formatted.find('.') else {
        return formatted.to_string();
    };
    let keep_at_least = dot + 1 + min_decimals;
    let trimmed = formatted.trim_end_matches('0');
    let end = trimmed.len().max(keep_at_least).min(formatted.len());
    formatted[..end].trim_end_matches('.').to_string()
}

/// Format an f64 with exactly `decimals` fractional digits and separators.
pub fn display_fixed(amount: f64, decimals: usize) -> String {
    group_thousands(&format!("{:.1$}", amount, decimals))
}

/// Round to the nearest integer and add separators. `-0` renders as `0`.
pub fn display_integer(amount: f64) -> String {
    let rounded = amount.round();
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    group_thousands(&format!("{:.0}", rounded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("123456"), "123,456");
        assert_eq!(group_thousands("1234567.50"), "1,234,567.50");
        assert_eq!(group_thousands("-1234.5"), "-1,234.5");
        assert_eq!(group_thousands("-100"), "-100");
    }

    #[test]
    fn test_trim_fraction_respects_minimum() {
        assert_eq!(trim_fraction("0.000012340", 2), "0.00001234");
        assert_eq!(trim_fraction("0.50000", 2), "0.50");
        assert_eq!(trim_fraction("0.12345", 2), "0.12345");
        assert_eq!(trim_fraction("12", 2), "12");
    }

    #[test]
    fn test_display_fixed_keeps_zeros() {
        assert_eq!(display_fixed(1234.5, 2), "1,234.50");
        assert_eq!(display_fixed(0.0, 2), "0.00");
        assert_eq!(display_fixed(999999.999, 2), "1,000,000.00");
    }

    #[test]
    fn test_display_integer() {
        assert_eq!(display_integer(1234.4), "1,234");
        assert_eq!(display_integer(1234.5), "1,235");
        assert_eq!(display_integer(-0.2), "0");
        assert_eq!(display_integer(184_567.0), "184,567");
    }
}
