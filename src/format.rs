//! Display formatting for metric values and timestamps.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::warn;

/// Format a value for display with up to 3 decimal places.
///
/// Rounding is pinned to midpoint-away-from-zero, so `-0.0005` renders as
/// `-0.001`. Trailing zeros and a trailing decimal point are stripped, and
/// integral values render with no decimal point at all.
pub fn format_number(value: f64) -> String {
    let d = Decimal::from_f64_retain(value).unwrap_or(dec!(0));
    let d = d.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero);
    d.normalize().to_string()
}

/// Reformat a `YYYYMMDDHHMMSS` timestamp to `YYYY-MM-DD HH:MM:SS`.
///
/// Anything that is not exactly 14 digits is logged and passed through
/// verbatim rather than aborting the render.
pub fn format_timestamp(raw: &str) -> String {
    if raw.len() != 14 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        warn!("invalid timestamp '{raw}', expected YYYYMMDDHHMMSS");
        return raw.to_string();
    }
    format!(
        "{}-{}-{} {}:{}:{}",
        &raw[..4],
        &raw[4..6],
        &raw[6..8],
        &raw[8..10],
        &raw[10..12],
        &raw[12..14]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_values_drop_the_decimal_point() {
        assert_eq!(format_number(2.000), "2");
        assert_eq!(format_number(15.0), "15");
        assert_eq!(format_number(1650.0), "1650");
        assert_eq!(format_number(-3.0), "-3");
    }

    #[test]
    fn trailing_zeros_are_stripped() {
        assert_eq!(format_number(2.1200), "2.12");
        assert_eq!(format_number(0.5), "0.5");
    }

    #[test]
    fn rounds_midpoints_away_from_zero_at_three_decimals() {
        assert_eq!(format_number(-0.0005), "-0.001");
        assert_eq!(format_number(0.0005), "0.001");
        assert_eq!(format_number(1.23456), "1.235");
    }

    #[test]
    fn well_formed_timestamp_is_reformatted() {
        assert_eq!(format_timestamp("20250608222135"), "2025-06-08 22:21:35");
    }

    #[test]
    fn malformed_timestamp_passes_through() {
        assert_eq!(format_timestamp("2025"), "2025");
        assert_eq!(format_timestamp("2025060822213500"), "2025060822213500");
        assert_eq!(format_timestamp("20250608-22135"), "20250608-22135");
        assert_eq!(format_timestamp(""), "");
    }
}
