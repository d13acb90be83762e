//! Property-based tests for currency operations.
//!
//! - Same-currency conversion is the identity and never asks the oracle
//! - Conversion equals amount times the oracle rate, unrounded
//! - Display rounding keeps exactly the configured decimals

use chrono::NaiveDate;
use divvy_shared::types::CurrencyCode;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::format::CurrencyFormatter;
use super::normalizer::CurrencyNormalizer;
use super::normalizer::tests::{CountingOracle, FailingOracle};
use super::oracle::StaticRateOracle;

/// Strategy to generate non-negative amounts with up to 4 decimals.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64, 0u32..=4).prop_map(|(units, scale)| Decimal::new(units, scale))
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate three-letter currency codes.
fn currency_code() -> impl Strategy<Value = CurrencyCode> {
    "[A-Z]{3}".prop_map(|s| CurrencyCode::unchecked(&s))
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* amount and currency, converting into the same currency
    /// SHALL return the amount unchanged without consulting the oracle.
    #[test]
    fn prop_same_currency_is_identity(
        amount in amount(),
        currency in currency_code(),
    ) {
        let oracle = CountingOracle::new(FailingOracle);
        let mut normalizer = CurrencyNormalizer::new(&oracle);
        let converted = normalizer.convert(amount, &currency, &currency, day()).unwrap();
        prop_assert_eq!(converted, amount);
        prop_assert_eq!(oracle.calls.get(), 0);
    }

    /// *For any* amount and positive rate, conversion SHALL equal
    /// amount × rate with no rounding applied.
    #[test]
    fn prop_convert_is_amount_times_rate(
        amount in amount(),
        rate in positive_rate(),
    ) {
        let oracle = StaticRateOracle::new().with_rate("EUR", "USD", day(), rate).unwrap();
        let mut normalizer = CurrencyNormalizer::new(&oracle);
        let converted = normalizer
            .convert(amount, &CurrencyCode::unchecked("EUR"), &CurrencyCode::unchecked("USD"), day())
            .unwrap();
        prop_assert_eq!(converted, amount * rate);
    }

    /// *For any* amount, display rounding SHALL yield exactly two decimals
    /// and differ from the input by at most half a cent.
    #[test]
    fn prop_display_rounding_bounded(amount in amount()) {
        let formatter = CurrencyFormatter::default();
        let rounded = formatter.round(amount);
        prop_assert_eq!(rounded.scale(), 2);
        prop_assert!((rounded - amount).abs() <= Decimal::new(5, 3));
    }
}
