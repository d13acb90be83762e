//! Exchange rate records.

use chrono::NaiveDate;
use divvy_shared::types::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::oracle::RateKey;

/// One published rate: 1 `from_currency` buys `rate` of `to_currency` on
/// `effective_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Source currency code.
    pub from_currency: CurrencyCode,
    /// Target currency code.
    pub to_currency: CurrencyCode,
    /// Units of `to_currency` per unit of `from_currency`.
    pub rate: Decimal,
    /// Date this rate is effective.
    pub effective_date: NaiveDate,
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    #[must_use]
    pub const fn new(
        from_currency: CurrencyCode,
        to_currency: CurrencyCode,
        rate: Decimal,
        effective_date: NaiveDate,
    ) -> Self {
        Self {
            from_currency,
            to_currency,
            rate,
            effective_date,
        }
    }

    /// Only strictly positive rates can convert anything.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.rate > Decimal::ZERO
    }

    pub(crate) fn into_entry(self) -> (RateKey, Decimal) {
        (
            (self.from_currency, self.to_currency, self.effective_date),
            self.rate,
        )
    }
}
