//! Exchange rate oracle seam.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use divvy_shared::types::CurrencyCode;
use rust_decimal::Decimal;
use thiserror::Error;

use super::exchange::ExchangeRate;

/// Failure reported by a rate oracle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLookupError {
    /// No rate is known for the pair on that date.
    #[error("no rate known for this currency pair and date")]
    NotFound,

    /// The stored or fetched rate is zero or negative.
    #[error("rate {0} is not positive")]
    InvalidRate(Decimal),

    /// Network or storage failure in the backing service.
    #[error("rate backend failure: {0}")]
    Backend(String),
}

/// Point-in-time exchange rate source.
///
/// The returned rate is the number of `to` units per unit of `from`.
pub trait RateOracle {
    /// Looks up the rate for `from` -> `to` effective on `on`.
    ///
    /// # Errors
    ///
    /// Returns `RateLookupError` if the rate cannot be resolved.
    fn rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        on: NaiveDate,
    ) -> Result<Decimal, RateLookupError>;
}

impl<T: RateOracle + ?Sized> RateOracle for &T {
    fn rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        on: NaiveDate,
    ) -> Result<Decimal, RateLookupError> {
        (**self).rate(from, to, on)
    }
}

impl<T: RateOracle + ?Sized> RateOracle for Arc<T> {
    fn rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        on: NaiveDate,
    ) -> Result<Decimal, RateLookupError> {
        (**self).rate(from, to, on)
    }
}

pub(crate) type RateKey = (CurrencyCode, CurrencyCode, NaiveDate);

/// In-memory rate table keyed by (from, to, date).
///
/// By default a missing pair is answered with the inverse of the opposite
/// pair when that one is known. [`StaticRateOracle::strict`] disables this.
#[derive(Debug, Clone)]
pub struct StaticRateOracle {
    rates: HashMap<RateKey, Decimal>,
    inverse_fallback: bool,
}

impl StaticRateOracle {
    /// Creates an empty table with inverse fallback enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rates: HashMap::new(),
            inverse_fallback: true,
        }
    }

    /// Creates an empty table that only answers pairs stored verbatim.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            rates: HashMap::new(),
            inverse_fallback: false,
        }
    }

    /// Builds a table from rate records.
    ///
    /// # Errors
    ///
    /// Returns `RateLookupError::InvalidRate` for a non-positive rate.
    pub fn from_rates(
        rates: impl IntoIterator<Item = ExchangeRate>,
    ) -> Result<Self, RateLookupError> {
        let mut oracle = Self::new();
        for rate in rates {
            oracle.insert(rate)?;
        }
        Ok(oracle)
    }

    /// Adds or replaces a rate.
    ///
    /// # Errors
    ///
    /// Returns `RateLookupError::InvalidRate` for a non-positive rate.
    pub fn insert(&mut self, rate: ExchangeRate) -> Result<(), RateLookupError> {
        if !rate.is_positive() {
            return Err(RateLookupError::InvalidRate(rate.rate));
        }
        let (key, value) = rate.into_entry();
        self.rates.insert(key, value);
        Ok(())
    }

    /// Builder form of [`StaticRateOracle::insert`].
    ///
    /// # Errors
    ///
    /// Returns `RateLookupError::InvalidRate` for a non-positive rate.
    pub fn with_rate(
        mut self,
        from: &str,
        to: &str,
        on: NaiveDate,
        rate: Decimal,
    ) -> Result<Self, RateLookupError> {
        self.insert(ExchangeRate::new(
            CurrencyCode::unchecked(from),
            CurrencyCode::unchecked(to),
            rate,
            on,
        ))?;
        Ok(self)
    }

    /// Number of stored rates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns true if no rates are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for StaticRateOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl RateOracle for StaticRateOracle {
    fn rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        on: NaiveDate,
    ) -> Result<Decimal, RateLookupError> {
        if let Some(rate) = self.rates.get(&(from.clone(), to.clone(), on)) {
            return Ok(*rate);
        }

        if self.inverse_fallback {
            if let Some(rate) = self.rates.get(&(to.clone(), from.clone(), on)) {
                return Ok(Decimal::ONE / *rate);
            }
        }

        Err(RateLookupError::NotFound)
    }
}
