//! Per-run currency conversion.
//!
//! A normalizer lives for exactly one reconciliation run. Each distinct
//! (from, to, date) triple reaches the oracle at most once; same-currency
//! conversions never reach it. Converted amounts are not rounded.

use std::collections::HashMap;

use chrono::NaiveDate;
use divvy_shared::types::CurrencyCode;
use rust_decimal::Decimal;
use tracing::debug;

use super::oracle::{RateKey, RateOracle};
use crate::error::{ReconcileError, ReconcileResult};

/// Converts amounts into another currency, memoizing oracle answers.
pub struct CurrencyNormalizer<'a, O: ?Sized> {
    oracle: &'a O,
    memo: HashMap<RateKey, Decimal>,
}

impl<'a, O: RateOracle + ?Sized> CurrencyNormalizer<'a, O> {
    /// Creates a normalizer with an empty memo.
    #[must_use]
    pub fn new(oracle: &'a O) -> Self {
        Self {
            oracle,
            memo: HashMap::new(),
        }
    }

    /// Returns the rate for `from` -> `to` on `on`.
    ///
    /// Identical currencies yield exactly one.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::RateUnavailable` if the oracle fails or
    /// answers with a non-positive rate.
    pub fn rate(
        &mut self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        on: NaiveDate,
    ) -> ReconcileResult<Decimal> {
        if from == to {
            return Ok(Decimal::ONE);
        }

        let key = (from.clone(), to.clone(), on);
        if let Some(rate) = self.memo.get(&key) {
            return Ok(*rate);
        }

        let unavailable = |reason: String| ReconcileError::RateUnavailable {
            from: from.clone(),
            to: to.clone(),
            date: on,
            reason,
        };

        let rate = self
            .oracle
            .rate(from, to, on)
            .map_err(|e| unavailable(e.to_string()))?;
        if rate <= Decimal::ZERO {
            return Err(unavailable(format!("oracle returned non-positive rate {rate}")));
        }

        debug!(%from, %to, date = %on, %rate, "resolved exchange rate");
        self.memo.insert(key, rate);
        Ok(rate)
    }

    /// Converts `amount` from `from` into `to` as of `on`.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::RateUnavailable` if no rate can be resolved,
    /// or `ReconcileError::ConversionOverflow` if the product does not fit.
    pub fn convert(
        &mut self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
        on: NaiveDate,
    ) -> ReconcileResult<Decimal> {
        if from == to {
            return Ok(amount);
        }
        let rate = self.rate(from, to, on)?;
        amount
            .checked_mul(rate)
            .ok_or(ReconcileError::ConversionOverflow { amount, rate })
    }

    /// Number of distinct rates fetched so far in this run.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.memo.len()
    }
}
