//! Cross-run exchange rate caching using Moka.
//!
//! The engine itself keeps nothing between runs. Callers that reconcile many
//! groups against a slow oracle can wrap it in a [`CachedRateOracle`] and
//! share that across runs. Failed lookups are never cached.

use std::time::Duration;

use chrono::NaiveDate;
use divvy_shared::RateCacheConfig;
use divvy_shared::types::CurrencyCode;
use moka::sync::Cache;
use rust_decimal::Decimal;
use tracing::debug;

use super::oracle::{RateKey, RateLookupError, RateOracle};

/// Default cache capacity (number of rates).
const DEFAULT_CACHE_CAPACITY: u64 = 1_000;

/// Default time-to-live for cached rates (1 hour).
const DEFAULT_TTL_SECS: u64 = 3_600;

/// Rate oracle decorator with a bounded, expiring cache.
///
/// Thread-safe and suitable for concurrent runs when the wrapped oracle is.
#[derive(Clone)]
pub struct CachedRateOracle<O> {
    inner: O,
    cache: Cache<RateKey, Decimal>,
}

impl<O: RateOracle> CachedRateOracle<O> {
    /// Wraps `inner` with default settings.
    ///
    /// Default: 1 000 rates max, 1 hour TTL.
    #[must_use]
    pub fn new(inner: O) -> Self {
        Self::with_config(inner, DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Wraps `inner` with custom capacity and TTL.
    #[must_use]
    pub fn with_config(inner: O, max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner, cache }
    }

    /// Wraps `inner` using the engine's rate cache configuration.
    #[must_use]
    pub fn from_config(inner: O, config: &RateCacheConfig) -> Self {
        Self::with_config(inner, config.max_capacity, config.ttl_secs)
    }

    /// Returns the wrapped oracle.
    pub fn inner(&self) -> &O {
        &self.inner
    }

    /// Invalidates all cached rates.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Returns the number of rates currently cached.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs cache maintenance tasks.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl<O: RateOracle> RateOracle for CachedRateOracle<O> {
    fn rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        on: NaiveDate,
    ) -> Result<Decimal, RateLookupError> {
        let key = (from.clone(), to.clone(), on);
        if let Some(rate) = self.cache.get(&key) {
            debug!(%from, %to, date = %on, "rate cache hit");
            return Ok(rate);
        }

        let rate = self.inner.rate(from, to, on)?;
        self.cache.insert(key, rate);
        Ok(rate)
    }
}
