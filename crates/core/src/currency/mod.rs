//! Multi-currency handling and exchange rates.
//!
//! - `oracle` - the rate oracle seam and an in-memory implementation
//! - `normalizer` - per-run conversion with a (from, to, date) memo
//! - `cache` - optional cross-run rate cache owned by the caller
//! - `format` - display formatting with a configured symbol table

pub mod cache;
pub mod exchange;
pub mod format;
pub mod normalizer;
pub mod oracle;

#[cfg(test)]
mod normalizer_props;

pub use cache::CachedRateOracle;
pub use exchange::ExchangeRate;
pub use format::CurrencyFormatter;
pub use normalizer::CurrencyNormalizer;
pub use oracle::{RateLookupError, RateOracle, StaticRateOracle};
