//! Display formatting for amounts.
//!
//! Rounding happens here and only here: half-up (away from zero) to the
//! configured number of decimals. Aggregation and minimization never round.

use std::collections::HashMap;

use divvy_shared::EngineConfig;
use divvy_shared::types::CurrencyCode;
use rust_decimal::{Decimal, RoundingStrategy};

/// Renders amounts as `<symbol><amount>` using an explicit symbol table.
#[derive(Debug, Clone)]
pub struct CurrencyFormatter {
    symbols: HashMap<CurrencyCode, String>,
    decimals: u32,
}

impl CurrencyFormatter {
    /// Creates a formatter from a symbol table and a display precision.
    #[must_use]
    pub fn new(symbols: HashMap<CurrencyCode, String>, decimals: u32) -> Self {
        Self { symbols, decimals }
    }

    /// Creates a formatter from engine configuration.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.symbol_table(), config.display_decimals)
    }

    /// Symbol for `currency`, falling back to the code itself.
    #[must_use]
    pub fn symbol<'a>(&'a self, currency: &'a CurrencyCode) -> &'a str {
        self.symbols
            .get(currency)
            .map_or(currency.as_str(), String::as_str)
    }

    /// Rounds half-up to the display precision, keeping trailing zeros.
    #[must_use]
    pub fn round(&self, amount: Decimal) -> Decimal {
        let mut rounded =
            amount.round_dp_with_strategy(self.decimals, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(self.decimals);
        rounded
    }

    /// Formats `amount`, e.g. `€12.35` or `-$3.10`.
    #[must_use]
    pub fn format(&self, amount: Decimal, currency: &CurrencyCode) -> String {
        let rounded = self.round(amount);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}{}{}", self.symbol(currency), rounded.abs())
    }
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
