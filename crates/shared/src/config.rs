//! Engine configuration management.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::types::CurrencyCode;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum EngineConfigError {
    /// Configuration sources could not be read or deserialized.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A configured value is out of range or malformed.
    #[error("Invalid configuration value for {key}: {reason}")]
    Invalid {
        /// Configuration key.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Reconciliation engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Currency all balances and totals are expressed in.
    #[serde(default = "default_reference_currency")]
    pub reference_currency: String,
    /// Balances whose magnitude is at or below this value count as settled.
    #[serde(default = "default_settlement_epsilon")]
    pub settlement_epsilon: Decimal,
    /// Decimal places used when rendering amounts for display.
    #[serde(default = "default_display_decimals")]
    pub display_decimals: u32,
    /// Display symbol per currency code. Unlisted codes render as the code.
    #[serde(default = "default_currency_symbols")]
    pub currency_symbols: HashMap<String, String>,
    /// Cross-run exchange rate cache settings.
    #[serde(default)]
    pub rate_cache: RateCacheConfig,
}

/// Exchange rate cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RateCacheConfig {
    /// Maximum number of cached rates.
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,
    /// Time-to-live of a cached rate in seconds.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

fn default_reference_currency() -> String {
    "EUR".to_string()
}

fn default_settlement_epsilon() -> Decimal {
    Decimal::new(1, 6)
}

fn default_display_decimals() -> u32 {
    2
}

fn default_currency_symbols() -> HashMap<String, String> {
    [("EUR", "€"), ("USD", "$"), ("GBP", "£"), ("JPY", "¥"), ("CHF", "CHF")]
        .into_iter()
        .map(|(code, symbol)| (code.to_string(), symbol.to_string()))
        .collect()
}

fn default_cache_capacity() -> u64 {
    1_000
}

fn default_cache_ttl() -> u64 {
    3_600 // 1 hour
}

impl Default for RateCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_currency: default_reference_currency(),
            settlement_epsilon: default_settlement_epsilon(),
            display_decimals: default_display_decimals(),
            currency_symbols: default_currency_symbols(),
            rate_cache: RateCacheConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from config files and environment.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, then `DIVVY__*` variables
    /// (e.g. `DIVVY__REFERENCE_CURRENCY=USD`, `DIVVY__RATE_CACHE__TTL_SECS=60`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or fails validation.
    pub fn load() -> Result<Self, EngineConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("DIVVY").separator("__"))
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Checks value ranges and currency codes.
    ///
    /// # Errors
    ///
    /// Returns `EngineConfigError::Invalid` naming the offending key.
    pub fn validate(&self) -> Result<(), EngineConfigError> {
        CurrencyCode::from_str(&self.reference_currency).map_err(|e| {
            EngineConfigError::Invalid {
                key: "reference_currency",
                reason: e.to_string(),
            }
        })?;

        if self.settlement_epsilon <= Decimal::ZERO || self.settlement_epsilon >= Decimal::ONE {
            return Err(EngineConfigError::Invalid {
                key: "settlement_epsilon",
                reason: format!("must be in (0, 1), got {}", self.settlement_epsilon),
            });
        }

        if self.display_decimals > 8 {
            return Err(EngineConfigError::Invalid {
                key: "display_decimals",
                reason: format!("at most 8 supported, got {}", self.display_decimals),
            });
        }

        if let Some(code) = self
            .currency_symbols
            .keys()
            .find(|code| CurrencyCode::from_str(code).is_err())
        {
            return Err(EngineConfigError::Invalid {
                key: "currency_symbols",
                reason: format!("malformed currency code {code:?}"),
            });
        }

        Ok(())
    }

    /// Returns the reference currency as a parsed code.
    ///
    /// # Errors
    ///
    /// Returns `EngineConfigError::Invalid` if the configured code is malformed.
    pub fn reference_currency(&self) -> Result<CurrencyCode, EngineConfigError> {
        CurrencyCode::from_str(&self.reference_currency).map_err(|e| EngineConfigError::Invalid {
            key: "reference_currency",
            reason: e.to_string(),
        })
    }

    /// Returns the symbol table keyed by normalized currency code.
    #[must_use]
    pub fn symbol_table(&self) -> HashMap<CurrencyCode, String> {
        self.currency_symbols
            .iter()
            .map(|(code, symbol)| (CurrencyCode::unchecked(code), symbol.clone()))
            .collect()
    }
}
