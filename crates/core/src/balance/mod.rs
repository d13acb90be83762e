//! Folding expenses into signed per-participant balances.

pub mod aggregator;
pub mod types;

#[cfg(test)]
mod aggregator_props;

pub use aggregator::BalanceAggregator;
pub use types::Balances;
