//! Debt minimization.
//!
//! Turns a balance map into an ordered list of transfers using a greedy
//! largest-outstanding-first matching. The result is short but not always
//! the global minimum; the greedy order is part of the observable output.

pub mod minimizer;

#[cfg(test)]
mod minimizer_props;

pub use minimizer::{DEFAULT_SETTLEMENT_EPSILON, DebtMinimizer};
