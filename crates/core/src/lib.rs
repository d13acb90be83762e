//! Debt reconciliation engine for divvy.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! It turns a group's multi-currency expense records into per-participant net
//! balances and a short list of settling transfers.
//!
//! # Modules
//!
//! - `currency` - Rate oracles, in-run conversion memo, display formatting
//! - `expense` - Participants, expenses, payments, transfers and validation
//! - `balance` - Folding expenses into signed per-participant balances
//! - `settlement` - Greedy largest-outstanding-first debt minimization
//! - `reconcile` - Query facade used by callers
//!
//! Sign convention: a positive balance means the participant owes the group,
//! a negative balance means the group owes the participant.

pub mod balance;
pub mod currency;
pub mod error;
pub mod expense;
pub mod reconcile;
pub mod settlement;

pub use balance::{BalanceAggregator, Balances};
pub use currency::{
    CachedRateOracle, CurrencyFormatter, CurrencyNormalizer, RateLookupError, RateOracle,
    StaticRateOracle,
};
pub use error::{InvalidExpenseReason, ReconcileError, ReconcileResult};
pub use expense::{Expense, ExpenseTag, GroupSnapshot, Participant, Transfer};
pub use reconcile::{ExpenseSource, Reconciler, Reconciliation};
pub use settlement::DebtMinimizer;
