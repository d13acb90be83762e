//! Query facade used by callers.
//!
//! Each call is a fresh run: a new conversion memo, no state kept between
//! calls. Callers own any caching of results.

pub mod service;
pub mod source;

pub use service::{Reconciler, Reconciliation};
pub use source::{ExpenseSource, InMemoryExpenseSource, MissingGroup, snapshot};
