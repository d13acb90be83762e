//! Participants, expenses, payments and transfers.
//!
//! This module implements the domain records the engine reads:
//! - Participants (identity by id)
//! - Expenses and the Payment-tagged records that offset debt
//! - Transfers recommended by the debt minimizer
//! - Up-front validation of a whole expense list

pub mod types;
pub mod validation;

pub use types::{Expense, ExpenseTag, GroupSnapshot, PAYMENT_TAG, Participant, Transfer};
pub use validation::{validate_expense, validate_expenses};
