//! Reconciliation error types.
//!
//! Every failure of a reconciliation run is reported as a distinct,
//! inspectable value so a caller can tell a retryable oracle outage from
//! bad input or an aggregation defect.

use chrono::NaiveDate;
use divvy_shared::AppError;
use divvy_shared::types::{CurrencyCode, ExpenseId, ParticipantId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using `ReconcileError`.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Why an expense was rejected before aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidExpenseReason {
    /// Amount is below zero.
    #[error("amount {0} is negative")]
    NegativeAmount(Decimal),

    /// No debtor shares the expense.
    #[error("debtor set is empty")]
    EmptyDebtors,

    /// The same participant is listed twice as a debtor.
    #[error("participant {0} is listed as a debtor more than once")]
    DuplicateDebtor(ParticipantId),

    /// Currency code is not a three-letter ISO 4217 code.
    #[error("unknown currency code {0:?}")]
    UnknownCurrency(String),

    /// Sponsor or debtor is not part of the supplied roster.
    #[error("participant {0} is not part of the group")]
    UnknownParticipant(ParticipantId),

    /// Payment-tagged record without exactly one debtor.
    #[error("payment must have exactly one debtor, found {0}")]
    MalformedPayment(usize),

    /// The converted amount, or a running sum that includes it, exceeds the
    /// decimal range.
    #[error("amount exceeds the representable range")]
    AmountOverflow,
}

/// Errors that abort a reconciliation run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The rate oracle could not resolve a conversion.
    #[error("No exchange rate available for {from} to {to} on {date}: {reason}")]
    RateUnavailable {
        /// Source currency code.
        from: CurrencyCode,
        /// Target currency code.
        to: CurrencyCode,
        /// Date for which the rate was requested.
        date: NaiveDate,
        /// Underlying oracle failure.
        reason: String,
    },

    /// An expense failed validation; nothing was aggregated.
    #[error("Invalid expense {expense_id}: {reason}")]
    InvalidExpense {
        /// The rejected expense.
        expense_id: ExpenseId,
        /// What is wrong with it.
        reason: InvalidExpenseReason,
    },

    /// Debtors and creditors did not run out together during minimization.
    #[error(
        "Inconsistent balances: {unmatched_debt} owed and {unmatched_credit} due left unmatched"
    )]
    InconsistentState {
        /// Debt left after all creditors were paid.
        unmatched_debt: Decimal,
        /// Credit left after all debtors paid.
        unmatched_credit: Decimal,
    },

    /// `amount * rate` does not fit the decimal range.
    #[error("Converting {amount} at rate {rate} overflows")]
    ConversionOverflow {
        /// Amount being converted.
        amount: Decimal,
        /// Rate it was multiplied by.
        rate: Decimal,
    },

    /// The expense source failed to return a snapshot.
    #[error("Expense source error: {0}")]
    Source(String),
}

impl ReconcileError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::RateUnavailable { .. } => "RATE_UNAVAILABLE",
            Self::InvalidExpense { .. } => "INVALID_EXPENSE",
            Self::InconsistentState { .. } => "INCONSISTENT_STATE",
            Self::ConversionOverflow { .. } => "CONVERSION_OVERFLOW",
            Self::Source(_) => "SOURCE_ERROR",
        }
    }

    /// Returns true if running the same reconciliation again may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateUnavailable { .. } | Self::Source(_))
    }
}

impl From<ReconcileError> for AppError {
    fn from(err: ReconcileError) -> Self {
        let code = err.error_code();
        let message = err.to_string();
        match err {
            ReconcileError::InvalidExpense { .. } | ReconcileError::ConversionOverflow { .. } => {
                Self::InvalidInput { code, message }
            }
            ReconcileError::RateUnavailable { .. } | ReconcileError::Source(_) => {
                Self::Unavailable { code, message }
            }
            ReconcileError::InconsistentState { .. } => Self::Internal { code, message },
        }
    }
}
