//! Balance aggregation.
//!
//! For each expense the amount is split evenly across its debtors. Every
//! debtor is charged one converted share and the sponsor is credited the full
//! converted amount. A sponsor who is also a debtor therefore nets out their
//! own share arithmetically. Payment records fold in exactly like expenses
//! but are left out of spend totals.

use std::collections::HashSet;

use divvy_shared::types::{CurrencyCode, ParticipantId};
use rust_decimal::Decimal;
use tracing::instrument;

use super::types::Balances;
use crate::currency::{CurrencyNormalizer, RateOracle};
use crate::error::{InvalidExpenseReason, ReconcileError, ReconcileResult};
use crate::expense::{Expense, Participant, validate_expenses};

/// Stateless aggregation over an expense list.
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Folds `expenses` into a balance per participant in `reference`.
    ///
    /// Every roster member appears in the result, with zero if they have no
    /// expenses. A non-empty roster also restricts sponsors and debtors to
    /// its members.
    ///
    /// # Errors
    ///
    /// Returns `InvalidExpense` before any folding if a record is invalid,
    /// `InvalidExpense(AmountOverflow)` if a converted amount or balance
    /// leaves the decimal range, or `RateUnavailable` if a conversion fails.
    /// No partial map is returned.
    #[instrument(skip_all, fields(expenses = expenses.len(), reference = %reference))]
    pub fn aggregate<O: RateOracle + ?Sized>(
        expenses: &[Expense],
        roster: &[Participant],
        reference: &CurrencyCode,
        normalizer: &mut CurrencyNormalizer<'_, O>,
    ) -> ReconcileResult<Balances> {
        let members: HashSet<ParticipantId> = roster.iter().map(|p| p.id).collect();
        let membership = (!members.is_empty()).then_some(&members);
        validate_expenses(expenses, membership)?;

        let mut balances = Balances::new(reference.clone());
        for participant in roster {
            balances.ensure(participant.id);
        }

        for expense in expenses {
            let converted_amount = Self::convert(expense, expense.amount, reference, normalizer)?;
            let converted_share =
                Self::convert(expense, expense.share_per_debtor(), reference, normalizer)?;

            for debtor in &expense.debtors {
                balances
                    .checked_add(*debtor, converted_share)
                    .ok_or_else(|| overflow(expense))?;
            }
            balances
                .checked_add(expense.sponsor, -converted_amount)
                .ok_or_else(|| overflow(expense))?;
        }

        Ok(balances)
    }

    /// Total spend of the group in `reference`, excluding payments.
    ///
    /// # Errors
    ///
    /// Returns `InvalidExpense` or `RateUnavailable`.
    #[instrument(skip_all, fields(expenses = expenses.len(), reference = %reference))]
    pub fn event_total<O: RateOracle + ?Sized>(
        expenses: &[Expense],
        reference: &CurrencyCode,
        normalizer: &mut CurrencyNormalizer<'_, O>,
    ) -> ReconcileResult<Decimal> {
        validate_expenses(expenses, None)?;
        Self::spend_total(expenses, reference, normalizer)
    }

    /// Amount `participant` fronted for the group in `reference`, excluding
    /// payments they made.
    ///
    /// # Errors
    ///
    /// Returns `InvalidExpense` or `RateUnavailable`.
    pub fn participant_spend<O: RateOracle + ?Sized>(
        expenses: &[Expense],
        participant: ParticipantId,
        reference: &CurrencyCode,
        normalizer: &mut CurrencyNormalizer<'_, O>,
    ) -> ReconcileResult<Decimal> {
        validate_expenses(expenses, None)?;
        Self::converted_sum(
            expenses
                .iter()
                .filter(|e| !e.is_payment() && e.sponsor == participant),
            reference,
            normalizer,
        )
    }

    /// [`Self::event_total`] for a list that already passed validation.
    pub(crate) fn spend_total<O: RateOracle + ?Sized>(
        expenses: &[Expense],
        reference: &CurrencyCode,
        normalizer: &mut CurrencyNormalizer<'_, O>,
    ) -> ReconcileResult<Decimal> {
        Self::converted_sum(
            expenses.iter().filter(|e| !e.is_payment()),
            reference,
            normalizer,
        )
    }

    fn converted_sum<'e, O: RateOracle + ?Sized>(
        mut expenses: impl Iterator<Item = &'e Expense>,
        reference: &CurrencyCode,
        normalizer: &mut CurrencyNormalizer<'_, O>,
    ) -> ReconcileResult<Decimal> {
        expenses.try_fold(Decimal::ZERO, |total, expense| {
            let converted = Self::convert(expense, expense.amount, reference, normalizer)?;
            total
                .checked_add(converted)
                .ok_or_else(|| overflow(expense))
        })
    }

    /// Converts part of `expense` into `reference`, blaming the expense for
    /// an overflow.
    fn convert<O: RateOracle + ?Sized>(
        expense: &Expense,
        amount: Decimal,
        reference: &CurrencyCode,
        normalizer: &mut CurrencyNormalizer<'_, O>,
    ) -> ReconcileResult<Decimal> {
        normalizer
            .convert(amount, &expense.currency, reference, expense.date)
            .map_err(|err| match err {
                ReconcileError::ConversionOverflow { .. } => overflow(expense),
                other => other,
            })
    }
}

fn overflow(expense: &Expense) -> ReconcileError {
    ReconcileError::InvalidExpense {
        expense_id: expense.id,
        reason: InvalidExpenseReason::AmountOverflow,
    }
}
