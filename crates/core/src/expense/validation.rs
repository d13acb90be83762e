//! Up-front validation of expense records.
//!
//! The whole list is checked before any conversion or folding happens, so a
//! caller gets one clear error instead of a partially built balance map.

use std::collections::HashSet;

use divvy_shared::types::ParticipantId;
use rust_decimal::Decimal;

use super::types::Expense;
use crate::error::{InvalidExpenseReason, ReconcileError};

/// Validates every expense, reporting the first invalid one in input order.
///
/// When `roster` is given, sponsors and debtors must be members of it.
///
/// # Errors
///
/// Returns `ReconcileError::InvalidExpense` for the first failing record.
pub fn validate_expenses(
    expenses: &[Expense],
    roster: Option<&HashSet<ParticipantId>>,
) -> Result<(), ReconcileError> {
    expenses
        .iter()
        .try_for_each(|expense| validate_expense(expense, roster))
}

/// Validates a single expense.
///
/// # Errors
///
/// Returns `ReconcileError::InvalidExpense` naming the reason.
pub fn validate_expense(
    expense: &Expense,
    roster: Option<&HashSet<ParticipantId>>,
) -> Result<(), ReconcileError> {
    check(expense, roster).map_err(|reason| ReconcileError::InvalidExpense {
        expense_id: expense.id,
        reason,
    })
}

fn check(
    expense: &Expense,
    roster: Option<&HashSet<ParticipantId>>,
) -> Result<(), InvalidExpenseReason> {
    if expense.amount < Decimal::ZERO {
        return Err(InvalidExpenseReason::NegativeAmount(expense.amount));
    }

    if !expense.currency.is_well_formed() {
        return Err(InvalidExpenseReason::UnknownCurrency(
            expense.currency.to_string(),
        ));
    }

    if expense.debtors.is_empty() {
        return Err(InvalidExpenseReason::EmptyDebtors);
    }

    if expense.is_payment() && expense.debtors.len() != 1 {
        return Err(InvalidExpenseReason::MalformedPayment(expense.debtors.len()));
    }

    let mut seen = HashSet::with_capacity(expense.debtors.len());
    if let Some(duplicate) = expense.debtors.iter().find(|id| !seen.insert(**id)) {
        return Err(InvalidExpenseReason::DuplicateDebtor(*duplicate));
    }

    if let Some(roster) = roster {
        if let Some(unknown) = std::iter::once(&expense.sponsor)
            .chain(&expense.debtors)
            .find(|id| !roster.contains(*id))
        {
            return Err(InvalidExpenseReason::UnknownParticipant(*unknown));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::ExpenseTag;
    use chrono::NaiveDate;
    use divvy_shared::types::CurrencyCode;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn make_expense(amount: Decimal, currency: &str, debtors: Vec<ParticipantId>) -> Expense {
        Expense::new(
            amount,
            CurrencyCode::unchecked(currency),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ParticipantId::new(),
            debtors,
            ExpenseTag::category("Food"),
        )
    }

    fn reason_of(result: Result<(), ReconcileError>) -> InvalidExpenseReason {
        match result {
            Err(ReconcileError::InvalidExpense { reason, .. }) => reason,
            other => panic!("expected InvalidExpense, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_expense() {
        let expense = make_expense(dec!(10), "USD", vec![ParticipantId::new()]);
        assert!(validate_expense(&expense, None).is_ok());
    }

    #[test]
    fn test_zero_amount_is_valid() {
        let expense = make_expense(Decimal::ZERO, "USD", vec![ParticipantId::new()]);
        assert!(validate_expense(&expense, None).is_ok());
    }

    #[test]
    fn test_negative_amount() {
        let expense = make_expense(dec!(-0.01), "USD", vec![ParticipantId::new()]);
        assert_eq!(
            reason_of(validate_expense(&expense, None)),
            InvalidExpenseReason::NegativeAmount(dec!(-0.01))
        );
    }

    #[rstest]
    #[case("")]
    #[case("EURO")]
    #[case("E1R")]
    fn test_unknown_currency(#[case] code: &str) {
        let expense = make_expense(dec!(5), code, vec![ParticipantId::new()]);
        assert!(matches!(
            reason_of(validate_expense(&expense, None)),
            InvalidExpenseReason::UnknownCurrency(_)
        ));
    }

    #[test]
    fn test_empty_debtors() {
        let expense = make_expense(dec!(5), "USD", vec![]);
        assert_eq!(
            reason_of(validate_expense(&expense, None)),
            InvalidExpenseReason::EmptyDebtors
        );
    }

    #[test]
    fn test_duplicate_debtor() {
        let debtor = ParticipantId::new();
        let expense = make_expense(dec!(5), "USD", vec![debtor, ParticipantId::new(), debtor]);
        assert_eq!(
            reason_of(validate_expense(&expense, None)),
            InvalidExpenseReason::DuplicateDebtor(debtor)
        );
    }

    #[test]
    fn test_payment_with_two_debtors() {
        let mut expense = make_expense(
            dec!(5),
            "USD",
            vec![ParticipantId::new(), ParticipantId::new()],
        );
        expense.tag = ExpenseTag::Payment;
        assert_eq!(
            reason_of(validate_expense(&expense, None)),
            InvalidExpenseReason::MalformedPayment(2)
        );
    }

    #[test]
    fn test_roster_membership() {
        let debtor = ParticipantId::new();
        let expense = make_expense(dec!(5), "USD", vec![debtor]);

        let roster: HashSet<_> = [expense.sponsor].into_iter().collect();
        assert_eq!(
            reason_of(validate_expense(&expense, Some(&roster))),
            InvalidExpenseReason::UnknownParticipant(debtor)
        );

        let roster: HashSet<_> = [expense.sponsor, debtor].into_iter().collect();
        assert!(validate_expense(&expense, Some(&roster)).is_ok());
    }

    #[test]
    fn test_reports_first_invalid_in_order() {
        let good = make_expense(dec!(5), "USD", vec![ParticipantId::new()]);
        let first_bad = make_expense(dec!(-1), "USD", vec![ParticipantId::new()]);
        let second_bad = make_expense(dec!(5), "USD", vec![]);
        let result = validate_expenses(&[good, first_bad.clone(), second_bad], None);
        assert!(matches!(
            result,
            Err(ReconcileError::InvalidExpense { expense_id, .. }) if expense_id == first_bad.id
        ));
    }
}
