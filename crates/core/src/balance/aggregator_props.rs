//! Property-based tests for balance aggregation.
//!
//! - Zero-sum: balances of any valid expense set add up to ~0 in any
//!   reference currency
//! - Payments only move balances, never the spend total

use chrono::NaiveDate;
use divvy_shared::types::{CurrencyCode, ParticipantId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::aggregator::BalanceAggregator;
use crate::currency::{CurrencyNormalizer, StaticRateOracle};
use crate::expense::{Expense, ExpenseTag};

const PARTICIPANTS: usize = 5;
const CURRENCIES: [&str; 3] = ["USD", "EUR", "GBP"];

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
}

fn oracle() -> StaticRateOracle {
    StaticRateOracle::new()
        .with_rate("EUR", "USD", day(), Decimal::new(11, 1))
        .and_then(|o| o.with_rate("GBP", "USD", day(), Decimal::new(127, 2)))
        .and_then(|o| o.with_rate("EUR", "GBP", day(), Decimal::new(86, 2)))
        .unwrap()
}

fn participants() -> Vec<ParticipantId> {
    (0..PARTICIPANTS).map(|_| ParticipantId::new()).collect()
}

/// (amount in cents, currency index, sponsor index, debtor indices, is payment)
type RawExpense = (i64, usize, usize, Vec<usize>, bool);

fn raw_expense() -> impl Strategy<Value = RawExpense> {
    (
        0i64..10_000_000,
        0usize..CURRENCIES.len(),
        0usize..PARTICIPANTS,
        prop::sample::subsequence((0..PARTICIPANTS).collect::<Vec<_>>(), 1..=PARTICIPANTS),
        any::<bool>(),
    )
}

fn build(raw: &[RawExpense], people: &[ParticipantId]) -> Vec<Expense> {
    raw.iter()
        .map(|(cents, currency, sponsor, debtors, payment)| {
            let amount = Decimal::new(*cents, 2);
            let currency = CurrencyCode::unchecked(CURRENCIES[*currency]);
            if *payment {
                Expense::payment(people[*sponsor], people[debtors[0]], amount, currency, day())
            } else {
                Expense::new(
                    amount,
                    currency,
                    day(),
                    people[*sponsor],
                    debtors.iter().map(|i| people[*i]),
                    ExpenseTag::category("Misc"),
                )
            }
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* valid expense set and reference currency, the sum of all
    /// balances SHALL be within 1e-4 of zero.
    #[test]
    fn prop_balances_sum_to_zero(
        raw in prop::collection::vec(raw_expense(), 0..30),
        reference in 0usize..CURRENCIES.len(),
    ) {
        let people = participants();
        let expenses = build(&raw, &people);
        let oracle = oracle();
        let mut normalizer = CurrencyNormalizer::new(&oracle);
        let reference = CurrencyCode::unchecked(CURRENCIES[reference]);

        let balances = BalanceAggregator::aggregate(&expenses, &[], &reference, &mut normalizer)
            .unwrap();

        let total = balances.total().unwrap();
        prop_assert!(total.abs() <= Decimal::new(1, 4), "balances sum to {}", total);
    }

    /// *For any* expense set, the event total SHALL equal the sum of the
    /// non-payment amounts (single currency, no conversion involved).
    #[test]
    fn prop_event_total_ignores_payments(
        raw in prop::collection::vec(raw_expense(), 0..30),
    ) {
        let people = participants();
        let raw: Vec<RawExpense> = raw
            .into_iter()
            .map(|(cents, _, sponsor, debtors, payment)| (cents, 0, sponsor, debtors, payment))
            .collect();
        let expenses = build(&raw, &people);
        let oracle = StaticRateOracle::new();
        let mut normalizer = CurrencyNormalizer::new(&oracle);
        let usd = CurrencyCode::unchecked("USD");

        let total = BalanceAggregator::event_total(&expenses, &usd, &mut normalizer).unwrap();

        let expected: Decimal = raw
            .iter()
            .filter(|(_, _, _, _, payment)| !payment)
            .map(|(cents, ..)| Decimal::new(*cents, 2))
            .sum();
        prop_assert_eq!(total, expected);
    }
}
