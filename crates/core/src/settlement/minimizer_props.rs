//! Property-based tests for debt minimization.
//!
//! - Applying every transfer zeroes every balance
//! - No participant pays themselves; every amount is positive
//! - At most one transfer fewer than the number of unsettled participants

use divvy_shared::types::{CurrencyCode, ParticipantId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::minimizer::DebtMinimizer;
use crate::balance::Balances;

/// Strategy for zero-sum balance maps of 1 to 12 participants.
///
/// Amounts carry up to 6 decimals so thirds and converted values show up.
fn zero_sum_balances() -> impl Strategy<Value = Balances> {
    prop::collection::vec(-100_000_000i64..100_000_000i64, 0..12).prop_map(|raw| {
        let mut values: Vec<Decimal> = raw.iter().map(|v| Decimal::new(*v, 6)).collect();
        let sum: Decimal = values.iter().copied().sum();
        values.push(-sum);
        Balances::from_entries(
            CurrencyCode::unchecked("EUR"),
            values.into_iter().map(|v| (ParticipantId::new(), v)),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* zero-sum balances, subtracting each transfer from its payer
    /// and adding it to its receiver SHALL leave every balance at ~0.
    #[test]
    fn prop_transfers_settle_everything(balances in zero_sum_balances()) {
        let minimizer = DebtMinimizer::default();
        let transfers = minimizer.minimize(&balances).unwrap();

        let mut after = balances.clone();
        for transfer in &transfers {
            after.checked_add(transfer.from, -transfer.amount).unwrap();
            after.checked_add(transfer.to, transfer.amount).unwrap();
        }

        prop_assert!(after.is_settled(minimizer.epsilon() * Decimal::from(balances.len().max(1))));
    }

    /// *For any* zero-sum balances, no transfer SHALL go from a participant
    /// to themselves and every amount SHALL be positive.
    #[test]
    fn prop_no_self_transfers(balances in zero_sum_balances()) {
        let transfers = DebtMinimizer::default().minimize(&balances).unwrap();
        for transfer in &transfers {
            prop_assert_ne!(transfer.from, transfer.to);
            prop_assert!(transfer.amount > Decimal::ZERO);
        }
    }

    /// *For any* zero-sum balances with k unsettled participants, the plan
    /// SHALL contain at most k - 1 transfers.
    #[test]
    fn prop_transfer_count_bounded(balances in zero_sum_balances()) {
        let minimizer = DebtMinimizer::default();
        let unsettled = balances
            .iter()
            .filter(|(_, b)| b.abs() > minimizer.epsilon())
            .count();
        let transfers = minimizer.minimize(&balances).unwrap();
        prop_assert!(transfers.len() <= unsettled.saturating_sub(1));
    }

    /// *For any* balances, minimization SHALL be deterministic.
    #[test]
    fn prop_minimize_is_deterministic(balances in zero_sum_balances()) {
        let minimizer = DebtMinimizer::default();
        prop_assert_eq!(
            minimizer.minimize(&balances).unwrap(),
            minimizer.minimize(&balances).unwrap()
        );
    }
}
