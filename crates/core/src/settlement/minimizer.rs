//! Greedy settlement planner.

use divvy_shared::types::ParticipantId;
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use crate::balance::Balances;
use crate::error::{ReconcileError, ReconcileResult};
use crate::expense::Transfer;

/// Balances at or below this magnitude count as settled (1e-6).
pub const DEFAULT_SETTLEMENT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

/// Greedy largest-outstanding-first debt minimizer.
#[derive(Debug, Clone, Copy)]
pub struct DebtMinimizer {
    epsilon: Decimal,
}

impl DebtMinimizer {
    /// Creates a minimizer with the given settlement tolerance.
    #[must_use]
    pub const fn new(epsilon: Decimal) -> Self {
        Self { epsilon }
    }

    /// Settlement tolerance in use.
    #[must_use]
    pub const fn epsilon(&self) -> Decimal {
        self.epsilon
    }

    /// Plans the transfers that bring every balance to zero.
    ///
    /// 1. Debtors (balance > epsilon) are sorted owing-most first, creditors
    ///    (balance < -epsilon) owed-most first. Ties keep participant id order.
    /// 2. The head debtor pays the head creditor the smaller of the two
    ///    magnitudes; whoever reaches ~0 leaves its list (both on a tie).
    /// 3. Stops when either list is empty.
    ///
    /// The input map is not modified.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::InconsistentState` if one list still holds
    /// more than `epsilon` per participant when the other runs out, i.e. the
    /// balances did not sum to zero.
    #[instrument(skip_all, fields(participants = balances.len()))]
    pub fn minimize(&self, balances: &Balances) -> ReconcileResult<Vec<Transfer>> {
        let mut debtors: Vec<(ParticipantId, Decimal)> =
            balances.iter().filter(|(_, b)| *b > self.epsilon).collect();
        let mut creditors: Vec<(ParticipantId, Decimal)> =
            balances.iter().filter(|(_, b)| *b < -self.epsilon).collect();

        debtors.sort_by(|a, b| b.1.cmp(&a.1));
        creditors.sort_by(|a, b| a.1.cmp(&b.1));

        let mut transfers = Vec::with_capacity(debtors.len() + creditors.len());
        let (mut d, mut c) = (0, 0);

        while d < debtors.len() && c < creditors.len() {
            let amount = debtors[d].1.min(-creditors[c].1);
            transfers.push(Transfer {
                from: debtors[d].0,
                to: creditors[c].0,
                amount,
            });

            debtors[d].1 -= amount;
            creditors[c].1 += amount;

            if debtors[d].1 <= self.epsilon {
                d += 1;
            }
            if creditors[c].1 >= -self.epsilon {
                c += 1;
            }
        }

        // Every participant left out as settled, or dropped with a residue,
        // carries at most epsilon; anything beyond that is a real imbalance.
        let slack = self.epsilon * Decimal::from(balances.len().max(1));
        let unmatched_debt = debtors[d..]
            .iter()
            .fold(Decimal::ZERO, |sum, (_, b)| sum.saturating_add(*b));
        let unmatched_credit = creditors[c..]
            .iter()
            .fold(Decimal::ZERO, |sum, (_, b)| sum.saturating_sub(*b));
        if unmatched_debt > slack || unmatched_credit > slack {
            warn!(
                %unmatched_debt,
                %unmatched_credit,
                "debtors and creditors did not settle together"
            );
            return Err(ReconcileError::InconsistentState {
                unmatched_debt,
                unmatched_credit,
            });
        }

        debug!(transfers = transfers.len(), "settlement planned");
        Ok(transfers)
    }
}

impl Default for DebtMinimizer {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLEMENT_EPSILON)
    }
}
