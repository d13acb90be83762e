//! Reconciliation entry points.

use std::collections::BTreeMap;

use divvy_shared::types::{CurrencyCode, GroupId, Money, ParticipantId};
use divvy_shared::{EngineConfig, EngineConfigError};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument};

use super::source::{ExpenseSource, snapshot};
use crate::balance::{BalanceAggregator, Balances};
use crate::currency::{CurrencyNormalizer, RateOracle};
use crate::error::ReconcileResult;
use crate::expense::{Expense, GroupSnapshot, Participant, Transfer};
use crate::settlement::DebtMinimizer;

/// Outcome of one full run over a group snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    /// Net position of every participant.
    pub balances: Balances,
    /// Settling transfers in display order.
    pub transfers: Vec<Transfer>,
    /// Group spend excluding payments.
    pub total: Money,
}

impl Reconciliation {
    /// Returns true when nobody needs to pay anybody.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Transfers touching `participant`, per counterpart.
    ///
    /// Positive: `participant` pays the counterpart. Negative: the
    /// counterpart pays `participant`.
    #[must_use]
    pub fn transfers_for(&self, participant: ParticipantId) -> BTreeMap<ParticipantId, Decimal> {
        signed_by_counterpart(&self.transfers, participant)
    }
}

/// Facade over aggregation and minimization for one reference currency.
///
/// Holds configuration only. Every call starts a fresh run with its own
/// conversion memo, so a `Reconciler` can be shared between threads whenever
/// the oracle can.
pub struct Reconciler<'o, O: ?Sized> {
    oracle: &'o O,
    reference: CurrencyCode,
    minimizer: DebtMinimizer,
}

impl<'o, O: RateOracle + ?Sized> Reconciler<'o, O> {
    /// Creates a reconciler with the default settlement tolerance.
    #[must_use]
    pub fn new(oracle: &'o O, reference: CurrencyCode) -> Self {
        Self {
            oracle,
            reference,
            minimizer: DebtMinimizer::default(),
        }
    }

    /// Creates a reconciler from validated engine configuration.
    ///
    /// # Errors
    ///
    /// Returns `EngineConfigError::Invalid` if the configuration is invalid.
    pub fn from_config(oracle: &'o O, config: &EngineConfig) -> Result<Self, EngineConfigError> {
        config.validate()?;
        Ok(Self {
            oracle,
            reference: config.reference_currency()?,
            minimizer: DebtMinimizer::new(config.settlement_epsilon),
        })
    }

    /// Overrides the settlement tolerance.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: Decimal) -> Self {
        self.minimizer = DebtMinimizer::new(epsilon);
        self
    }

    /// Currency every result is expressed in.
    #[must_use]
    pub fn reference_currency(&self) -> &CurrencyCode {
        &self.reference
    }

    /// Total group spend, excluding payments.
    ///
    /// # Errors
    ///
    /// Returns `InvalidExpense` or `RateUnavailable`.
    pub fn event_total(&self, expenses: &[Expense]) -> ReconcileResult<Money> {
        let mut normalizer = CurrencyNormalizer::new(self.oracle);
        let total = BalanceAggregator::event_total(expenses, &self.reference, &mut normalizer)?;
        Ok(Money::new(total, self.reference.clone()))
    }

    /// What `participant` fronted for the group, excluding payments.
    ///
    /// # Errors
    ///
    /// Returns `InvalidExpense` or `RateUnavailable`.
    pub fn participant_spend(
        &self,
        expenses: &[Expense],
        participant: ParticipantId,
    ) -> ReconcileResult<Money> {
        let mut normalizer = CurrencyNormalizer::new(self.oracle);
        let spend = BalanceAggregator::participant_spend(
            expenses,
            participant,
            &self.reference,
            &mut normalizer,
        )?;
        Ok(Money::new(spend, self.reference.clone()))
    }

    /// Net balance of every participant. Pass the full roster to include
    /// members without expenses; pass `&[]` to skip roster checks.
    ///
    /// # Errors
    ///
    /// Returns `InvalidExpense` or `RateUnavailable`.
    pub fn balances(
        &self,
        expenses: &[Expense],
        roster: &[Participant],
    ) -> ReconcileResult<Balances> {
        let mut normalizer = CurrencyNormalizer::new(self.oracle);
        BalanceAggregator::aggregate(expenses, roster, &self.reference, &mut normalizer)
    }

    /// Net position of `participant`, zero if absent.
    #[must_use]
    pub fn net_position(balances: &Balances, participant: ParticipantId) -> Decimal {
        balances.get(participant)
    }

    /// Full settlement plan.
    ///
    /// # Errors
    ///
    /// Returns `InconsistentState` if the balances do not sum to zero.
    pub fn settlement_plan(&self, balances: &Balances) -> ReconcileResult<Vec<Transfer>> {
        self.minimizer.minimize(balances)
    }

    /// Settlement plan restricted to `participant`, per counterpart.
    ///
    /// Positive: `participant` must pay the counterpart. Negative: the
    /// counterpart must pay `participant`.
    ///
    /// # Errors
    ///
    /// Returns `InconsistentState` if the balances do not sum to zero.
    pub fn settlement_plan_for(
        &self,
        balances: &Balances,
        participant: ParticipantId,
    ) -> ReconcileResult<BTreeMap<ParticipantId, Decimal>> {
        let transfers = self.minimizer.minimize(balances)?;
        Ok(signed_by_counterpart(&transfers, participant))
    }

    /// Runs validate, aggregate and minimize once over a snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first `ReconcileError` of the run; nothing partial.
    #[instrument(skip_all, fields(group = %snapshot.group_id, reference = %self.reference))]
    pub fn reconcile(&self, snapshot: &GroupSnapshot) -> ReconcileResult<Reconciliation> {
        let mut normalizer = CurrencyNormalizer::new(self.oracle);
        let balances = BalanceAggregator::aggregate(
            &snapshot.expenses,
            &snapshot.participants,
            &self.reference,
            &mut normalizer,
        )?;
        let total =
            BalanceAggregator::spend_total(&snapshot.expenses, &self.reference, &mut normalizer)?;
        let transfers = self.minimizer.minimize(&balances)?;

        info!(
            expenses = snapshot.expenses.len(),
            participants = snapshot.participants.len(),
            transfers = transfers.len(),
            rate_lookups = normalizer.lookups(),
            "reconciliation complete"
        );

        Ok(Reconciliation {
            balances,
            transfers,
            total: Money::new(total, self.reference.clone()),
        })
    }

    /// Fetches one snapshot of `group` from `source` and reconciles it.
    ///
    /// # Errors
    ///
    /// Returns `Source` if the fetch fails, otherwise as [`Self::reconcile`].
    pub fn reconcile_group<S: ExpenseSource + ?Sized>(
        &self,
        source: &S,
        group: GroupId,
    ) -> ReconcileResult<Reconciliation> {
        let snapshot = snapshot(source, group)?;
        self.reconcile(&snapshot)
    }
}

fn signed_by_counterpart(
    transfers: &[Transfer],
    participant: ParticipantId,
) -> BTreeMap<ParticipantId, Decimal> {
    let mut view = BTreeMap::new();
    for transfer in transfers {
        if transfer.from == participant {
            *view.entry(transfer.to).or_insert(Decimal::ZERO) += transfer.amount;
        } else if transfer.to == participant {
            *view.entry(transfer.from).or_insert(Decimal::ZERO) -= transfer.amount;
        }
    }
    view
}
