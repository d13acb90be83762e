//! Balance map for one reconciliation run.

use std::collections::BTreeMap;

use divvy_shared::types::{CurrencyCode, ParticipantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Signed net balance per participant in one reference currency.
///
/// Positive = the participant owes the group; negative = the group owes the
/// participant. Entries are ordered by participant id so every run over the
/// same input iterates identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    currency: CurrencyCode,
    entries: BTreeMap<ParticipantId, Decimal>,
}

impl Balances {
    /// Creates an empty balance map.
    #[must_use]
    pub fn new(currency: CurrencyCode) -> Self {
        Self {
            currency,
            entries: BTreeMap::new(),
        }
    }

    /// Creates a balance map from known values.
    #[must_use]
    pub fn from_entries(
        currency: CurrencyCode,
        entries: impl IntoIterator<Item = (ParticipantId, Decimal)>,
    ) -> Self {
        Self {
            currency,
            entries: entries.into_iter().collect(),
        }
    }

    /// Reference currency of every value in the map.
    #[must_use]
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Net position of `participant`, zero if absent.
    #[must_use]
    pub fn get(&self, participant: ParticipantId) -> Decimal {
        self.entries
            .get(&participant)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Returns true if `participant` has an entry, even a zero one.
    #[must_use]
    pub fn contains(&self, participant: ParticipantId) -> bool {
        self.entries.contains_key(&participant)
    }

    /// Ensures `participant` has an entry, starting at zero.
    pub fn ensure(&mut self, participant: ParticipantId) {
        self.entries.entry(participant).or_insert(Decimal::ZERO);
    }

    /// Adds `delta` to the balance of `participant` and returns the new value.
    ///
    /// Returns `None` and leaves the map unchanged if the result would
    /// leave the decimal range.
    #[must_use = "an overflowed update is not applied"]
    pub fn checked_add(&mut self, participant: ParticipantId, delta: Decimal) -> Option<Decimal> {
        let entry = self.entries.entry(participant).or_insert(Decimal::ZERO);
        let updated = entry.checked_add(delta)?;
        *entry = updated;
        Some(updated)
    }

    /// Iterates entries in participant id order.
    pub fn iter(&self) -> impl Iterator<Item = (ParticipantId, Decimal)> + '_ {
        self.entries.iter().map(|(id, balance)| (*id, *balance))
    }

    /// Number of participants in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no participants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all balances. Zero (within tolerance) for a consistent group;
    /// `None` if an intermediate sum leaves the decimal range.
    #[must_use]
    pub fn total(&self) -> Option<Decimal> {
        self.entries
            .values()
            .try_fold(Decimal::ZERO, |sum, b| sum.checked_add(*b))
    }

    /// Returns true if every balance is within `epsilon` of zero.
    #[must_use]
    pub fn is_settled(&self, epsilon: Decimal) -> bool {
        self.entries.values().all(|b| b.abs() <= epsilon)
    }
}
