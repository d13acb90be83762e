//! Expense and participant source seam.

use std::collections::HashMap;

use divvy_shared::types::GroupId;
use thiserror::Error;
use tracing::instrument;

use crate::error::{ReconcileError, ReconcileResult};
use crate::expense::{Expense, GroupSnapshot, Participant};

/// Store that owns a group's participants and expenses.
pub trait ExpenseSource {
    /// Failure type of the backing store.
    type Error: std::fmt::Display;

    /// Lists every expense and payment recorded for `group`.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the group cannot be read.
    fn list_expenses(&self, group: GroupId) -> Result<Vec<Expense>, Self::Error>;

    /// Lists the full roster of `group`.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the group cannot be read.
    fn list_participants(&self, group: GroupId) -> Result<Vec<Participant>, Self::Error>;
}

/// Fetches one snapshot of `group` to pass through a whole run.
///
/// # Errors
///
/// Returns `ReconcileError::Source` if either listing fails.
#[instrument(skip(source))]
pub fn snapshot<S: ExpenseSource + ?Sized>(
    source: &S,
    group: GroupId,
) -> ReconcileResult<GroupSnapshot> {
    let participants = source
        .list_participants(group)
        .map_err(|e| ReconcileError::Source(e.to_string()))?;
    let expenses = source
        .list_expenses(group)
        .map_err(|e| ReconcileError::Source(e.to_string()))?;

    Ok(GroupSnapshot {
        group_id: group,
        participants,
        expenses,
    })
}

/// Requested group is not stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Group not found: {0}")]
pub struct MissingGroup(pub GroupId);

/// In-memory source holding whole snapshots.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExpenseSource {
    groups: HashMap<GroupId, GroupSnapshot>,
}

impl InMemoryExpenseSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or replaces a group.
    pub fn insert(&mut self, snapshot: GroupSnapshot) {
        self.groups.insert(snapshot.group_id, snapshot);
    }

    /// Appends an expense to a stored group.
    ///
    /// # Errors
    ///
    /// Returns `MissingGroup` if the group is not stored.
    pub fn record(&mut self, group: GroupId, expense: Expense) -> Result<(), MissingGroup> {
        self.groups
            .get_mut(&group)
            .ok_or(MissingGroup(group))?
            .expenses
            .push(expense);
        Ok(())
    }

    fn group(&self, group: GroupId) -> Result<&GroupSnapshot, MissingGroup> {
        self.groups.get(&group).ok_or(MissingGroup(group))
    }
}

impl ExpenseSource for InMemoryExpenseSource {
    type Error = MissingGroup;

    fn list_expenses(&self, group: GroupId) -> Result<Vec<Expense>, Self::Error> {
        Ok(self.group(group)?.expenses.clone())
    }

    fn list_participants(&self, group: GroupId) -> Result<Vec<Participant>, Self::Error> {
        Ok(self.group(group)?.participants.clone())
    }
}
