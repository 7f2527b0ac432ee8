//! Pure reducer for expense collection transitions.
//!
//! `reduce` takes the current collection and an [`Action`] and returns the
//! next collection. It has no side effects: the store owns the state and
//! swaps it only when the reducer succeeds.

use std::collections::HashSet;

use crate::{EngineError, Expense, ExpensePatch, ResultEngine};

/// Every mutation the store accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Prepend a new expense (newest first).
    Add(Expense),
    /// Replace the collection with oldest-first input, stored newest first.
    SetAll(Vec<Expense>),
    /// Remove the expense with this id, if present.
    Delete(String),
    /// Merge `patch` into the expense with this id.
    Update { id: String, patch: ExpensePatch },
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::SetAll(_) => "set_all",
            Self::Delete(_) => "delete",
            Self::Update { .. } => "update",
        }
    }
}

/// Compute the next collection.
///
/// `Update` on an unknown id is the only failure; the caller keeps the
/// previous collection in that case.
pub fn reduce(state: Vec<Expense>, action: Action) -> ResultEngine<Vec<Expense>> {
    match action {
        Action::Add(expense) => {
            // Ids are unique: a re-added id replaces the older entry.
            let rest: Vec<Expense> = state.into_iter().filter(|e| e.id != expense.id).collect();
            let mut next = Vec::with_capacity(rest.len() + 1);
            next.push(expense);
            next.extend(rest);
            Ok(next)
        }
        Action::SetAll(mut expenses) => {
            expenses.reverse();
            let mut seen = HashSet::with_capacity(expenses.len());
            let next = expenses
                .into_iter()
                .filter(|e| seen.insert(e.id.clone()))
                .collect();
            Ok(next)
        }
        Action::Delete(id) => Ok(state.into_iter().filter(|e| e.id != id).collect()),
        Action::Update { id, patch } => {
            let mut next = state;
            let target = next
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or(EngineError::NotFound(id))?;
            target.apply(patch);
            Ok(next)
        }
    }
}
