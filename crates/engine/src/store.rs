//! `ExpenseStore` owns the canonical in-memory list of expenses.
//!
//! The store is a cheap cloneable handle: pass it to every consumer that
//! needs to read or change expenses. All writes go through [`reduce`], and
//! the new collection is swapped in under a single write lock, so readers
//! only ever see a complete collection.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use chrono::{DateTime, TimeZone};

use crate::{
    Action, DateRange, EngineError, Expense, ExpenseData, ExpensePatch, ResultEngine,
    expense::new_expense_id, reducer::reduce, view::RECENT_DAYS,
};

#[derive(Clone, Debug, Default)]
pub struct ExpenseStore {
    expenses: Arc<RwLock<Vec<Expense>>>,
}

impl ExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `action` atomically. On error the collection is unchanged.
    pub fn dispatch(&self, action: Action) -> ResultEngine<()> {
        self.dispatch_checked(action, |_| Ok(()))
    }

    /// Like [`dispatch`](Self::dispatch), running `check` against the current
    /// collection under the same write lock first.
    fn dispatch_checked<F>(&self, action: Action, check: F) -> ResultEngine<()>
    where
        F: FnOnce(&[Expense]) -> ResultEngine<()>,
    {
        let kind = action.kind();
        // The collection is always replaced wholesale, so a poisoned lock
        // still guards a consistent value.
        let mut guard = self.expenses.write().unwrap_or_else(PoisonError::into_inner);
        check(&guard)?;
        match reduce(guard.to_vec(), action) {
            Ok(next) => {
                *guard = next;
                tracing::debug!(action = kind, len = guard.len(), "expense store updated");
                Ok(())
            }
            Err(err) => {
                tracing::debug!(action = kind, %err, "expense store action rejected");
                Err(err)
            }
        }
    }

    /// Add a new expense with a generated id and return the id.
    pub fn add(&self, data: ExpenseData) -> String {
        let id = new_expense_id();
        self.insert(data.into_expense(id.clone()));
        id
    }

    /// Add an expense whose id was assigned elsewhere (e.g. by the backend).
    pub fn insert(&self, expense: Expense) {
        if let Err(err) = self.dispatch(Action::Add(expense)) {
            tracing::error!("add cannot fail, got: {err}");
        }
    }

    /// Replace everything with `expenses` given oldest first.
    ///
    /// The stored collection is newest first, so calling this twice with the
    /// same oldest-first input yields the same result both times.
    pub fn set_all(&self, expenses: Vec<Expense>) {
        if let Err(err) = self.dispatch(Action::SetAll(expenses)) {
            tracing::error!("set_all cannot fail, got: {err}");
        }
    }

    /// Remove the expense with `id`. Unknown ids are ignored.
    pub fn delete(&self, id: &str) {
        if let Err(err) = self.dispatch(Action::Delete(id.to_string())) {
            tracing::error!("delete cannot fail, got: {err}");
        }
    }

    /// Like [`delete`](Self::delete) but reports an unknown id.
    pub fn try_delete(&self, id: &str) -> ResultEngine<()> {
        self.dispatch_checked(Action::Delete(id.to_string()), |expenses| {
            if expenses.iter().any(|e| e.id == id) {
                Ok(())
            } else {
                Err(EngineError::NotFound(id.to_string()))
            }
        })
    }

    /// Merge `patch` into the expense with `id`.
    ///
    /// Returns [`EngineError::NotFound`] for an unknown id, leaving the
    /// collection untouched.
    pub fn update(&self, id: &str, patch: ExpensePatch) -> ResultEngine<()> {
        self.dispatch(Action::Update {
            id: id.to_string(),
            patch,
        })
    }

    /// Current collection, newest first.
    pub fn snapshot(&self) -> Vec<Expense> {
        self.read().to_vec()
    }

    pub fn get(&self, id: &str) -> Option<Expense> {
        self.read().iter().find(|e| e.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn in_range(&self, range: &DateRange) -> Vec<Expense> {
        range.filter(self.read().iter())
    }

    /// Expenses of the last seven days, relative to `now`.
    pub fn recent<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<Expense> {
        self.in_range(&DateRange::last_days(now, RECENT_DAYS))
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Expense>> {
        self.expenses.read().unwrap_or_else(PoisonError::into_inner)
    }
}
