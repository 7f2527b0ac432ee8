//! Write-through wrapper around the local store.
//!
//! Each operation reaches the backend first and changes the local
//! collection only once the backend accepted it.

use engine::{EngineError, ExpenseData, ExpensePatch, ExpenseStore};

use crate::{error::Result, service::RemoteExpenseService};

#[derive(Clone, Debug)]
pub struct SyncedStore<S> {
    service: S,
    store: ExpenseStore,
}

impl<S: RemoteExpenseService> SyncedStore<S> {
    pub fn new(service: S, store: ExpenseStore) -> Self {
        Self { service, store }
    }

    pub fn store(&self) -> &ExpenseStore {
        &self.store
    }

    /// Create remotely, then prepend locally under the backend id.
    pub async fn add(&self, data: ExpenseData) -> Result<String> {
        let id = self.service.create(&data).await?;
        self.store.insert(data.into_expense(id.clone()));
        Ok(id)
    }

    pub async fn update(&self, id: &str, patch: ExpensePatch) -> Result<()> {
        let mut merged = self
            .store
            .get(id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        merged.apply(patch.clone());
        self.service.replace(&merged).await?;
        match self.store.update(id, patch) {
            Err(EngineError::NotFound(_)) => {
                // Removed locally while the write was in flight; the backend
                // holds `merged` now, so mirror it.
                tracing::warn!(%id, "expense vanished during update, restoring backend copy");
                self.store.insert(merged);
                Ok(())
            }
            other => other.map_err(Into::into),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.service.remove(id).await?;
        self.store.delete(id);
        Ok(())
    }
}
