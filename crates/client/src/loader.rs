//! Initial load of the expense collection from the backend.

use engine::ExpenseStore;

use crate::service::RemoteExpenseService;

/// Outcome of the initial fetch, surfaced to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loaded { count: usize },
    Failed(String),
}

impl LoadState {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Fetches the collection once and hands it to the store.
///
/// `activate` only issues a request the first time it is called on an
/// instance; later calls return the recorded state. A failed fetch leaves
/// the store untouched and can be re-issued with `retry`.
#[derive(Debug)]
pub struct InitialLoad<S> {
    service: S,
    store: ExpenseStore,
    state: LoadState,
}

impl<S: RemoteExpenseService> InitialLoad<S> {
    pub fn new(service: S, store: ExpenseStore) -> Self {
        Self {
            service,
            store,
            state: LoadState::Idle,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub async fn activate(&mut self) -> &LoadState {
        if self.state == LoadState::Idle {
            self.load().await;
        }
        &self.state
    }

    pub async fn retry(&mut self) -> &LoadState {
        if self.state.is_failed() {
            self.load().await;
        }
        &self.state
    }

    async fn load(&mut self) {
        self.state = match self.service.fetch_all().await {
            Ok(expenses) => {
                let count = expenses.len();
                self.store.set_all(expenses);
                LoadState::Loaded { count }
            }
            Err(err) => {
                tracing::warn!("failed to load expenses: {err}");
                LoadState::Failed(err.to_string())
            }
        };
    }
}
