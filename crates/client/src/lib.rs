//! Remote side of the expense tracker: the backend service, the initial
//! load that seeds [`engine::ExpenseStore`] and a write-through store.

pub use error::{ClientError, Result};
pub use loader::{InitialLoad, LoadState};
pub use service::{HttpExpenseService, RemoteExpenseService};
pub use synced::SyncedStore;

mod error;
mod loader;
mod service;
mod synced;
