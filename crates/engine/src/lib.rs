//! In-memory expense state.
//!
//! [`ExpenseStore`] is the single owner of the expense collection. Consumers
//! receive a store handle explicitly and change state only through its
//! operations, each of which is an [`Action`] run through the pure
//! [`reduce`] function.

pub use amount::Amount;
pub use error::EngineError;
pub use expense::{Expense, ExpenseData, ExpensePatch, new_expense_id, parse_date};
pub use ingest::{validate_record, validate_records};
pub use reducer::{Action, reduce};
pub use store::ExpenseStore;
pub use view::{
    DateRange, ExpensesSummary, Period, RECENT_DAYS, date_minus_days, summarize,
};

mod amount;
mod error;
mod expense;
mod ingest;
mod reducer;
mod store;
mod view;

pub type ResultEngine<T> = Result<T, EngineError>;
