//! Boundary validation for records fetched from the backend.
//!
//! Records missing required fields are rejected here so they never enter
//! the store.

use api_types::expense::ExpenseRecord;

use crate::{Amount, EngineError, Expense, ResultEngine, expense::parse_date};

/// Convert one wire record into an [`Expense`].
pub fn validate_record(record: ExpenseRecord) -> ResultEngine<Expense> {
    let id = record
        .id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| EngineError::MalformedRecord("missing id".to_string()))?;
    let malformed = |what: &str| EngineError::MalformedRecord(format!("expense {id}: {what}"));

    let description = record
        .description
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| malformed("missing description"))?;
    let amount = record
        .amount
        .ok_or_else(|| malformed("missing amount"))
        .and_then(|raw| Amount::from_major(raw).map_err(|err| malformed(&err.to_string())))?;
    let date = record
        .date
        .ok_or_else(|| malformed("missing date"))
        .and_then(|raw| parse_date(&raw).map_err(|err| malformed(&err.to_string())))?;

    Ok(Expense {
        id,
        description,
        amount,
        date,
    })
}

/// Validate a whole fetch result. One bad record rejects the batch, so the
/// store is either fully replaced or left alone.
pub fn validate_records(records: Vec<ExpenseRecord>) -> ResultEngine<Vec<Expense>> {
    records.into_iter().map(validate_record).collect()
}
