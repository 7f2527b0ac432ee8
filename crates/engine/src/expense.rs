//! The `Expense` record and the payloads used to create or edit it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Amount, EngineError, ResultEngine};

/// A single expense entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Assigned by the backend or generated locally, stable for the record's
    /// lifetime.
    pub id: String,
    pub description: String,
    pub amount: Amount,
    pub date: DateTime<Utc>,
}

impl Expense {
    /// Shallow merge: fields present in `patch` overwrite, the rest is kept.
    pub fn apply(&mut self, patch: ExpensePatch) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }
}

/// Data for a new expense, before an id is assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseData {
    pub description: String,
    pub amount: Amount,
    pub date: DateTime<Utc>,
}

impl ExpenseData {
    pub fn new(description: impl Into<String>, amount: Amount, date: DateTime<Utc>) -> Self {
        Self {
            description: description.into(),
            amount,
            date,
        }
    }

    pub fn into_expense(self, id: impl Into<String>) -> Expense {
        Expense {
            id: id.into(),
            description: self.description,
            amount: self.amount,
            date: self.date,
        }
    }
}

/// Partial update for an existing expense.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpensePatch {
    pub description: Option<String>,
    pub amount: Option<Amount>,
    pub date: Option<DateTime<Utc>>,
}

impl ExpensePatch {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.amount.is_none() && self.date.is_none()
    }
}

/// Generate a fresh id for a locally created expense.
pub fn new_expense_id() -> String {
    Uuid::new_v4().to_string()
}

/// Parse a date coming from the wire or from user input.
///
/// Accepts RFC3339 timestamps (any offset, normalized to UTC), ISO-8601
/// timestamps with a `+hhmm` offset, timestamps without an offset (read as
/// UTC, `T` or space separated) and plain `YYYY-MM-DD` dates, which map to
/// midnight UTC. The whole input must match one of these forms.
pub fn parse_date(raw: &str) -> ResultEngine<DateTime<Utc>> {
    const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];
    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| EngineError::InvalidDate(format!("unrecognized date '{raw}'")))
}
