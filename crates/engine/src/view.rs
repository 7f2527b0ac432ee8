//! Derived read views over the expense collection.

use chrono::{DateTime, Days, TimeZone, Utc};
use serde::Serialize;

use crate::{Amount, Expense};

/// Width of the "recent expenses" window, in days.
pub const RECENT_DAYS: u64 = 7;

/// Closed date interval: both `start` and `end` are included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// From midnight `days` calendar days before `now` up to `now`.
    pub fn last_days<Tz: TimeZone>(now: &DateTime<Tz>, days: u64) -> Self {
        Self {
            start: date_minus_days(now, days),
            end: now.with_timezone(&Utc),
        }
    }

    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        *date >= self.start && *date <= self.end
    }

    /// Keep the expenses dated inside the range, preserving their order.
    pub fn filter<'a, I>(&self, expenses: I) -> Vec<Expense>
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        expenses
            .into_iter()
            .filter(|e| self.contains(&e.date))
            .cloned()
            .collect()
    }
}

/// Midnight (in `now`'s time zone) of the calendar day `days` before `now`.
pub fn date_minus_days<Tz: TimeZone>(now: &DateTime<Tz>, days: u64) -> DateTime<Utc> {
    let Some(day) = now.date_naive().checked_sub_days(Days::new(days)) else {
        return DateTime::<Utc>::MIN_UTC;
    };
    let midnight = day.and_time(chrono::NaiveTime::MIN);
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        // Midnight skipped by a DST change: fall back to the UTC reading.
        .unwrap_or_else(|| midnight.and_utc())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Recent,
    All,
}

impl Period {
    pub fn label(self) -> &'static str {
        match self {
            Self::Recent => "Last 7 Days",
            Self::All => "Total",
        }
    }

    /// Text shown when the period holds no expense.
    pub fn fallback_text(self) -> &'static str {
        match self {
            Self::Recent => "No expenses registered for last 7 days.",
            Self::All => "No registered expenses found!",
        }
    }
}

/// What a list screen shows: the period, its expenses and their sum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExpensesSummary {
    pub period: Period,
    pub expenses: Vec<Expense>,
    pub total: Amount,
}

impl ExpensesSummary {
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}

pub fn summarize(period: Period, expenses: Vec<Expense>) -> ExpensesSummary {
    let total = expenses.iter().map(|e| e.amount).sum();
    ExpensesSummary {
        period,
        expenses,
        total,
    }
}
