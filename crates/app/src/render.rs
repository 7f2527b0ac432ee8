use std::io::{self, Write};

use chrono::TimeZone;
use engine::ExpensesSummary;

/// Print a summary as a plain table, dates shown in `tz`.
pub fn summary<W: Write, Tz: TimeZone>(out: &mut W, summary: &ExpensesSummary, tz: &Tz) -> io::Result<()>
where
    Tz::Offset: std::fmt::Display,
{
    writeln!(out, "{:<12} {:>10}", summary.period.label(), summary.total)?;
    if summary.is_empty() {
        writeln!(out, "{}", summary.period.fallback_text())?;
        return Ok(());
    }
    for expense in &summary.expenses {
        writeln!(
            out,
            "{}  {:>10}  {}  [{}]",
            expense.date.with_timezone(tz).format("%Y-%m-%d"),
            expense.amount,
            expense.description,
            expense.id
        )?;
    }
    Ok(())
}
