mod config;
mod error;
mod render;

use std::io::Write;

use chrono::Utc;
use engine::{Amount, EngineError, ExpenseData, ExpensePatch, ExpenseStore, Period, parse_date, summarize};
use expense_client::{HttpExpenseService, InitialLoad, LoadState, SyncedStore};

use crate::{
    config::Command,
    error::{AppError, Result},
};

#[tokio::main]
async fn main() -> Result<()> {
    let (config, command) = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "expenses={level},expense_client={level},engine={level}",
            level = config.log_level
        ))
        .with_writer(std::io::stderr)
        .init();

    let tz = config.tz()?;
    let service = HttpExpenseService::new(&config.base_url, config.timeout())?;
    let store = ExpenseStore::new();

    // Every command starts from the backend's current collection.
    let mut load = InitialLoad::new(service.clone(), store.clone());
    if let LoadState::Failed(message) = load.activate().await {
        return Err(AppError::Load(message.clone()));
    }
    let synced = SyncedStore::new(service, store.clone());

    let mut out = std::io::stdout().lock();
    match command {
        Command::Recent => {
            let now = Utc::now().with_timezone(&tz);
            let summary = summarize(Period::Recent, store.recent(&now));
            render::summary(&mut out, &summary, &tz)?;
        }
        Command::All => {
            let summary = summarize(Period::All, store.snapshot());
            render::summary(&mut out, &summary, &tz)?;
        }
        Command::Add {
            description,
            amount,
            date,
        } => {
            let amount = positive_amount(&amount)?;
            let date = match date {
                Some(raw) => parse_date(&raw)?,
                None => Utc::now(),
            };
            let id = synced
                .add(ExpenseData::new(description, amount, date))
                .await?;
            tracing::info!(%id, "expense added");
            writeln!(out, "{id}")?;
        }
        Command::Edit {
            id,
            description,
            amount,
            date,
        } => {
            let patch = ExpensePatch {
                description,
                amount: amount.as_deref().map(positive_amount).transpose()?,
                date: date.map(|raw| parse_date(&raw)).transpose()?,
            };
            if patch.is_empty() {
                return Err(AppError::EmptyEdit);
            }
            synced.update(&id, patch).await?;
            tracing::info!(%id, "expense updated");
        }
        Command::Delete { id } => {
            // Unknown ids are a silent no-op locally; say so on the terminal.
            if store.get(&id).is_none() {
                tracing::warn!(%id, "no such expense");
            }
            synced.delete(&id).await?;
        }
    }

    Ok(())
}

fn positive_amount(raw: &str) -> std::result::Result<Amount, EngineError> {
    let amount: Amount = raw.parse()?;
    if amount.is_zero() {
        return Err(EngineError::InvalidAmount("amount must be > 0".to_string()));
    }
    Ok(amount)
}
