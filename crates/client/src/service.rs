use std::{future::Future, time::Duration};

use api_types::expense::{ExpenseBody, ExpenseCreated, ExpenseListResponse};
use chrono::{DateTime, SecondsFormat, Utc};
use engine::{Amount, EngineError, Expense, ExpenseData, validate_records};
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ClientError, Result};

/// Backend holding the expenses.
///
/// `fetch_all` returns validated expenses oldest first, the order
/// [`engine::ExpenseStore::set_all`] expects.
pub trait RemoteExpenseService {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<Expense>>> + Send;

    /// Store a new expense and return the id the backend assigned.
    fn create(&self, data: &ExpenseData) -> impl Future<Output = Result<String>> + Send;

    /// Overwrite the stored expense with the same id.
    fn replace(&self, expense: &Expense) -> impl Future<Output = Result<()>> + Send;

    fn remove(&self, id: &str) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// JSON-over-HTTP backend.
///
/// Layout: `GET|POST {base}/expenses.json` for the collection and
/// `PUT|DELETE {base}/expenses/{id}.json` for a single record.
#[derive(Clone, Debug)]
pub struct HttpExpenseService {
    base_url: Url,
    http: Client,
}

impl HttpExpenseService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|err| ClientError::InvalidUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!("{base_url} cannot be a base")));
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    fn collection_url(&self) -> Result<Url> {
        self.url(&["expenses.json"])
    }

    fn record_url(&self, id: &str) -> Result<Url> {
        self.url(&["expenses", &format!("{id}.json")])
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let res = request.send().await?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let message = match res.text().await {
            Ok(text) => serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text),
            Err(_) => "server error".to_string(),
        };
        Err(ClientError::Server { status, message })
    }
}

fn body_for(description: &str, amount: Amount, date: DateTime<Utc>) -> ExpenseBody {
    ExpenseBody {
        description: description.to_string(),
        amount: amount.to_major(),
        date: date.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

impl RemoteExpenseService for HttpExpenseService {
    async fn fetch_all(&self) -> Result<Vec<Expense>> {
        let url = self.collection_url()?;
        tracing::debug!(%url, "fetching expenses");
        let res = self.send(self.http.get(url)).await?;
        let body = res.json::<Value>().await?;
        let records = ExpenseListResponse::try_from(body)
            .map_err(EngineError::MalformedRecord)?
            .into_records();
        let expenses = validate_records(records)?;
        tracing::info!(count = expenses.len(), "fetched expenses");
        Ok(expenses)
    }

    async fn create(&self, data: &ExpenseData) -> Result<String> {
        let url = self.collection_url()?;
        let body = body_for(&data.description, data.amount, data.date);
        let res = self.send(self.http.post(url).json(&body)).await?;
        let created = res.json::<ExpenseCreated>().await?;
        tracing::debug!(id = %created.name, "expense created");
        Ok(created.name)
    }

    async fn replace(&self, expense: &Expense) -> Result<()> {
        let url = self.record_url(&expense.id)?;
        let body = body_for(&expense.description, expense.amount, expense.date);
        self.send(self.http.put(url).json(&body)).await?;
        tracing::debug!(id = %expense.id, "expense replaced");
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let url = self.record_url(id)?;
        self.send(self.http.delete(url)).await?;
        tracing::debug!(id, "expense removed");
        Ok(())
    }
}
