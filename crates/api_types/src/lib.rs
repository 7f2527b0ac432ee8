use serde::{Deserialize, Serialize};

pub mod expense {
    use std::collections::BTreeMap;

    use serde_json::Value;

    use super::*;

    /// An expense as returned by the backend.
    ///
    /// Every field is optional on the wire: a record missing data is rejected
    /// by the engine ingestion step instead of failing the whole list decode.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseRecord {
        pub id: Option<String>,
        pub description: Option<String>,
        /// Amount in major units (e.g. `12.5`).
        pub amount: Option<f64>,
        /// ISO-8601 date or RFC3339 timestamp.
        pub date: Option<String>,
    }

    /// Payload written to the backend on create/replace.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseBody {
        pub description: String,
        pub amount: f64,
        /// RFC3339 timestamp (UTC).
        pub date: String,
    }

    /// Record stored under its id key, without the id itself.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct KeyedExpense {
        pub description: Option<String>,
        pub amount: Option<f64>,
        pub date: Option<String>,
    }

    /// Body of `GET /expenses.json`.
    ///
    /// The backend either returns an array of records, an object keyed by
    /// expense id, or `null` when nothing was stored yet.
    #[derive(Clone, Debug, PartialEq, Deserialize)]
    #[serde(untagged)]
    pub enum ExpenseListResponse {
        List(Vec<ExpenseRecord>),
        Keyed(BTreeMap<String, KeyedExpense>),
        Empty(()),
    }

    impl ExpenseListResponse {
        /// Flattens the response into records, oldest first.
        ///
        /// Keyed responses are ordered by key: backend generated keys are
        /// monotonic, so ascending key order is insertion order.
        pub fn into_records(self) -> Vec<ExpenseRecord> {
            match self {
                Self::List(records) => records,
                Self::Keyed(map) => map
                    .into_iter()
                    .map(|(id, body)| ExpenseRecord {
                        id: Some(id),
                        description: body.description,
                        amount: body.amount,
                        date: body.date,
                    })
                    .collect(),
                Self::Empty(()) => Vec::new(),
            }
        }
    }

    /// Decodes a list body record by record.
    ///
    /// A record with a wrong-typed field fails with a message naming that
    /// record, instead of the whole body failing to match any shape.
    impl TryFrom<Value> for ExpenseListResponse {
        type Error = String;

        fn try_from(value: Value) -> Result<Self, Self::Error> {
            match value {
                Value::Null => Ok(Self::Empty(())),
                Value::Array(items) => items
                    .into_iter()
                    .enumerate()
                    .map(|(n, item)| {
                        let id = item
                            .get("id")
                            .and_then(Value::as_str)
                            .map_or_else(|| format!("#{n}"), str::to_string);
                        serde_json::from_value::<ExpenseRecord>(item)
                            .map_err(|err| format!("expense {id}: {err}"))
                    })
                    .collect::<Result<_, _>>()
                    .map(Self::List),
                Value::Object(map) => map
                    .into_iter()
                    .map(|(id, item)| match serde_json::from_value::<KeyedExpense>(item) {
                        Ok(body) => Ok((id, body)),
                        Err(err) => Err(format!("expense {id}: {err}")),
                    })
                    .collect::<Result<_, _>>()
                    .map(Self::Keyed),
                other => Err(format!("unexpected expense list: {other}")),
            }
        }
    }

    /// Body of `POST /expenses.json`: the id assigned by the backend.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub name: String,
    }
}
