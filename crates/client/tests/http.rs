use std::{
    collections::BTreeMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use api_types::expense::{ExpenseBody, ExpenseCreated, KeyedExpense};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use engine::{Amount, EngineError, ExpenseData, ExpensePatch, ExpenseStore};
use expense_client::{
    ClientError, HttpExpenseService, InitialLoad, LoadState, RemoteExpenseService, SyncedStore,
};

#[derive(Clone, Default)]
struct Backend {
    records: Arc<Mutex<BTreeMap<String, KeyedExpense>>>,
    next_id: Arc<AtomicUsize>,
    list_hits: Arc<AtomicUsize>,
}

impl Backend {
    fn seed(&self, description: &str, amount: f64, date: &str) -> String {
        let id = format!("-N{:04}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.records.lock().unwrap().insert(
            id.clone(),
            KeyedExpense {
                description: Some(description.to_string()),
                amount: Some(amount),
                date: Some(date.to_string()),
            },
        );
        id
    }

    fn get(&self, id: &str) -> Option<KeyedExpense> {
        self.records.lock().unwrap().get(id).cloned()
    }
}

fn keyed(body: ExpenseBody) -> KeyedExpense {
    KeyedExpense {
        description: Some(body.description),
        amount: Some(body.amount),
        date: Some(body.date),
    }
}

async fn list(State(backend): State<Backend>) -> Json<Value> {
    backend.list_hits.fetch_add(1, Ordering::SeqCst);
    let records = backend.records.lock().unwrap();
    if records.is_empty() {
        return Json(Value::Null);
    }
    Json(serde_json::to_value(&*records).unwrap())
}

async fn create(State(backend): State<Backend>, Json(body): Json<ExpenseBody>) -> Json<ExpenseCreated> {
    let name = format!("-N{:04}", backend.next_id.fetch_add(1, Ordering::SeqCst));
    backend
        .records
        .lock()
        .unwrap()
        .insert(name.clone(), keyed(body));
    Json(ExpenseCreated { name })
}

async fn replace(
    State(backend): State<Backend>,
    Path(file): Path<String>,
    Json(body): Json<ExpenseBody>,
) -> StatusCode {
    let id = file.trim_end_matches(".json").to_string();
    backend.records.lock().unwrap().insert(id, keyed(body));
    StatusCode::OK
}

async fn remove(State(backend): State<Backend>, Path(file): Path<String>) -> StatusCode {
    let id = file.trim_end_matches(".json");
    backend.records.lock().unwrap().remove(id);
    StatusCode::OK
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_backend(backend: Backend) -> HttpExpenseService {
    let router = Router::new()
        .route("/expenses.json", get(list).post(create))
        .route("/expenses/{file}", put(replace).delete(remove))
        .with_state(backend);
    let base = spawn(router).await;
    HttpExpenseService::new(&base, Duration::from_secs(5)).unwrap()
}

async fn spawn_static(status: StatusCode, body: Value) -> HttpExpenseService {
    let router = Router::new().route(
        "/expenses.json",
        get(move || async move { (status, Json(body)) }),
    );
    let base = spawn(router).await;
    HttpExpenseService::new(&base, Duration::from_secs(5)).unwrap()
}

fn ids(store: &ExpenseStore) -> Vec<String> {
    store.snapshot().into_iter().map(|e| e.id).collect()
}

#[tokio::test]
async fn initial_load_fills_store_newest_first() {
    let backend = Backend::default();
    let first = backend.seed("shoes", 59.99, "2024-06-01T10:00:00.000Z");
    let second = backend.seed("book", 14.5, "2024-06-02");
    let third = backend.seed("lunch", 9.0, "2024-06-03T12:30:00.000Z");
    let service = spawn_backend(backend).await;

    let store = ExpenseStore::new();
    let mut load = InitialLoad::new(service, store.clone());
    assert_eq!(load.state(), &LoadState::Idle);

    let state = load.activate().await.clone();
    assert_eq!(state, LoadState::Loaded { count: 3 });
    assert_eq!(ids(&store), vec![third, second, first.clone()]);
    assert_eq!(store.get(&first).unwrap().amount, Amount::new(5999));
}

#[tokio::test]
async fn initial_load_runs_once() {
    let backend = Backend::default();
    backend.seed("shoes", 10.0, "2024-06-01");
    let hits = backend.list_hits.clone();
    let service = spawn_backend(backend).await;

    let store = ExpenseStore::new();
    let mut load = InitialLoad::new(service, store.clone());
    load.activate().await;
    store.delete(&store.snapshot()[0].id);
    load.activate().await;

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(store.is_empty());
}

#[tokio::test]
async fn empty_backend_loads_nothing() {
    let service = spawn_backend(Backend::default()).await;
    let store = ExpenseStore::new();
    let mut load = InitialLoad::new(service, store.clone());
    assert_eq!(load.activate().await, &LoadState::Loaded { count: 0 });
    assert!(store.is_empty());
}

#[tokio::test]
async fn server_error_is_reported_and_store_kept() {
    let service = spawn_static(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"})).await;

    let err = service.fetch_all().await.unwrap_err();
    match err {
        ClientError::Server { status, message } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let store = ExpenseStore::new();
    store.add(ExpenseData::new(
        "kept",
        Amount::new(100),
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
    ));
    let mut load = InitialLoad::new(service, store.clone());
    assert!(load.activate().await.is_failed());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn malformed_record_rejects_the_fetch() {
    let service = spawn_static(
        StatusCode::OK,
        json!([
            {"id": "a", "description": "ok", "amount": 1.0, "date": "2024-06-01"},
            {"id": "b", "amount": 2.0, "date": "2024-06-02"}
        ]),
    )
    .await;

    let err = service.fetch_all().await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Engine(EngineError::MalformedRecord(_))
    ));

    let store = ExpenseStore::new();
    let mut load = InitialLoad::new(service, store.clone());
    assert!(load.activate().await.is_failed());
    assert!(store.is_empty());
}

#[tokio::test]
async fn wrong_typed_field_is_a_malformed_record() {
    let service = spawn_static(
        StatusCode::OK,
        json!([{"id": "a", "description": "ok", "amount": "12.5", "date": "2024-06-01"}]),
    )
    .await;

    match service.fetch_all().await.unwrap_err() {
        ClientError::Engine(EngineError::MalformedRecord(message)) => {
            assert!(message.contains("expense a"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn failed_load_can_be_retried() {
    let backend = Backend::default();
    let service = spawn_backend(backend.clone()).await;
    let broken = spawn_static(StatusCode::SERVICE_UNAVAILABLE, json!({"error": "down"})).await;

    let store = ExpenseStore::new();
    let mut load = InitialLoad::new(broken, store.clone());
    assert!(load.activate().await.is_failed());
    // Retry only re-issues after a failure; the broken backend keeps failing.
    assert!(load.retry().await.is_failed());

    backend.seed("coffee", 2.5, "2024-06-01");
    let mut load = InitialLoad::new(service, store.clone());
    assert_eq!(load.retry().await, &LoadState::Idle);
    assert_eq!(load.activate().await, &LoadState::Loaded { count: 1 });
}

#[tokio::test]
async fn slow_backend_times_out() {
    let router = Router::new().route(
        "/expenses.json",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(Value::Null)
        }),
    );
    let base = spawn(router).await;
    let service = HttpExpenseService::new(&base, Duration::from_millis(200)).unwrap();

    let err = service.fetch_all().await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout));
}

#[tokio::test]
async fn synced_store_writes_through() {
    let backend = Backend::default();
    let service = spawn_backend(backend.clone()).await;
    let synced = SyncedStore::new(service, ExpenseStore::new());

    let id = synced
        .add(ExpenseData::new(
            "groceries",
            Amount::new(4250),
            Utc.with_ymd_and_hms(2024, 6, 5, 8, 0, 0).unwrap(),
        ))
        .await
        .unwrap();

    let stored = backend.get(&id).unwrap();
    assert_eq!(stored.description.as_deref(), Some("groceries"));
    assert_eq!(stored.amount, Some(42.5));
    assert_eq!(stored.date.as_deref(), Some("2024-06-05T08:00:00.000Z"));
    assert_eq!(synced.store().snapshot()[0].id, id);

    synced
        .update(&id, ExpensePatch::default().amount(Amount::new(5000)))
        .await
        .unwrap();
    let stored = backend.get(&id).unwrap();
    assert_eq!(stored.amount, Some(50.0));
    assert_eq!(stored.description.as_deref(), Some("groceries"));
    assert_eq!(synced.store().get(&id).unwrap().amount, Amount::new(5000));

    synced.delete(&id).await.unwrap();
    assert!(backend.get(&id).is_none());
    assert!(synced.store().is_empty());
}

#[tokio::test]
async fn synced_update_of_unknown_id_skips_backend() {
    let backend = Backend::default();
    let service = spawn_backend(backend.clone()).await;
    let synced = SyncedStore::new(service, ExpenseStore::new());

    let err = synced
        .update("missing", ExpensePatch::default().description("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Engine(EngineError::NotFound(_))));
    assert!(backend.get("missing").is_none());
}

#[tokio::test]
async fn failed_remote_write_keeps_local_state() {
    let service = spawn_static(StatusCode::OK, Value::Null).await;
    let store = ExpenseStore::new();
    let id = store.add(ExpenseData::new(
        "local",
        Amount::new(100),
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
    ));
    let synced = SyncedStore::new(service, store.clone());

    // The static backend has no record routes: every write is a 404/405.
    assert!(synced.delete(&id).await.is_err());
    assert!(
        synced
            .update(&id, ExpensePatch::default().description("changed"))
            .await
            .is_err()
    );
    assert_eq!(store.get(&id).unwrap().description, "local");
}
