//! Integration tests for the PostgREST store
//!
//! A small axum server stands in for the hosted table so the requests the
//! store sends, and its handling of the replies, can be checked end to end.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use clap::Parser;
use serde_json::{json, Value};

use tasklist::cli::{self, Cli, Commands};
use tasklist::config::StoreConfig;
use tasklist::store::{NewTask, RestStore, StoreError, TaskId, TaskStore};
use tasklist::sync::{SyncError, TaskSynchronizer, WriteOp};

const API_KEY: &str = "anon-test-key";

/// One request as the fixture saw it.
#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    query: HashMap<String, String>,
    headers: HeaderMap,
    body: Option<Value>,
}

#[derive(Default)]
struct Table {
    rows: Vec<Value>,
    next_id: i64,
    seen: Vec<Seen>,
    fail_with: Option<(StatusCode, String)>,
}

#[derive(Clone, Default)]
struct Fixture(Arc<Mutex<Table>>);

impl Fixture {
    fn table(&self) -> std::sync::MutexGuard<'_, Table> {
        self.0.lock().unwrap()
    }

    /// Insert a row directly, as if another client had written it.
    fn seed(&self, title: &str, completed: bool) -> i64 {
        let mut table = self.table();
        table.next_id += 1;
        let id = table.next_id;
        let row = json!({
            "id": id,
            "title": title,
            "completed": completed,
            "created_at": format!("2025-01-01T12:00:{:02}+00:00", id),
        });
        table.rows.push(row);
        id
    }

    fn fail_next(&self, status: StatusCode, body: &str) {
        self.table().fail_with = Some((status, body.to_string()));
    }

    fn seen(&self) -> Vec<Seen> {
        self.table().seen.clone()
    }

    fn rows(&self) -> Vec<Value> {
        self.table().rows.clone()
    }

    /// Record the request, then hand back the injected failure if any.
    fn begin(
        &self,
        method: Method,
        query: HashMap<String, String>,
        headers: HeaderMap,
        body: Option<Value>,
    ) -> Option<Response> {
        let mut table = self.table();
        table.seen.push(Seen {
            method,
            query,
            headers,
            body,
        });
        table
            .fail_with
            .take()
            .map(|(status, body)| (status, body).into_response())
    }
}

fn row_filter(query: &HashMap<String, String>) -> Option<String> {
    query
        .get("id")
        .and_then(|f| f.strip_prefix("eq."))
        .map(str::to_string)
}

fn row_id(row: &Value) -> String {
    row["id"].to_string().trim_matches('"').to_string()
}

async fn list_rows(
    State(fixture): State<Fixture>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(failure) = fixture.begin(Method::GET, query, headers, None) {
        return failure;
    }
    let mut rows = fixture.rows();
    rows.sort_by(|a, b| {
        b["created_at"]
            .as_str()
            .unwrap_or_default()
            .cmp(a["created_at"].as_str().unwrap_or_default())
    });
    Json(rows).into_response()
}

async fn insert_row(
    State(fixture): State<Fixture>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(failure) = fixture.begin(Method::POST, query, headers, Some(body.clone())) {
        return failure;
    }
    let title = body[0]["title"].as_str().unwrap_or_default().to_string();
    let id = fixture.seed(&title, false);
    let row = fixture
        .rows()
        .into_iter()
        .find(|r| r["id"] == json!(id))
        .unwrap();
    (StatusCode::CREATED, Json(row)).into_response()
}

async fn update_row(
    State(fixture): State<Fixture>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let target = row_filter(&query);
    if let Some(failure) = fixture.begin(Method::PATCH, query, headers, Some(body.clone())) {
        return failure;
    }
    let mut table = fixture.table();
    for row in table
        .rows
        .iter_mut()
        .filter(|r| Some(row_id(r)) == target)
    {
        row["completed"] = body["completed"].clone();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_row(
    State(fixture): State<Fixture>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let target = row_filter(&query);
    if let Some(failure) = fixture.begin(Method::DELETE, query, headers, None) {
        return failure;
    }
    fixture.table().rows.retain(|r| Some(row_id(r)) != target);
    StatusCode::NO_CONTENT.into_response()
}

async fn serve(fixture: Fixture) -> String {
    let app = Router::new()
        .route(
            "/rest/v1/tasks",
            get(list_rows)
                .post(insert_row)
                .patch(update_row)
                .delete(delete_row),
        )
        .with_state(fixture);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn store_config(url: &str) -> StoreConfig {
    StoreConfig {
        url: Some(url.to_string()),
        api_key: Some(API_KEY.to_string()),
        timeout_secs: Some(5),
        ..StoreConfig::default()
    }
}

async fn store_with_fixture() -> (Fixture, RestStore) {
    let fixture = Fixture::default();
    let url = serve(fixture.clone()).await;
    let store = RestStore::new(&store_config(&url)).unwrap();
    (fixture, store)
}

fn header<'a>(seen: &'a Seen, name: &str) -> Option<&'a str> {
    seen.headers.get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn test_list_sends_order_and_credentials() {
    let (fixture, store) = store_with_fixture().await;
    fixture.seed("older", false);
    fixture.seed("newer", true);

    let tasks = store.list().await.unwrap();
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["newer", "older"]);
    assert!(tasks[0].completed);
    assert_eq!(tasks[0].id, TaskId::new("2"));

    let seen = fixture.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::GET);
    assert_eq!(seen[0].query.get("select").map(String::as_str), Some("*"));
    assert_eq!(
        seen[0].query.get("order").map(String::as_str),
        Some("created_at.desc")
    );
    assert_eq!(header(&seen[0], "apikey"), Some(API_KEY));
    assert_eq!(
        header(&seen[0], "authorization"),
        Some(format!("Bearer {}", API_KEY).as_str())
    );
}

#[tokio::test]
async fn test_insert_asks_for_the_created_row() {
    let (fixture, store) = store_with_fixture().await;

    let task = store.insert(&NewTask::new("Buy milk")).await.unwrap();
    assert_eq!(task.title, "Buy milk");
    assert!(!task.completed);
    assert_eq!(task.id, TaskId::new("1"));

    let seen = fixture.seen();
    let seen = &seen[0];
    assert_eq!(seen.method, Method::POST);
    assert_eq!(header(seen, "prefer"), Some("return=representation"));
    assert_eq!(
        header(seen, "accept"),
        Some("application/vnd.pgrst.object+json")
    );
    assert_eq!(seen.body, Some(json!([{ "title": "Buy milk" }])));
}

#[tokio::test]
async fn test_update_and_delete_filter_by_id() {
    let (fixture, store) = store_with_fixture().await;
    let id = fixture.seed("Buy milk", false);
    let task_id = TaskId::new(id.to_string());

    store.set_completed(&task_id, true).await.unwrap();
    assert_eq!(fixture.rows()[0]["completed"], json!(true));

    store.delete(&task_id).await.unwrap();
    assert!(fixture.rows().is_empty());

    let seen = fixture.seen();
    assert_eq!(seen[0].method, Method::PATCH);
    assert_eq!(seen[0].query.get("id").map(String::as_str), Some("eq.1"));
    assert_eq!(seen[0].body, Some(json!({ "completed": true })));
    assert_eq!(seen[1].method, Method::DELETE);
    assert_eq!(seen[1].query.get("id").map(String::as_str), Some("eq.1"));
}

#[tokio::test]
async fn test_api_error_is_parsed() {
    let (fixture, store) = store_with_fixture().await;
    fixture.fail_next(
        StatusCode::NOT_FOUND,
        r#"{"code":"42P01","message":"relation \"public.tasks\" does not exist","details":null,"hint":null}"#,
    );

    match store.list().await {
        Err(StoreError::Api {
            status,
            code,
            message,
        }) => {
            assert_eq!(status, 404);
            assert_eq!(code.as_deref(), Some("42P01"));
            assert!(message.contains("does not exist"));
        }
        other => panic!("expected an API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_plain_text_error_body() {
    let (fixture, store) = store_with_fixture().await;
    fixture.fail_next(StatusCode::BAD_GATEWAY, "upstream down");

    let err = store.insert(&NewTask::new("x")).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Api { status: 502, code: None, ref message } if message == "upstream down"
    ));
}

#[tokio::test]
async fn test_unreachable_store_is_a_transport_error() {
    // Grab a free port, then close it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let store = RestStore::new(&store_config(&url)).unwrap();
    assert!(matches!(
        store.list().await,
        Err(StoreError::Transport(_))
    ));
}

#[tokio::test]
async fn test_synchronizer_over_rest() {
    let (fixture, store) = store_with_fixture().await;
    fixture.seed("Existing", false);
    let mut sync = TaskSynchronizer::new(store);

    assert_eq!(sync.load().await.unwrap(), 1);

    let created = sync.create("Buy milk").await.unwrap().unwrap();
    assert_eq!(sync.tasks().as_slice()[0].id, created.id);
    assert_eq!(sync.tasks().len(), 2);

    assert!(sync.toggle(&created.id).await.unwrap());
    assert!(sync.tasks().get(&created.id).unwrap().completed);

    sync.delete(&created.id).await.unwrap();
    assert_eq!(sync.tasks().len(), 1);
    assert_eq!(fixture.rows().len(), 1);

    // Blank titles never reach the server.
    let before = fixture.seen().len();
    assert!(sync.create("   ").await.unwrap().is_none());
    assert_eq!(fixture.seen().len(), before);
}

#[tokio::test]
async fn test_synchronizer_keeps_state_on_server_errors() {
    let (fixture, store) = store_with_fixture().await;
    let id = fixture.seed("Buy milk", false);
    let task_id = TaskId::new(id.to_string());
    let mut sync = TaskSynchronizer::new(store);
    sync.load().await.unwrap();

    fixture.fail_next(StatusCode::INTERNAL_SERVER_ERROR, "");
    let err = sync.toggle_complete(&task_id, false).await.unwrap_err();
    assert_eq!(err.write_op(), Some(WriteOp::Update));
    assert!(!sync.tasks().get(&task_id).unwrap().completed);

    fixture.fail_next(StatusCode::INTERNAL_SERVER_ERROR, "");
    assert!(sync.delete(&task_id).await.is_err());
    assert_eq!(sync.tasks().len(), 1);

    fixture.fail_next(StatusCode::SERVICE_UNAVAILABLE, "");
    let err = sync.load().await.unwrap_err();
    assert!(matches!(err, SyncError::Fetch(StoreError::Api { status: 503, .. })));
    assert!(sync.load_failed());
    assert_eq!(sync.tasks().len(), 1);
}

#[tokio::test]
async fn test_add_command_only_inserts() {
    let fixture = Fixture::default();
    let url = serve(fixture.clone()).await;
    let temp = tempfile::TempDir::new().unwrap();
    let config = temp.path().join("absent.toml");

    let cli = Cli::try_parse_from([
        "tasklist",
        "add",
        "Buy",
        "milk",
        "--url",
        url.as_str(),
        "--api-key",
        API_KEY,
        "--config",
        config.to_str().unwrap(),
    ])
    .unwrap();
    let Some(Commands::Add(args)) = cli.command else {
        panic!("expected the add command");
    };
    cli::add::run(&cli.store, args).await.unwrap();

    let methods: Vec<Method> = fixture.seen().into_iter().map(|s| s.method).collect();
    assert_eq!(methods, vec![Method::POST]);
    assert_eq!(fixture.rows()[0]["title"], json!("Buy milk"));
}
