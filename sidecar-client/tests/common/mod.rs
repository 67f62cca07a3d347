// sidecar-client/tests/common/mod.rs
// Mock sidecar and mock service for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get, post};
use serde::Deserialize;
use serde_json::{Value, json};

/// Store name the mock answers with 500 for every request
pub const BROKEN_STORE: &str = "brokenstore";

/// State key and invoke path the mock sidecar answers only after [`SLOW_DELAY`]
pub const SLOW: &str = "slow";
pub const SLOW_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
pub struct SidecarState {
    pub state: Mutex<HashMap<(String, String), Value>>,
    pub published: Mutex<Vec<(String, String, Value)>>,
}

#[derive(Deserialize)]
struct StateItem {
    key: String,
    value: Value,
}

pub struct MockSidecar {
    pub addr: SocketAddr,
    pub data: Arc<SidecarState>,
}

impl MockSidecar {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn stored(&self, store: &str, key: &str) -> Option<Value> {
        self.data
            .state
            .lock()
            .unwrap()
            .get(&(store.to_string(), key.to_string()))
            .cloned()
    }

    pub fn seed(&self, store: &str, key: &str, value: Value) {
        self.data
            .state
            .lock()
            .unwrap()
            .insert((store.to_string(), key.to_string()), value);
    }

    pub fn published(&self) -> Vec<(String, String, Value)> {
        self.data.published.lock().unwrap().clone()
    }
}

pub async fn spawn_sidecar() -> MockSidecar {
    let data = Arc::new(SidecarState::default());
    let app = Router::new()
        .route(
            "/v1.0/state/{store}/{key}",
            get(get_state).delete(delete_state),
        )
        .route("/v1.0/state/{store}", post(save_state))
        .route("/v1.0/publish/{pubsub}/{topic}", post(publish))
        .route("/v1.0/invoke/{app_id}/method/{*path}", any(invoke))
        .with_state(data.clone());

    let addr = serve(app).await;
    MockSidecar { addr, data }
}

/// A service reached directly; echoes the request with `"via": "direct"`
pub async fn spawn_service() -> SocketAddr {
    let app = Router::new().route("/{*path}", any(direct));
    serve(app).await
}

/// An address with nothing listening on it
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn get_state(
    State(data): State<Arc<SidecarState>>,
    Path((store, key)): Path<(String, String)>,
) -> Response {
    if store == BROKEN_STORE {
        return (StatusCode::INTERNAL_SERVER_ERROR, "state store down").into_response();
    }
    if key == "garbled" {
        return (StatusCode::OK, "{not json").into_response();
    }
    if key == SLOW {
        tokio::time::sleep(SLOW_DELAY).await;
    }
    match data.state.lock().unwrap().get(&(store, key)) {
        Some(value) => (StatusCode::OK, value.to_string()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn save_state(
    State(data): State<Arc<SidecarState>>,
    Path(store): Path<String>,
    body: Bytes,
) -> Response {
    if store == BROKEN_STORE {
        return (StatusCode::INTERNAL_SERVER_ERROR, "state store down").into_response();
    }
    let items: Vec<StateItem> = match serde_json::from_slice(&body) {
        Ok(items) => items,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    let mut state = data.state.lock().unwrap();
    for item in items {
        state.insert((store.clone(), item.key), item.value);
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_state(
    State(data): State<Arc<SidecarState>>,
    Path((store, key)): Path<(String, String)>,
) -> Response {
    if store == BROKEN_STORE {
        return (StatusCode::INTERNAL_SERVER_ERROR, "state store down").into_response();
    }
    data.state.lock().unwrap().remove(&(store, key));
    StatusCode::NO_CONTENT.into_response()
}

async fn publish(
    State(data): State<Arc<SidecarState>>,
    Path((pubsub, topic)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    if topic == "forbidden" {
        return (StatusCode::FORBIDDEN, "topic not allowed").into_response();
    }
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    data.published.lock().unwrap().push((pubsub, topic, payload));
    StatusCode::NO_CONTENT.into_response()
}

async fn invoke(
    Path((app_id, path)): Path<(String, String)>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if path.trim_start_matches('/') == SLOW {
        tokio::time::sleep(SLOW_DELAY).await;
    }
    echo("sidecar", Some(app_id), path, method, query, headers, body)
}

async fn direct(
    Path(path): Path<String>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    echo("direct", None, path, method, query, headers, body)
}

fn echo(
    via: &str,
    app_id: Option<String>,
    path: String,
    method: Method,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = path.trim_start_matches('/').to_string();
    match path.as_str() {
        "empty" => return StatusCode::NO_CONTENT.into_response(),
        "blank" => return (StatusCode::OK, "").into_response(),
        "missing" => return (StatusCode::NOT_FOUND, "no such thing").into_response(),
        _ => {}
    }

    let body: Value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let reply = json!({
        "via": via,
        "appId": app_id,
        "path": path,
        "method": method.as_str(),
        "query": query,
        "body": body,
        "contentType": header("content-type"),
        "trace": header("x-trace"),
    });
    (StatusCode::OK, axum::Json(reply)).into_response()
}
