//! In-process stand-in for the explorer backend.
//!
//! Serves `GET /api/db-info` and `POST /api/query` on an ephemeral port with
//! canned status codes and bodies, and records every query request.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// A request received on `/api/query`.
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug)]
struct BackendState {
    db_info: Mutex<(StatusCode, String)>,
    query: Mutex<(StatusCode, String)>,
    queued: Mutex<VecDeque<(StatusCode, String)>>,
    query_delay: Mutex<Duration>,
    requests: Mutex<Vec<RecordedQuery>>,
}

/// A running fake backend. The server stops when this is dropped.
pub struct FakeBackend {
    addr: SocketAddr,
    state: Arc<BackendState>,
    handle: JoinHandle<()>,
}

pub const DB_INFO_BODY: &str =
    r#"{"total_blocks": 700000, "min_height": 0, "max_height": 699999, "total_tables": 5}"#;

pub const AVG_SIZE_BODY: &str =
    r#"{"sql": "SELECT AVG(size) FROM blocks LIMIT 100", "results": [{"avg_size": 123456}]}"#;

impl FakeBackend {
    /// Starts a backend answering both endpoints successfully.
    pub async fn start() -> Self {
        let state = Arc::new(BackendState {
            db_info: Mutex::new((StatusCode::OK, DB_INFO_BODY.to_string())),
            query: Mutex::new((StatusCode::OK, AVG_SIZE_BODY.to_string())),
            queued: Mutex::new(VecDeque::new()),
            query_delay: Mutex::new(Duration::ZERO),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/db-info", get(db_info_handler))
            .route("/api/query", post(query_handler))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("fake backend address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app.into_make_service()).await;
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Base URL to point the client at.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_db_info(&self, status: StatusCode, body: &str) {
        *self.state.db_info.lock().unwrap() = (status, body.to_string());
    }

    pub fn set_query(&self, status: StatusCode, body: &str) {
        *self.state.query.lock().unwrap() = (status, body.to_string());
    }

    /// Queues a one-off query answer, used before the standing one.
    pub fn queue_query(&self, status: StatusCode, body: &str) {
        self.state
            .queued
            .lock()
            .unwrap()
            .push_back((status, body.to_string()));
    }

    pub fn set_query_delay(&self, delay: Duration) {
        *self.state.query_delay.lock().unwrap() = delay;
    }

    /// Query requests received so far.
    pub fn requests(&self) -> Vec<RecordedQuery> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn json_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn db_info_handler(State(state): State<Arc<BackendState>>) -> Response {
    let (status, body) = state.db_info.lock().unwrap().clone();
    json_response(status, body)
}

async fn query_handler(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.requests.lock().unwrap().push(RecordedQuery {
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body,
    });

    let delay = *state.query_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let queued = state.queued.lock().unwrap().pop_front();
    let (status, body) = queued.unwrap_or_else(|| state.query.lock().unwrap().clone());
    json_response(status, body)
}
