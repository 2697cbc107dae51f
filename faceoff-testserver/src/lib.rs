//! Reference backends for the comparison benchmark: one HTTP/JSON service
//! and one gRPC service over a shared in-memory resource table. Used by
//! tests, demos, and the `--embedded` benchmark path.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub mod grpc;
pub use grpc::GrpcTestServer;

pub const PATH_RESOURCES: &str = "/resources";
pub const PATH_RESOURCES_STREAM: &str = "/resources/stream";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    pub id: i32,
    pub name: String,
    pub description: String,
}

/// In-memory resource rows shared by both protocol servers. Seeded with
/// five entries; `add` assigns `max(id) + 1`.
#[derive(Debug)]
pub struct ResourceTable {
    rows: Mutex<Vec<Resource>>,
}

impl Default for ResourceTable {
    fn default() -> Self {
        let rows = ('A'..='E')
            .enumerate()
            .map(|(i, letter)| Resource {
                id: (i + 1).min(i32::MAX as usize) as i32,
                name: format!("Resource {letter}"),
                description: format!("Description for Resource {letter}"),
            })
            .collect();
        Self {
            rows: Mutex::new(rows),
        }
    }
}

impl ResourceTable {
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Resource>> {
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, id: i32) -> Option<Resource> {
        self.lock().iter().find(|r| r.id == id).cloned()
    }

    pub fn add(&self, name: String, description: String) -> Resource {
        let mut rows = self.lock();
        let id = rows.iter().map(|r| r.id).max().unwrap_or(0).saturating_add(1);
        let row = Resource {
            id,
            name,
            description,
        };
        rows.push(row.clone());
        row
    }

    /// Row used for the `seq`-th streamed item, rotating over the table.
    pub fn nth(&self, seq: usize) -> Option<Resource> {
        let rows = self.lock();
        if rows.is_empty() {
            return None;
        }
        rows.get(seq % rows.len()).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Request counters exposed so tests can assert the servers actually saw
/// the generated load.
#[derive(Debug, Clone, Default)]
pub struct TestServerStats {
    requests_total: Arc<AtomicU64>,
}

impl TestServerStats {
    fn inc_requests_total(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests_total(&self) -> u64 {
        self.requests_total.load(Ordering::Relaxed)
    }
}

#[derive(Clone)]
pub struct AppState {
    table: Arc<ResourceTable>,
    stats: TestServerStats,
}

pub fn router(table: Arc<ResourceTable>, stats: TestServerStats) -> Router {
    let state = AppState { table, stats };
    Router::new()
        .route(PATH_RESOURCES_STREAM, get(stream_resources))
        .route(&format!("{PATH_RESOURCES}/{{id}}"), get(get_resource))
        .route(PATH_RESOURCES, post(create_resource))
        .with_state(state)
}

async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    state.stats.inc_requests_total();
    match state.table.get(id) {
        Some(row) => (StatusCode::OK, Json(serde_json::json!(row))),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "message": format!("Resource with ID {id} not found") })),
        ),
    }
}

#[derive(Debug, Deserialize)]
struct CreateResourceBody {
    name: String,
    #[serde(default)]
    description: String,
}

async fn create_resource(
    State(state): State<AppState>,
    Json(body): Json<CreateResourceBody>,
) -> impl IntoResponse {
    state.stats.inc_requests_total();
    let row = state.table.add(body.name, body.description);
    (StatusCode::CREATED, Json(row))
}

#[derive(Debug, Deserialize)]
struct StreamParams {
    count: u32,
}

async fn stream_resources(
    State(state): State<AppState>,
    Query(params): Query<StreamParams>,
) -> impl IntoResponse {
    state.stats.inc_requests_total();
    let items: Vec<Resource> = (0..params.count as usize)
        .filter_map(|seq| state.table.nth(seq))
        .collect();
    Json(items)
}

/// HTTP/JSON reference backend bound to an ephemeral loopback port.
#[derive(Debug)]
pub struct HttpTestServer {
    addr: SocketAddr,
    stats: TestServerStats,
    table: Arc<ResourceTable>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl HttpTestServer {
    pub async fn start() -> std::io::Result<Self> {
        Self::start_with_table(Arc::new(ResourceTable::default())).await
    }

    pub async fn start_with_table(table: Arc<ResourceTable>) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let stats = TestServerStats::default();
        let app = router(table.clone(), stats.clone());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = serve.await;
        });

        Ok(Self {
            addr,
            stats,
            table,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn stats(&self) -> &TestServerStats {
        &self.stats
    }

    pub fn table(&self) -> &Arc<ResourceTable> {
        &self.table
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for HttpTestServer {
    fn drop(&mut self) {
        if self.shutdown_tx.is_some()
            && let Some(task) = self.task.take()
        {
            task.abort();
        }
    }
}
