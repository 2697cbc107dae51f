use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use faceoff_core::Backend;
use faceoff_core::bench::Orchestrator;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, oneshot};

/// Thin control surface over the benchmark engine:
/// `POST /api/run-benchmark` executes a run, `GET /api/results` serves the
/// last stored report.
#[derive(Debug)]
pub struct ControlServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
}

struct ApiState<A, B> {
    orchestrator: Orchestrator<A, B>,
    // The orchestrator is not reentrant-safe; runs are serialized here.
    run_lock: Mutex<()>,
}

impl ControlServer {
    pub async fn start<A: Backend, B: Backend>(
        bind_addr: SocketAddr,
        orchestrator: Orchestrator<A, B>,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(bind_addr)
            .await
            .with_context(|| format!("failed to bind control api: {bind_addr}"))?;
        let addr = listener
            .local_addr()
            .context("failed to resolve control api address")?;

        let state = Arc::new(ApiState {
            orchestrator,
            run_lock: Mutex::new(()),
        });
        let app = router(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = serve.await;
        });

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            task,
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        let _ = self.task.await;
    }
}

fn router<A: Backend, B: Backend>(state: Arc<ApiState<A, B>>) -> Router {
    Router::new()
        .route("/api/run-benchmark", post(run_benchmark::<A, B>))
        .route("/api/results", get(results::<A, B>))
        .with_state(state)
}

async fn run_benchmark<A: Backend, B: Backend>(
    State(state): State<Arc<ApiState<A, B>>>,
) -> impl IntoResponse {
    let _guard = state.run_lock.lock().await;

    match state.orchestrator.run().await {
        Ok(report) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "message": "Benchmark completed.",
                "results": &*report,
            })),
        ),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "success": false,
                "message": "Benchmark failed",
                "error": err.to_string(),
            })),
        ),
    }
}

async fn results<A: Backend, B: Backend>(
    State(state): State<Arc<ApiState<A, B>>>,
) -> impl IntoResponse {
    match state.orchestrator.store().get() {
        Some(report) => (StatusCode::OK, Json(serde_json::json!(&*report))),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "message": "No benchmark results available." })),
        ),
    }
}
