use std::sync::Arc;

use faceoff_core::bench::{Orchestrator, ReportStore};

use crate::backends::Backends;
use crate::cli::ServeArgs;
use crate::run::bench_config;
use crate::run_error::RunError;
use crate::web::ControlServer;

pub async fn serve(args: ServeArgs) -> Result<(), RunError> {
    let config = bench_config(&args.bench)?;
    let backends = Backends::connect(&args.backends).await?;

    let store = Arc::new(ReportStore::default());
    let orchestrator =
        Orchestrator::new(backends.grpc.clone(), backends.http.clone(), config, store);

    let server = ControlServer::start(args.bind, orchestrator)
        .await
        .map_err(RunError::RuntimeError)?;
    eprintln!("control_api={}", server.url());

    let _ = tokio::signal::ctrl_c().await;

    server.shutdown().await;
    backends.shutdown().await;
    Ok(())
}
