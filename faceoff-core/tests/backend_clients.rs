use std::sync::Arc;

use anyhow::Context as _;
use faceoff_core::bench::{BenchConfig, Orchestrator, ReportStore};
use faceoff_core::{Backend as _, BackendError, GrpcBackend, GrpcConnectOptions, HttpBackend};
use faceoff_testserver::{GrpcTestServer, HttpTestServer, ResourceTable};

#[tokio::test]
async fn grpc_backend_round_trips_against_the_testserver() -> anyhow::Result<()> {
    let server = GrpcTestServer::start().await.context("start grpc server")?;

    let backend = GrpcBackend::connect(&server.target(), GrpcConnectOptions::default())
        .await
        .context("connect grpc backend")?;

    backend.query(1).await.context("query seed row")?;
    backend
        .mutate("Resource F".to_string(), "sixth".to_string())
        .await
        .context("create row")?;
    backend.stream(10).await.context("drain stream")?;

    // Unknown ids come back as a counted failure, not a transport error.
    match backend.query(9_999).await {
        Err(BackendError::Status { code, .. }) => {
            assert_eq!(code, tonic::Code::NotFound as u16);
        }
        other => panic!("expected a not-found status, got {other:?}"),
    }

    assert!(server.stats().requests_total() >= 4);
    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn http_backend_round_trips_against_the_testserver() -> anyhow::Result<()> {
    let server = HttpTestServer::start().await.context("start http server")?;

    let backend = HttpBackend::new(&server.base_url()).context("build http backend")?;

    backend.query(1).await.context("query seed row")?;
    backend
        .mutate("Resource F".to_string(), "sixth".to_string())
        .await
        .context("create row")?;
    backend.stream(10).await.context("drain stream")?;

    match backend.query(9_999).await {
        Err(BackendError::Status { code, .. }) => assert_eq!(code, 404),
        other => panic!("expected a 404 status, got {other:?}"),
    }

    assert!(server.stats().requests_total() >= 4);
    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn orchestrator_drives_both_real_backends() -> anyhow::Result<()> {
    // Shared table, like the bundled comparison service.
    let table = Arc::new(ResourceTable::default());
    let http_server = HttpTestServer::start_with_table(table.clone())
        .await
        .context("start http server")?;
    let grpc_server = GrpcTestServer::start_with_table(table)
        .await
        .context("start grpc server")?;

    let grpc = GrpcBackend::connect(&grpc_server.target(), GrpcConnectOptions::default())
        .await
        .context("connect grpc backend")?;
    let http = HttpBackend::new(&http_server.base_url()).context("build http backend")?;

    let config = BenchConfig {
        concurrency_levels: vec![1, 3],
        stream_items: 8,
        query_id_max: 5,
    };
    let store = Arc::new(ReportStore::default());
    let orchestrator = Orchestrator::new(grpc, http, config, store.clone());

    let report = tokio::time::timeout(std::time::Duration::from_secs(30), orchestrator.run())
        .await
        .context("benchmark run timed out")?
        .context("benchmark run failed")?;

    assert_eq!(report.backends[0].name, "grpc");
    assert_eq!(report.backends[1].name, "http");
    for side in &report.backends {
        assert_eq!(side.scalability.query.len(), 2);
        assert_eq!(side.scalability.mutation.len(), 2);
        for stats in side.scalability.query.iter().chain(&side.scalability.mutation) {
            assert_eq!(
                stats.error_rate, 0.0,
                "{} saw failures against the local testserver",
                side.name
            );
        }
        assert!(side.streaming.throughput > 0.0);
    }

    assert!(store.get().is_some());

    http_server.shutdown().await;
    grpc_server.shutdown().await;
    Ok(())
}
