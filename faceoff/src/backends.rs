use std::time::Duration;

use anyhow::Context as _;
use faceoff_core::{GrpcBackend, GrpcConnectOptions, HttpBackend};
use faceoff_testserver::{GrpcTestServer, HttpTestServer, ResourceTable};

use crate::cli::BackendArgs;
use crate::run_error::RunError;

/// Connected backend clients plus the embedded reference servers, when the
/// run hosts its own.
pub struct Backends {
    pub grpc: GrpcBackend,
    pub http: HttpBackend,
    embedded: Option<Embedded>,
}

struct Embedded {
    http: HttpTestServer,
    grpc: GrpcTestServer,
}

impl Backends {
    pub async fn connect(args: &BackendArgs) -> Result<Self, RunError> {
        let supplied = args.grpc_target.is_some() || args.http_url.is_some();
        if args.embedded && supplied {
            return Err(RunError::InvalidInput(anyhow::anyhow!(
                "--embedded conflicts with --grpc-target/--http-url"
            )));
        }

        let (grpc_target, http_url, embedded) = if args.embedded {
            // Both reference servers share one resource table, like the
            // original comparison service.
            let table = std::sync::Arc::new(ResourceTable::default());
            let http = HttpTestServer::start_with_table(table.clone())
                .await
                .context("start embedded http backend")
                .map_err(RunError::RuntimeError)?;
            let grpc = GrpcTestServer::start_with_table(table)
                .await
                .context("start embedded grpc backend")
                .map_err(RunError::RuntimeError)?;

            let target = grpc.target();
            let url = http.base_url();
            (target, url, Some(Embedded { http, grpc }))
        } else {
            match (&args.grpc_target, &args.http_url) {
                (Some(target), Some(url)) => (target.clone(), url.clone(), None),
                _ => {
                    return Err(RunError::InvalidInput(anyhow::anyhow!(
                        "pass both --grpc-target and --http-url, or --embedded"
                    )));
                }
            }
        };

        let grpc = GrpcBackend::connect(
            &grpc_target,
            GrpcConnectOptions {
                timeout: Some(Duration::from_secs(5)),
                pool_size: 1,
            },
        )
        .await
        .with_context(|| format!("connect grpc backend: {grpc_target}"))
        .map_err(RunError::RuntimeError)?;

        let http = HttpBackend::new(&http_url)
            .with_context(|| format!("invalid http backend url: {http_url}"))
            .map_err(RunError::InvalidInput)?;

        Ok(Self {
            grpc,
            http,
            embedded,
        })
    }

    pub async fn shutdown(self) {
        if let Some(embedded) = self.embedded {
            embedded.http.shutdown().await;
            embedded.grpc.shutdown().await;
        }
    }
}
