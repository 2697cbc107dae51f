use std::net::SocketAddr;
use std::sync::Arc;

use faceoff_proto::comparison::resource_service_server::{
    ResourceService, ResourceServiceServer,
};
use faceoff_proto::comparison::{
    CreateResourceRequest, GetResourceRequest, Resource as PbResource, StreamResourcesRequest,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{Request, Response, Status};

use crate::{Resource, ResourceTable, TestServerStats};

impl From<Resource> for PbResource {
    fn from(row: Resource) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

#[derive(Debug)]
struct ResourceSvc {
    table: Arc<ResourceTable>,
    stats: TestServerStats,
}

#[tonic::async_trait]
impl ResourceService for ResourceSvc {
    async fn get_resource(
        &self,
        request: Request<GetResourceRequest>,
    ) -> Result<Response<PbResource>, Status> {
        self.stats.inc_requests_total();
        let id = request.into_inner().id;
        match self.table.get(id) {
            Some(row) => Ok(Response::new(row.into())),
            None => Err(Status::not_found(format!(
                "Resource with ID {id} not found"
            ))),
        }
    }

    async fn create_resource(
        &self,
        request: Request<CreateResourceRequest>,
    ) -> Result<Response<PbResource>, Status> {
        self.stats.inc_requests_total();
        let req = request.into_inner();
        let row = self.table.add(req.name, req.description);
        Ok(Response::new(row.into()))
    }

    type StreamResourcesStream =
        tokio_stream::Iter<std::vec::IntoIter<Result<PbResource, Status>>>;

    async fn stream_resources(
        &self,
        request: Request<StreamResourcesRequest>,
    ) -> Result<Response<Self::StreamResourcesStream>, Status> {
        self.stats.inc_requests_total();
        let count = request.into_inner().count.max(0) as usize;

        let items: Vec<Result<PbResource, Status>> = (0..count)
            .map(|seq| match self.table.nth(seq) {
                Some(row) => Ok(row.into()),
                None => Err(Status::internal("resource table is empty")),
            })
            .collect();

        Ok(Response::new(tokio_stream::iter(items)))
    }
}

/// gRPC reference backend bound to an ephemeral loopback port.
pub struct GrpcTestServer {
    addr: SocketAddr,
    stats: TestServerStats,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl GrpcTestServer {
    pub async fn start() -> std::io::Result<Self> {
        Self::start_with_table(Arc::new(ResourceTable::default())).await
    }

    pub async fn start_with_table(table: Arc<ResourceTable>) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let stats = TestServerStats::default();
        let svc = ResourceServiceServer::new(ResourceSvc {
            table,
            stats: stats.clone(),
        });

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let incoming = TcpListenerStream::new(listener);

            let server = tonic::transport::Server::builder()
                .add_service(svc)
                .serve_with_incoming_shutdown(incoming, async move {
                    let _ = shutdown_rx.await;
                });

            let _ = server.await;
        });

        Ok(Self {
            addr,
            stats,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn target(&self) -> String {
        format!("{}:{}", self.addr.ip(), self.addr.port())
    }

    pub fn stats(&self) -> &TestServerStats {
        &self.stats
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

impl Drop for GrpcTestServer {
    fn drop(&mut self) {
        if self.shutdown_tx.is_some()
            && let Some(task) = self.task.take()
        {
            task.abort();
        }
    }
}
