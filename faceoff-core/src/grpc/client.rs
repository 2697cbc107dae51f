use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use faceoff_proto::comparison::resource_service_client::ResourceServiceClient;
use faceoff_proto::comparison::{
    CreateResourceRequest, GetResourceRequest, StreamResourcesRequest,
};
use tonic::transport::{Channel, Endpoint};

use crate::backend::{Backend, BackendError, Result as BackendResult};

use super::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    pub timeout: Option<Duration>,
    /// Number of HTTP/2 channels to spread calls over. Zero means one.
    pub pool_size: usize,
}

/// gRPC side of the comparison. Cheap to clone: channels are shared and
/// calls round-robin across the pool.
#[derive(Debug, Clone)]
pub struct GrpcBackend {
    channels: Arc<[Channel]>,
    rr: Arc<AtomicUsize>,
}

impl GrpcBackend {
    pub async fn connect(target: &str, opts: ConnectOptions) -> Result<Self> {
        let pool_size = opts.pool_size.max(1);

        let uri = if target.contains("://") {
            target.to_string()
        } else {
            format!("http://{target}")
        };

        let mut endpoint = Endpoint::from_shared(uri)?;
        endpoint = endpoint.tcp_nodelay(true);
        if let Some(timeout) = opts.timeout {
            endpoint = endpoint.connect_timeout(timeout);
        }

        let mut channels: Vec<Channel> = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let channel = endpoint.clone().connect().await.map_err(Error::Connect)?;
            channels.push(channel);
        }

        Ok(Self {
            channels: Arc::from(channels.into_boxed_slice()),
            rr: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn channel(&self) -> Channel {
        let i = self.rr.fetch_add(1, Ordering::Relaxed);
        // Invariant: connect ensures at least one channel.
        self.channels[i % self.channels.len()].clone()
    }
}

impl Backend for GrpcBackend {
    fn name(&self) -> &str {
        "grpc"
    }

    fn query(&self, id: i32) -> impl Future<Output = BackendResult<()>> + Send + use<> {
        let channel = self.channel();
        async move {
            let mut client = ResourceServiceClient::new(channel);
            client
                .get_resource(GetResourceRequest { id })
                .await
                .map_err(status_error)?;
            Ok(())
        }
    }

    fn mutate(
        &self,
        name: String,
        description: String,
    ) -> impl Future<Output = BackendResult<()>> + Send + use<> {
        let channel = self.channel();
        async move {
            let mut client = ResourceServiceClient::new(channel);
            client
                .create_resource(CreateResourceRequest { name, description })
                .await
                .map_err(status_error)?;
            Ok(())
        }
    }

    fn stream(&self, count: u32) -> impl Future<Output = BackendResult<()>> + Send + 'static {
        let channel = self.channel();
        async move {
            let mut client = ResourceServiceClient::new(channel);
            let mut stream = client
                .stream_resources(StreamResourcesRequest {
                    count: count.min(i32::MAX as u32) as i32,
                })
                .await
                .map_err(status_error)?
                .into_inner();

            let mut got: u32 = 0;
            while let Some(_item) = stream.message().await.map_err(status_error)? {
                got = got.saturating_add(1);
            }

            if got < count {
                return Err(BackendError::ShortStream { want: count, got });
            }
            Ok(())
        }
    }
}

fn status_error(status: tonic::Status) -> BackendError {
    BackendError::Status {
        code: status.code() as u16,
        message: status.message().to_string(),
    }
}
