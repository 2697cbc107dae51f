use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt as _, Full};
use hyper::Request;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::Deserialize;

use crate::backend::{Backend, BackendError, Result as BackendResult};

use super::{Error, Result};

/// HTTP/JSON side of the comparison. Cheap to clone: the hyper client
/// shares its connection pool.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    inner: Client<HttpConnector, Full<Bytes>>,
    base_url: Arc<str>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct ResourceBody {
    id: i32,
    name: String,
    description: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed =
            url::Url::parse(base_url).map_err(|_| Error::InvalidUrl(base_url.to_string()))?;
        if parsed.scheme() != "http" {
            return Err(Error::OnlyHttpSupported(base_url.to_string()));
        }

        let mut connector = HttpConnector::new();
        connector.enforce_http(false);
        let inner = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            inner,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    async fn execute(
        inner: Client<HttpConnector, Full<Bytes>>,
        req: Request<Full<Bytes>>,
    ) -> BackendResult<Bytes> {
        let res = inner
            .request(req)
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = res.status();
        let body = res
            .into_body()
            .collect()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?
            .to_bytes();

        if !status.is_success() {
            return Err(BackendError::Status {
                code: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body)
    }
}

impl Backend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    fn query(&self, id: i32) -> impl Future<Output = BackendResult<()>> + Send + use<> {
        let inner = self.inner.clone();
        let url = format!("{}/resources/{id}", self.base_url);
        async move {
            let req = Request::builder()
                .method(http::Method::GET)
                .uri(url)
                .body(Full::default())
                .map_err(|e| BackendError::Transport(e.to_string()))?;

            Self::execute(inner, req).await.map(drop)
        }
    }

    fn mutate(
        &self,
        name: String,
        description: String,
    ) -> impl Future<Output = BackendResult<()>> + Send + use<> {
        let inner = self.inner.clone();
        let url = format!("{}/resources", self.base_url);
        async move {
            let body = serde_json::json!({ "name": name, "description": description });
            let body = serde_json::to_vec(&body)
                .map_err(|e| BackendError::Decode(e.to_string()))?;

            let req = Request::builder()
                .method(http::Method::POST)
                .uri(url)
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Full::new(Bytes::from(body)))
                .map_err(|e| BackendError::Transport(e.to_string()))?;

            Self::execute(inner, req).await.map(drop)
        }
    }

    fn stream(&self, count: u32) -> impl Future<Output = BackendResult<()>> + Send + 'static {
        let inner = self.inner.clone();
        let url = format!("{}/resources/stream?count={count}", self.base_url);
        async move {
            let req = Request::builder()
                .method(http::Method::GET)
                .uri(url)
                .body(Full::default())
                .map_err(|e| BackendError::Transport(e.to_string()))?;

            let body = Self::execute(inner, req).await?;
            let items: Vec<ResourceBody> = serde_json::from_slice(&body)
                .map_err(|e| BackendError::Decode(e.to_string()))?;

            let got = items.len().min(u32::MAX as usize) as u32;
            if got < count {
                return Err(BackendError::ShortStream { want: count, got });
            }
            Ok(())
        }
    }
}
