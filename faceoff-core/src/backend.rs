use std::future::Future;

pub type Result<T> = std::result::Result<T, BackendError>;

/// A transport under benchmark.
///
/// Implementations are cheap to clone (connection handles shared behind
/// `Arc`) and hand back `'static` futures so the runner can spawn each
/// invocation as its own task. The engine never inspects an operation's
/// result beyond success or failure.
pub trait Backend: Clone + Send + Sync + 'static {
    /// Short label used in reports and stage-error context.
    fn name(&self) -> &str;

    /// Fetch one resource by id.
    fn query(&self, id: i32) -> impl Future<Output = Result<()>> + Send + use<Self>;

    /// Create one resource.
    fn mutate(
        &self,
        name: String,
        description: String,
    ) -> impl Future<Output = Result<()>> + Send + use<Self>;

    /// Receive a batch of `count` streamed resources to completion.
    fn stream(&self, count: u32) -> impl Future<Output = Result<()>> + Send + 'static;
}

/// Why a single invocation failed.
///
/// The concurrent runner only counts these; the detail exists for the
/// error-capturing single-shot wrapper and for diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {code}: {message}")]
    Status { code: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("stream ended after {got} of {want} items")]
    ShortStream { want: u32, got: u32 },
}
