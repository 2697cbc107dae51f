pub type Result<T> = std::result::Result<T, Error>;

/// Connect-time failures. Per-call failures are [`crate::BackendError`]s
/// and are only ever counted by the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] tonic::transport::Error),

    #[error("failed to connect: {0}")]
    Connect(#[source] tonic::transport::Error),
}
