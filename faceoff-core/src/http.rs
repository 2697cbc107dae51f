mod client;

pub use client::HttpBackend;

pub type Result<T> = std::result::Result<T, Error>;

/// Construction-time failures. Per-call failures are
/// [`crate::BackendError`]s and are only ever counted by the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("only http:// targets are supported: {0}")]
    OnlyHttpSupported(String),
}
