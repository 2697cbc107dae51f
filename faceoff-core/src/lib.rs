mod backend;
#[cfg(feature = "grpc")]
mod grpc;
#[cfg(feature = "http")]
mod http;

pub mod bench;

pub use backend::{Backend, BackendError};
#[cfg(feature = "grpc")]
pub use grpc::{
    ConnectOptions as GrpcConnectOptions, Error as GrpcError, GrpcBackend,
};
#[cfg(feature = "http")]
pub use http::{Error as HttpError, HttpBackend};
