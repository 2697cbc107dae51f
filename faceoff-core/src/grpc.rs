mod client;
mod error;

pub use client::{ConnectOptions, GrpcBackend};
pub use error::{Error, Result};
