//! Generated protobuf/tonic types for the comparison resource service.

pub mod comparison {
    tonic::include_proto!("comparison");
}
