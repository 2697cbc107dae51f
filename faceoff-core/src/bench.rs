//! The benchmarking engine: timing, concurrent fan-out, aggregation,
//! resource sampling, and the orchestrated comparison matrix.

mod batch;
mod clock;
mod config;
mod error;
mod orchestrator;
mod report;
mod sampler;
mod single;
mod store;

pub use batch::run_batch;
pub use clock::{measure, millis, round2};
pub use config::{BenchConfig, DEFAULT_CONCURRENCY_LEVELS, DEFAULT_STREAM_ITEMS};
pub use error::{Error, Result};
pub use orchestrator::{Orchestrator, ProgressEvent, ProgressFn};
pub use report::{
    BackendReport, BatchStats, BenchmarkReport, CpuSnapshot, CpuUsage, OpKind, ScalabilityStats,
    StreamStats,
};
pub use sampler::sample;
pub use single::{time_single, time_single_captured};
pub use store::ReportStore;
