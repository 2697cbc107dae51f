use super::report::OpKind;

pub type Result<T> = std::result::Result<T, Error>;

/// Orchestration-stage failures.
///
/// Per-invocation operation failures never appear here — they are counted
/// into `errorRate` and discarded. Resource-sampling failures degrade to
/// zero snapshots. Only stage failures cross the orchestrator boundary,
/// and they abort the run without touching the stored report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("concurrency must be a positive integer")]
    InvalidConcurrency,

    #[error("`concurrency_levels` must be non-empty and strictly ascending")]
    InvalidLevels,

    #[error("`stream_items` must be a positive integer")]
    InvalidStreamItems,

    #[error("`query_id_max` must be a positive integer")]
    InvalidQueryIdMax,

    #[error("scalability stage failed for {backend}/{kind} at concurrency {level}: {source}")]
    Scalability {
        backend: String,
        kind: OpKind,
        level: u64,
        #[source]
        source: Box<Error>,
    },
}
