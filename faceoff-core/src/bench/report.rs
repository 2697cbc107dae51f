use serde::Serialize;

use super::clock::round2;

/// Operation kinds driven against each backend at every concurrency level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Query,
    Mutation,
}

impl OpKind {
    pub const ALL: [OpKind; 2] = [OpKind::Query, OpKind::Mutation];
}

/// Aggregate for one batch of concurrent invocations.
///
/// `total_ms` is the wall time of the whole batch, not a per-operation
/// mean. It serializes as `avgLatency` because consumers of the report
/// format read it under that name; the value itself must keep meaning
/// "batch wall time".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    pub concurrency: u64,
    #[serde(rename = "avgLatency")]
    pub total_ms: f64,
    /// Operations per second over the batch span.
    pub throughput: f64,
    /// Failed invocations as a percentage of the batch, 0–100.
    #[serde(rename = "errorRate")]
    pub error_rate: f64,
}

/// Single-shot score for a fixed-size streaming batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamStats {
    #[serde(rename = "avgLatency")]
    pub total_ms: f64,
    /// Items per second implied by the batch size over `total_ms`.
    pub throughput: f64,
    /// Fixed at 0: streaming failures are not surfaced by the single-shot
    /// runner.
    #[serde(rename = "errorRate")]
    pub error_rate: f64,
}

impl StreamStats {
    /// Scores `items` received in `total_ms` of wall time.
    #[must_use]
    pub fn from_single_shot(items: u32, total_ms: f64) -> Self {
        let throughput = f64::from(items) / (total_ms / 1_000.0).max(1e-9);
        Self {
            total_ms: round2(total_ms),
            throughput: round2(throughput),
            error_rate: 0.0,
        }
    }
}

/// Point-in-time CPU and memory reading for one process.
///
/// `cpu_percent` follows sysinfo semantics: a percentage of a single core,
/// so it can exceed 100 on multi-core hosts. `memory_mb` is resident set
/// size normalized to MiB (1 MiB = 1024×1024 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuSnapshot {
    pub cpu_percent: f64,
    pub memory_mb: f64,
}

impl CpuSnapshot {
    #[must_use]
    pub fn new(cpu_percent: f64, memory_mb: f64) -> Self {
        Self {
            cpu_percent: round2(cpu_percent),
            memory_mb: round2(memory_mb),
        }
    }

    /// The degraded reading used when sampling fails.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            cpu_percent: 0.0,
            memory_mb: 0.0,
        }
    }
}

/// Resource usage over a whole run: one snapshot before any load, one
/// after all load, and the arithmetic mean of the two CPU percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CpuUsage {
    #[serde(rename = "initial")]
    pub start: CpuSnapshot,
    #[serde(rename = "final")]
    pub end: CpuSnapshot,
    pub average: f64,
}

impl CpuUsage {
    #[must_use]
    pub fn between(start: CpuSnapshot, end: CpuSnapshot) -> Self {
        let average = round2((start.cpu_percent + end.cpu_percent) / 2.0);
        Self {
            start,
            end,
            average,
        }
    }
}

/// Per-kind batch sequences, one entry per concurrency level in ascending
/// level order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScalabilityStats {
    pub query: Vec<BatchStats>,
    pub mutation: Vec<BatchStats>,
}

impl ScalabilityStats {
    pub fn push(&mut self, kind: OpKind, stats: BatchStats) {
        match kind {
            OpKind::Query => self.query.push(stats),
            OpKind::Mutation => self.mutation.push(stats),
        }
    }

    #[must_use]
    pub fn for_kind(&self, kind: OpKind) -> &[BatchStats] {
        match kind {
            OpKind::Query => &self.query,
            OpKind::Mutation => &self.mutation,
        }
    }
}

/// Everything measured for one side of the comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendReport {
    pub name: String,
    pub scalability: ScalabilityStats,
    pub streaming: StreamStats,
}

/// The complete, immutable result of one successful benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkReport {
    pub backends: [BackendReport; 2],
    pub cpu_usage: CpuUsage,
}
