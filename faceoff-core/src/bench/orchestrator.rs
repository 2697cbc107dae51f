use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::backend::Backend;

use super::batch::run_batch;
use super::config::BenchConfig;
use super::error::{Error, Result};
use super::report::{
    BackendReport, BatchStats, BenchmarkReport, CpuUsage, OpKind, ScalabilityStats, StreamStats,
};
use super::sampler;
use super::single::time_single;
use super::store::ReportStore;

/// Progress notification emitted as a run advances.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    LevelStarted {
        level: u64,
    },
    BatchFinished {
        backend: String,
        kind: OpKind,
        stats: BatchStats,
    },
    StreamFinished {
        backend: String,
        stats: StreamStats,
    },
}

pub type ProgressFn = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Drives the full comparison matrix for two competing backends and owns
/// the handoff of the finished report into the [`ReportStore`].
///
/// `run` is not reentrant-safe: concurrent invocations would race on the
/// shared store. Callers (the control surface) serialize runs externally.
pub struct Orchestrator<A, B> {
    first: A,
    second: B,
    config: BenchConfig,
    store: Arc<ReportStore>,
    progress: Option<ProgressFn>,
}

impl<A: Backend, B: Backend> Orchestrator<A, B> {
    pub fn new(first: A, second: B, config: BenchConfig, store: Arc<ReportStore>) -> Self {
        Self {
            first,
            second,
            config,
            store,
            progress: None,
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn store(&self) -> &Arc<ReportStore> {
        &self.store
    }

    /// Runs the whole benchmark and atomically replaces the stored report.
    ///
    /// Stages: initial resource snapshot, the level × kind × backend
    /// scalability matrix in ascending level order, one streaming
    /// single-shot per backend, final resource snapshot, report assembly.
    /// Any stage failure aborts the run with stage context; the previously
    /// stored report (or its absence) stays authoritative.
    pub async fn run(&self) -> Result<Arc<BenchmarkReport>> {
        let pid = std::process::id();
        let start_cpu = sampler::sample(pid).await;

        let mut first = ScalabilityStats::default();
        let mut second = ScalabilityStats::default();

        for &level in &self.config.concurrency_levels {
            self.emit(ProgressEvent::LevelStarted { level });
            for kind in OpKind::ALL {
                first.push(kind, self.scalability_batch(&self.first, kind, level).await?);
                second.push(
                    kind,
                    self.scalability_batch(&self.second, kind, level).await?,
                );
            }
        }

        let first_stream = self.stream_single(&self.first).await;
        let second_stream = self.stream_single(&self.second).await;

        let end_cpu = sampler::sample(pid).await;

        let report = Arc::new(BenchmarkReport {
            backends: [
                BackendReport {
                    name: self.first.name().to_string(),
                    scalability: first,
                    streaming: first_stream,
                },
                BackendReport {
                    name: self.second.name().to_string(),
                    scalability: second,
                    streaming: second_stream,
                },
            ],
            cpu_usage: CpuUsage::between(start_cpu, end_cpu),
        });

        self.store.set(report.clone());
        Ok(report)
    }

    async fn scalability_batch<T: Backend>(
        &self,
        backend: &T,
        kind: OpKind,
        level: u64,
    ) -> Result<BatchStats> {
        // Invocations rotate deterministically through ids/names so a
        // batch spreads over the seeded resource rows.
        let seq = Arc::new(AtomicI64::new(0));
        let id_max = i64::from(self.config.query_id_max);
        let label: Arc<str> = Arc::from(backend.name());

        let result = match kind {
            OpKind::Query => {
                let b = backend.clone();
                let seq = seq.clone();
                run_batch(
                    move || {
                        let n = seq.fetch_add(1, Ordering::Relaxed);
                        b.query((n % id_max + 1) as i32)
                    },
                    level,
                )
                .await
            }
            OpKind::Mutation => {
                let b = backend.clone();
                let seq = seq.clone();
                run_batch(
                    move || {
                        let n = seq.fetch_add(1, Ordering::Relaxed);
                        b.mutate(
                            format!("{label} scalability {n}"),
                            "created by benchmark".to_string(),
                        )
                    },
                    level,
                )
                .await
            }
        };

        match result {
            Ok(stats) => {
                self.emit(ProgressEvent::BatchFinished {
                    backend: backend.name().to_string(),
                    kind,
                    stats,
                });
                Ok(stats)
            }
            Err(source) => Err(Error::Scalability {
                backend: backend.name().to_string(),
                kind,
                level,
                source: Box::new(source),
            }),
        }
    }

    async fn stream_single<T: Backend>(&self, backend: &T) -> StreamStats {
        let items = self.config.stream_items;
        let total_ms = time_single(backend.stream(items)).await;
        let stats = StreamStats::from_single_shot(items, total_ms);
        self.emit(ProgressEvent::StreamFinished {
            backend: backend.name().to_string(),
            stats,
        });
        stats
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(progress) = &self.progress {
            progress(event);
        }
    }
}
