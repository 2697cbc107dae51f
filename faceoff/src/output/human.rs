use std::fmt::Write as _;
use std::sync::Arc;

use faceoff_core::bench::{BenchmarkReport, OpKind, ProgressEvent, ProgressFn};

use super::OutputFormatter;

pub(crate) struct HumanReadableOutput;

impl OutputFormatter for HumanReadableOutput {
    fn progress(&self) -> Option<ProgressFn> {
        // Progress goes to stderr so stdout stays a clean report.
        Some(Arc::new(|event| match event {
            ProgressEvent::LevelStarted { level } => {
                eprintln!("--- concurrency level {level} ---");
            }
            ProgressEvent::BatchFinished {
                backend,
                kind,
                stats,
            } => {
                eprintln!(
                    "{backend}/{kind}: {:.2}ms total, {:.2} ops/s, {:.2}% errors",
                    stats.total_ms, stats.throughput, stats.error_rate
                );
            }
            ProgressEvent::StreamFinished { backend, stats } => {
                eprintln!(
                    "{backend}/streaming: {:.2}ms total, {:.2} items/s",
                    stats.total_ms, stats.throughput
                );
            }
        }))
    }

    fn print_report(&self, report: &BenchmarkReport) -> anyhow::Result<()> {
        print!("{}", render(report));
        Ok(())
    }
}

fn render(report: &BenchmarkReport) -> String {
    let mut out = String::new();

    out.push_str("benchmark report\n");

    for side in &report.backends {
        writeln!(&mut out, "backend: {}", side.name).ok();

        for kind in OpKind::ALL {
            writeln!(&mut out, "  {kind}:").ok();
            for stats in side.scalability.for_kind(kind) {
                writeln!(
                    &mut out,
                    "    level {:>4}: total {:.2}ms, {:.2} ops/s, errors {:.2}%",
                    stats.concurrency, stats.total_ms, stats.throughput, stats.error_rate
                )
                .ok();
            }
        }

        writeln!(
            &mut out,
            "  streaming: {:.2}ms total, {:.2} items/s, errors {:.2}%",
            side.streaming.total_ms, side.streaming.throughput, side.streaming.error_rate
        )
        .ok();

        out.push('\n');
    }

    writeln!(
        &mut out,
        "cpu: initial {:.2}% / {:.2} MiB, final {:.2}% / {:.2} MiB, avg {:.2}%",
        report.cpu_usage.start.cpu_percent,
        report.cpu_usage.start.memory_mb,
        report.cpu_usage.end.cpu_percent,
        report.cpu_usage.end.memory_mb,
        report.cpu_usage.average
    )
    .ok();

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use faceoff_core::bench::{
        BackendReport, BatchStats, CpuSnapshot, CpuUsage, ScalabilityStats, StreamStats,
    };

    fn sample_report() -> BenchmarkReport {
        let mut scalability = ScalabilityStats::default();
        for kind in OpKind::ALL {
            scalability.push(
                kind,
                BatchStats {
                    concurrency: 1,
                    total_ms: 0.52,
                    throughput: 1_923.07,
                    error_rate: 0.0,
                },
            );
        }

        let side = |name: &str| BackendReport {
            name: name.to_string(),
            scalability: scalability.clone(),
            streaming: StreamStats::from_single_shot(100, 5.12),
        };

        BenchmarkReport {
            backends: [side("grpc"), side("http")],
            cpu_usage: CpuUsage::between(
                CpuSnapshot::new(1.23, 64.0),
                CpuSnapshot::new(2.35, 65.2),
            ),
        }
    }

    #[test]
    fn render_lists_both_backends_and_cpu() {
        let text = render(&sample_report());

        assert!(text.contains("backend: grpc"));
        assert!(text.contains("backend: http"));
        assert!(text.contains("query:"));
        assert!(text.contains("mutation:"));
        assert!(text.contains("level    1: total 0.52ms"));
        assert!(text.contains("streaming: 5.12ms total"));
        assert!(text.contains("avg 1.79%"));
    }
}
