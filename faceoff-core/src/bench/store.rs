use std::sync::{Arc, Mutex};

use super::report::BenchmarkReport;

/// Holds the most recent benchmark report.
///
/// `set` replaces the stored report wholesale, and only the orchestrator
/// calls it, after a fully successful run. Readers observe either the
/// previous report or the new one — never a partially built value. No
/// history, no versioning.
#[derive(Debug, Default)]
pub struct ReportStore {
    current: Mutex<Option<Arc<BenchmarkReport>>>,
}

impl ReportStore {
    /// The last successfully stored report, or `None` if no run has ever
    /// completed.
    pub fn get(&self) -> Option<Arc<BenchmarkReport>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set(&self, report: Arc<BenchmarkReport>) {
        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::report::{
        BackendReport, CpuSnapshot, CpuUsage, ScalabilityStats, StreamStats,
    };

    fn report_named(first: &str, second: &str) -> Arc<BenchmarkReport> {
        let section = |name: &str| BackendReport {
            name: name.to_string(),
            scalability: ScalabilityStats::default(),
            streaming: StreamStats::from_single_shot(1, 1.0),
        };
        Arc::new(BenchmarkReport {
            backends: [section(first), section(second)],
            cpu_usage: CpuUsage::between(CpuSnapshot::zero(), CpuSnapshot::zero()),
        })
    }

    #[test]
    fn starts_with_no_report() {
        let store = ReportStore::default();
        assert!(store.get().is_none());
    }

    #[test]
    fn get_returns_the_stored_report() {
        let store = ReportStore::default();
        let report = report_named("grpc", "http");
        store.set(report.clone());

        match store.get() {
            Some(got) => assert!(Arc::ptr_eq(&got, &report)),
            None => panic!("expected a stored report"),
        }
    }

    #[test]
    fn set_replaces_wholesale() {
        let store = ReportStore::default();
        store.set(report_named("a", "b"));

        let replacement = report_named("c", "d");
        store.set(replacement.clone());

        match store.get() {
            Some(got) => {
                assert!(Arc::ptr_eq(&got, &replacement));
                assert_eq!(got.backends[0].name, "c");
            }
            None => panic!("expected a stored report"),
        }
    }
}
