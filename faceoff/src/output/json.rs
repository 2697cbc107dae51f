use faceoff_core::bench::{BenchmarkReport, ProgressFn};

use super::OutputFormatter;

pub(crate) struct JsonOutput;

impl OutputFormatter for JsonOutput {
    fn progress(&self) -> Option<ProgressFn> {
        None
    }

    fn print_report(&self, report: &BenchmarkReport) -> anyhow::Result<()> {
        let doc = serde_json::to_string_pretty(report)?;
        println!("{doc}");
        Ok(())
    }
}
