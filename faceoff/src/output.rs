use faceoff_core::bench::{BenchmarkReport, ProgressFn};

use crate::cli::OutputFormat;

mod human;
mod json;

pub trait OutputFormatter: Send + Sync {
    /// Progress sink wired into the orchestrator, if this format has one.
    fn progress(&self) -> Option<ProgressFn>;

    fn print_report(&self, report: &BenchmarkReport) -> anyhow::Result<()>;
}

pub fn formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::HumanReadable => Box::new(human::HumanReadableOutput),
        OutputFormat::Json => Box::new(json::JsonOutput),
    }
}
