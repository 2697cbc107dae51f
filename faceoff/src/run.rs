use std::sync::Arc;

use faceoff_core::bench::{BenchConfig, Orchestrator, ReportStore};

use crate::backends::Backends;
use crate::cli::{BenchArgs, RunArgs};
use crate::output;
use crate::run_error::RunError;

pub async fn run(args: RunArgs) -> Result<(), RunError> {
    let out = output::formatter(args.output);
    let config = bench_config(&args.bench)?;

    let backends = Backends::connect(&args.backends).await?;

    let store = Arc::new(ReportStore::default());
    let mut orchestrator =
        Orchestrator::new(backends.grpc.clone(), backends.http.clone(), config, store);
    if let Some(progress) = out.progress() {
        orchestrator = orchestrator.with_progress(progress);
    }

    let report = orchestrator
        .run()
        .await
        .map_err(|err| RunError::RuntimeError(err.into()))?;

    out.print_report(&report).map_err(RunError::RuntimeError)?;

    backends.shutdown().await;
    Ok(())
}

pub fn bench_config(args: &BenchArgs) -> Result<BenchConfig, RunError> {
    let mut config = BenchConfig::default();
    if let Some(levels) = &args.levels {
        config.concurrency_levels = levels.clone();
    }
    if let Some(stream_items) = args.stream_items {
        config.stream_items = stream_items;
    }

    config
        .validate()
        .map_err(|err| RunError::InvalidInput(err.into()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bench_config_applies_overrides() {
        let config = match bench_config(&BenchArgs {
            levels: Some(vec![1, 2, 8]),
            stream_items: Some(25),
        }) {
            Ok(v) => v,
            Err(err) => panic!("config rejected: {err}"),
        };

        assert_eq!(config.concurrency_levels, vec![1, 2, 8]);
        assert_eq!(config.stream_items, 25);
    }

    #[test]
    fn bench_config_rejects_unordered_levels() {
        let result = bench_config(&BenchArgs {
            levels: Some(vec![5, 1]),
            stream_items: None,
        });

        match result {
            Err(RunError::InvalidInput(_)) => {}
            Err(other) => panic!("expected invalid input, got {other}"),
            Ok(_) => panic!("unordered levels should be rejected"),
        }
    }
}
