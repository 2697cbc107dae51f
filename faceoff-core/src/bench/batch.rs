use std::time::Instant;

use super::clock::{millis, round2};
use super::error::{Error, Result};
use super::report::BatchStats;

/// Launches `concurrency` invocations of `make_op` together, waits for all
/// of them to settle, and aggregates the batch.
///
/// All invocations are spawned before any is awaited; the measured span
/// runs from just before the first spawn to just after the last task
/// settles, so the batch never waits on one invocation while others could
/// still run. A failed invocation (or a panicked task) only increments the
/// failure count — failure detail is discarded, and the batch itself never
/// fails early. No cancellation, no timeout.
pub async fn run_batch<F, Fut, E>(make_op: F, concurrency: u64) -> Result<BatchStats>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = std::result::Result<(), E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    if concurrency == 0 {
        return Err(Error::InvalidConcurrency);
    }

    let mut handles = Vec::with_capacity(concurrency as usize);
    let started = Instant::now();
    for _ in 0..concurrency {
        handles.push(tokio::spawn(make_op()));
    }

    let mut failures: u64 = 0;
    for handle in handles {
        match handle.await {
            Ok(Ok(())) => {}
            // An operation error and a task panic both settle the slot.
            Ok(Err(_)) | Err(_) => failures += 1,
        }
    }
    let span = started.elapsed();

    let total_ms = millis(span);
    let throughput = concurrency as f64 / span.as_secs_f64().max(1e-9);
    let error_rate = (failures as f64 / concurrency as f64) * 100.0;

    Ok(BatchStats {
        concurrency,
        total_ms: round2(total_ms),
        throughput: round2(throughput),
        error_rate: round2(error_rate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    #[derive(Debug, thiserror::Error)]
    #[error("stub failure")]
    struct StubError;

    type BoxedOp =
        std::pin::Pin<Box<dyn std::future::Future<Output = std::result::Result<(), StubError>> + Send>>;

    /// Operation factory that fails the first `failing` invocations and
    /// succeeds afterwards.
    fn mixed_ops(failing: u64) -> impl Fn() -> BoxedOp {
        let seq = Arc::new(AtomicU64::new(0));
        move || {
            let n = seq.fetch_add(1, Ordering::Relaxed);
            Box::pin(async move {
                if n < failing {
                    Err(StubError)
                } else {
                    Ok(())
                }
            })
        }
    }

    #[tokio::test]
    async fn rejects_zero_concurrency() {
        let result = run_batch(mixed_ops(0), 0).await;
        match result {
            Err(Error::InvalidConcurrency) => {}
            other => panic!("expected InvalidConcurrency, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_rate_is_exact_for_failure_mixes() {
        let stats = match run_batch(mixed_ops(0), 4).await {
            Ok(v) => v,
            Err(err) => panic!("batch failed: {err}"),
        };
        assert_eq!(stats.error_rate, 0.0);

        let stats = match run_batch(mixed_ops(1), 4).await {
            Ok(v) => v,
            Err(err) => panic!("batch failed: {err}"),
        };
        assert_eq!(stats.error_rate, 25.0);

        let stats = match run_batch(mixed_ops(3), 3).await {
            Ok(v) => v,
            Err(err) => panic!("batch failed: {err}"),
        };
        assert_eq!(stats.error_rate, 100.0);

        // 1/3 rounds to 33.33 under the two-decimal rule.
        let stats = match run_batch(mixed_ops(1), 3).await {
            Ok(v) => v,
            Err(err) => panic!("batch failed: {err}"),
        };
        assert_eq!(stats.error_rate, 33.33);
    }

    #[tokio::test]
    async fn a_panicked_task_counts_as_a_failure() {
        let seq = Arc::new(AtomicU64::new(0));
        let stats = match run_batch(
            move || -> BoxedOp {
                let n = seq.fetch_add(1, Ordering::Relaxed);
                Box::pin(async move {
                    if n == 0 {
                        panic!("stub panic");
                    }
                    Ok(())
                })
            },
            2,
        )
        .await
        {
            Ok(v) => v,
            Err(err) => panic!("batch failed: {err}"),
        };

        assert_eq!(stats.error_rate, 50.0);
    }

    #[tokio::test]
    async fn throughput_and_latency_derive_from_the_same_span() {
        let concurrency = 8;
        let stats = match run_batch(
            || async {
                tokio::time::sleep(Duration::from_millis(25)).await;
                Ok::<(), StubError>(())
            },
            concurrency,
        )
        .await
        {
            Ok(v) => v,
            Err(err) => panic!("batch failed: {err}"),
        };

        assert_eq!(stats.concurrency, concurrency);
        // throughput × span ≈ N; both sides carry only rounding error.
        let implied = stats.throughput * (stats.total_ms / 1_000.0);
        assert!(
            (implied - concurrency as f64).abs() < 0.1,
            "throughput {} and total_ms {} disagree on N={concurrency}",
            stats.throughput,
            stats.total_ms
        );
    }

    #[tokio::test]
    async fn batch_span_tracks_the_slowest_invocation() {
        let seq = Arc::new(AtomicU64::new(0));
        let stats = match run_batch(
            move || -> BoxedOp {
                let n = seq.fetch_add(1, Ordering::Relaxed);
                Box::pin(async move {
                    let delay = if n == 0 { 200 } else { 50 };
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    Ok(())
                })
            },
            10,
        )
        .await
        {
            Ok(v) => v,
            Err(err) => panic!("batch failed: {err}"),
        };

        // Concurrent: the batch finishes with the 200ms straggler, nowhere
        // near the 650ms a serialized run would need.
        assert!(stats.total_ms >= 200.0);
        assert!(
            stats.total_ms < 450.0,
            "batch took {}ms, invocations were not concurrent",
            stats.total_ms
        );
    }
}
