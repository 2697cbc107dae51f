use super::clock::{measure, millis};

/// Times exactly one invocation of `op` to completion and returns the
/// elapsed wall time in milliseconds.
///
/// The operation's error is discarded by contract: streaming scenarios are
/// scored as time-to-receive-a-batch, not as a success/failure sample.
/// Callers that need failure visibility wrap the operation with
/// [`time_single_captured`] instead. No retry, no timeout — a hung
/// operation hangs the caller.
pub async fn time_single<Fut, E>(op: Fut) -> f64
where
    Fut: std::future::Future<Output = std::result::Result<(), E>>,
{
    let (_, elapsed) = measure(op).await;
    millis(elapsed)
}

/// Like [`time_single`], but hands the operation's outcome back to the
/// caller instead of discarding it.
pub async fn time_single_captured<Fut, E>(op: Fut) -> (f64, std::result::Result<(), E>)
where
    Fut: std::future::Future<Output = std::result::Result<(), E>>,
{
    let (out, elapsed) = measure(op).await;
    (millis(elapsed), out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug, thiserror::Error)]
    #[error("stub failure")]
    struct StubError;

    #[tokio::test]
    async fn times_a_successful_operation() {
        let elapsed_ms = time_single(async {
            tokio::time::sleep(Duration::from_millis(25)).await;
            Ok::<(), StubError>(())
        })
        .await;

        assert!(elapsed_ms >= 25.0);
        assert!(elapsed_ms < 5_000.0);
    }

    #[tokio::test]
    async fn swallows_the_operation_error() {
        let elapsed_ms = time_single(async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err::<(), StubError>(StubError)
        })
        .await;

        assert!(elapsed_ms >= 10.0);
    }

    #[tokio::test]
    async fn captured_variant_surfaces_the_outcome() {
        let (elapsed_ms, out) = time_single_captured(async { Err::<(), StubError>(StubError) }).await;

        assert!(elapsed_ms >= 0.0);
        assert!(out.is_err());

        let (_, out) = time_single_captured(async { Ok::<(), StubError>(()) }).await;
        assert!(out.is_ok());
    }
}
