use std::time::{Duration, Instant};

/// Awaits `fut` and returns its output together with the elapsed wall time.
///
/// Measured with `Instant`, so the value is monotonic and has
/// sub-millisecond resolution.
pub async fn measure<F: std::future::Future>(fut: F) -> (F::Output, Duration) {
    let started = Instant::now();
    let out = fut.await;
    (out, started.elapsed())
}

/// Elapsed time as fractional milliseconds.
#[must_use]
pub fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1_000.0
}

/// Rounds to two decimal places. Every aggregate value goes through this
/// before it is stored in a report.
#[must_use]
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(5.678), 5.68);
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(100.0), 100.0);
    }

    #[test]
    fn millis_converts_durations() {
        assert_eq!(millis(Duration::from_millis(250)), 250.0);
        assert_eq!(millis(Duration::from_micros(1_500)), 1.5);
        assert_eq!(millis(Duration::ZERO), 0.0);
    }

    #[tokio::test]
    async fn measure_tracks_a_sleep() {
        let ((), elapsed) = measure(tokio::time::sleep(Duration::from_millis(25))).await;
        assert!(elapsed >= Duration::from_millis(25));
        // Generous upper bound for loaded CI machines.
        assert!(elapsed < Duration::from_secs(5));
    }
}
