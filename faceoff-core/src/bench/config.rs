use super::error::{Error, Result};

/// Reference matrix of the comparison service.
pub const DEFAULT_CONCURRENCY_LEVELS: [u64; 6] = [1, 5, 10, 25, 50, 100];
pub const DEFAULT_STREAM_ITEMS: u32 = 100;

/// Shape of one benchmark run.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Batch sizes driven per operation kind per backend, strictly
    /// ascending.
    pub concurrency_levels: Vec<u64>,
    /// Items requested from each backend's stream in the single-shot pass.
    pub stream_items: u32,
    /// Inclusive upper bound of the resource ids query operations rotate
    /// through (the reference backends seed this many rows).
    pub query_id_max: i32,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            concurrency_levels: DEFAULT_CONCURRENCY_LEVELS.to_vec(),
            stream_items: DEFAULT_STREAM_ITEMS,
            query_id_max: 5,
        }
    }
}

impl BenchConfig {
    /// Rejects configurations the orchestrator would trip over mid-run.
    /// Callers building configs from user input validate before running;
    /// the orchestrator itself iterates levels as given.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency_levels.is_empty() {
            return Err(Error::InvalidLevels);
        }
        if self.concurrency_levels.contains(&0) {
            return Err(Error::InvalidConcurrency);
        }
        if !self.concurrency_levels.windows(2).all(|w| w[0] < w[1]) {
            return Err(Error::InvalidLevels);
        }
        if self.stream_items == 0 {
            return Err(Error::InvalidStreamItems);
        }
        if self.query_id_max <= 0 {
            return Err(Error::InvalidQueryIdMax);
        }
        Ok(())
    }
}
