use crate::budget::ESTIMATED_ASSESSMENT_COST_EUR;
use crate::constants::DEFAULT_RERANK_POOL_SIZE;

/// Default per-candidate judge deadline.
pub const DEFAULT_JUDGE_TIMEOUT_SECS: u64 = 10;

/// Default number of in-flight judge calls.
pub const DEFAULT_JUDGE_CONCURRENCY: usize = 4;

/// Re-ranking stage configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RerankConfig {
    /// Maximum candidates advanced to the judge.
    pub pool_size: usize,

    /// Per-candidate deadline in seconds.
    pub timeout_secs: u64,

    /// Maximum in-flight judge calls.
    pub concurrency: usize,

    /// Estimated cost of one assessment (EUR), presented to the budget
    /// guard before each call.
    pub estimated_call_cost_eur: f64,
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_RERANK_POOL_SIZE,
            timeout_secs: DEFAULT_JUDGE_TIMEOUT_SECS,
            concurrency: DEFAULT_JUDGE_CONCURRENCY,
            estimated_call_cost_eur: ESTIMATED_ASSESSMENT_COST_EUR,
        }
    }
}
