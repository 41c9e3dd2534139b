//! Semantic re-ranking: an advisory refinement pass over the shortlist head.
//!
//! Every failure path (guard refusal, timeout, transport error, malformed
//! response) degrades exactly one candidate to a null semantic component.
//! The stage never fails a ranking request and never blocks it
//! indefinitely: calls run under a per-candidate deadline with at most one
//! retry on transient failure, and bounded concurrency keeps the external
//! provider within its rate contract.

pub mod config;
pub mod error;
pub mod judge;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use config::RerankConfig;
pub use error::JudgeError;
pub use judge::{Assessment, GenAiJudge, SemanticJudge, summarize_company, summarize_incentive};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockJudge, MockOutcome};

use std::collections::HashMap;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::budget::BudgetGuard;
use crate::cache::ContentCache;
use crate::hashing::hash_assessment;
use crate::model::{Company, Incentive};

/// Injected cache of judge assessments, keyed by content hash.
pub type JudgmentCache = ContentCache<Assessment>;

/// Orchestrates judge calls over the re-rank pool.
pub struct Reranker<J: SemanticJudge> {
    judge: J,
    config: RerankConfig,
    cache: Option<JudgmentCache>,
}

impl<J: SemanticJudge> Reranker<J> {
    pub fn new(judge: J, config: RerankConfig) -> Self {
        Self {
            judge,
            config,
            cache: None,
        }
    }

    /// Attaches an assessment cache. Cache hits skip the budget guard
    /// entirely; they cost nothing.
    pub fn with_cache(mut self, cache: JudgmentCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &RerankConfig {
        &self.config
    }

    /// Assesses every candidate in `pool`, returning per-company
    /// assessments. Candidates absent from the result degraded to "signal
    /// absent".
    pub async fn assess_pool<G: BudgetGuard>(
        &self,
        incentive: &Incentive,
        pool: &[&Company],
        guard: &G,
    ) -> HashMap<String, Assessment> {
        if pool.is_empty() {
            return HashMap::new();
        }

        // Hard bound on judge exposure, whatever the caller shortlisted.
        let pool = &pool[..pool.len().min(self.config.pool_size)];

        let query_summary = summarize_incentive(incentive);
        let semaphore = Semaphore::new(self.config.concurrency.max(1));

        let futures = pool
            .iter()
            .map(|company| self.assess_one(&semaphore, &query_summary, company, guard));

        let assessments: HashMap<String, Assessment> =
            join_all(futures).await.into_iter().flatten().collect();

        info!(
            incentive_id = %incentive.incentive_id,
            pool = pool.len(),
            assessed = assessments.len(),
            degraded = pool.len() - assessments.len(),
            "Semantic re-ranking complete"
        );

        assessments
    }

    async fn assess_one<G: BudgetGuard>(
        &self,
        semaphore: &Semaphore,
        query_summary: &str,
        company: &Company,
        guard: &G,
    ) -> Option<(String, Assessment)> {
        let candidate_summary = summarize_company(company);
        let cache_key = hash_assessment(self.judge.name(), query_summary, &candidate_summary);

        if let Some(cache) = &self.cache
            && let Some(assessment) = cache.get(cache_key)
        {
            return Some((company.company_id.clone(), assessment));
        }

        // One initial attempt plus at most one retry on transient failure.
        for attempt in 0..2 {
            let Ok(_permit) = semaphore.acquire().await else {
                return None;
            };

            // Consulted under the permit so earlier calls' recorded spend is
            // visible before this one is admitted.
            if !guard.may_call(self.config.estimated_call_cost_eur) {
                warn!(
                    company_id = %company.company_id,
                    "Budget guard refused judge call, degrading to null semantic component"
                );
                return None;
            }

            let deadline = Duration::from_secs(self.config.timeout_secs);
            let outcome = timeout(deadline, self.judge.assess(query_summary, &candidate_summary))
                .await
                .map_err(|_| JudgeError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                })
                .and_then(|r| r);

            match outcome {
                Ok(assessment) => {
                    guard.record_cost(self.config.estimated_call_cost_eur);

                    if let Some(cache) = &self.cache {
                        cache.insert(cache_key, assessment.clone());
                    }

                    return Some((company.company_id.clone(), assessment));
                }
                Err(err) if err.is_transient() && attempt == 0 => {
                    warn!(
                        company_id = %company.company_id,
                        error = %err,
                        "Transient judge failure, retrying once"
                    );
                }
                Err(err) => {
                    if matches!(err, JudgeError::Malformed { .. }) {
                        // Tokens were spent even though the reply was unusable.
                        guard.record_cost(self.config.estimated_call_cost_eur);
                    }
                    warn!(
                        company_id = %company.company_id,
                        error = %err,
                        "Judge failure, degrading to null semantic component"
                    );
                    return None;
                }
            }
        }

        None
    }
}
