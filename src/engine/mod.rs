//! The matching engine: one `rank` operation composing retrieval, scoring,
//! eligibility, re-ranking, and fusion.
//!
//! Vector retrieval and lexical scoring are pure reads over an immutable
//! snapshot and run concurrently. The semantic stage is advisory: any
//! degradation there narrows to null components, never to a failed request.
//! A ranking request is a pure function of (incentive, snapshot, config)
//! plus external call outcomes.

pub mod error;


pub use error::EngineError;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::budget::BudgetGuard;
use crate::cache::{ContentCache, DEFAULT_RESULT_CACHE_CAPACITY};
use crate::catalog::{CatalogError, CatalogStore, CompanySnapshot};
use crate::config::{MatchConfig, RankConfig};
use crate::eligibility::{self, Penalty};
use crate::hashing::hash_rank_request;
use crate::lexical::LexicalIndex;
use crate::model::{Company, Incentive};
use crate::rank::{self, ComponentScores, MatchOutcome, ScoredCandidate};
use crate::rerank::{JudgmentCache, Reranker, RerankConfig, SemanticJudge};
use crate::vector::{RetrievalParams, VectorRetrieval, VectorSearchBackend};

/// Optional cache of ranked results, keyed by
/// (incentive, snapshot, parameters).
pub type ResultCache = ContentCache<Arc<Vec<MatchOutcome>>>;

/// The matching engine.
///
/// Generic over its four capabilities (catalog, vector backend, judge, and
/// budget guard) so tests swap any of them for mocks without touching the
/// pipeline.
pub struct MatchEngine<C, V, J, G>
where
    C: CatalogStore,
    V: VectorSearchBackend,
    J: SemanticJudge,
    G: BudgetGuard,
{
    catalog: C,
    retriever: V,
    reranker: Reranker<J>,
    guard: G,
    config: MatchConfig,
    result_cache: Option<ResultCache>,
}

impl<C, V, J, G> MatchEngine<C, V, J, G>
where
    C: CatalogStore,
    V: VectorSearchBackend,
    J: SemanticJudge,
    G: BudgetGuard,
{
    pub fn new(catalog: C, retriever: V, judge: J, guard: G, config: MatchConfig) -> Self {
        let rerank_config = RerankConfig {
            pool_size: config.rerank_pool_size,
            timeout_secs: config.judge_timeout_secs,
            concurrency: config.judge_concurrency,
            ..Default::default()
        };

        let reranker = Reranker::new(judge, rerank_config)
            .with_cache(JudgmentCache::new(config.judgment_cache_capacity));

        let result_cache = config
            .result_cache
            .then(|| ResultCache::new(DEFAULT_RESULT_CACHE_CAPACITY));

        Self {
            catalog,
            retriever,
            reranker,
            guard,
            config,
            result_cache,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Ranks the population against one incentive and returns the top `top_k`
    /// matches with score decompositions and explanations.
    ///
    /// Fails only when the incentive cannot be resolved, the population is
    /// empty, or the catalog store itself fails; partial signal degradation
    /// never fails the request.
    pub async fn rank(
        &self,
        incentive_id: &str,
        top_k: usize,
        config: &RankConfig,
    ) -> Result<Vec<MatchOutcome>, EngineError> {
        let request_id = Uuid::new_v4();

        let incentive = match self.catalog.incentive(incentive_id).await {
            Ok(incentive) => incentive,
            Err(CatalogError::IncentiveNotFound { incentive_id }) => {
                return Err(EngineError::IncentiveNotFound { incentive_id });
            }
            Err(err) => return Err(err.into()),
        };

        let snapshot = self.catalog.snapshot().await?;
        if snapshot.is_empty() {
            return Err(EngineError::EmptyPopulation);
        }

        let cache_key = hash_rank_request(
            incentive_id,
            snapshot.snapshot_id,
            &format!("{};k={top_k}", config.fingerprint()),
        );

        if let Some(cache) = &self.result_cache
            && let Some(cached) = cache.get(cache_key)
        {
            info!(
                request_id = %request_id,
                incentive_id = %incentive_id,
                "Serving ranked result from cache"
            );
            return Ok(cached.as_ref().clone());
        }

        info!(
            request_id = %request_id,
            incentive_id = %incentive_id,
            population = snapshot.len(),
            "Ranking request started"
        );

        // Vector and lexical signals are independent pure reads; run both at
        // once.
        let (vector, lexical_scores) = tokio::join!(
            self.retrieve_vector(&incentive, &snapshot, config),
            async { LexicalIndex::build(&snapshot.companies).score(&incentive.lexical_text()) },
        );

        let shortlist =
            self.build_shortlist(&incentive, &snapshot, &vector, &lexical_scores, config);

        // Judge only the head of the preliminary ranking.
        let pool: Vec<&Company> = shortlist
            .iter()
            .take(config.rerank_pool_size)
            .map(|entry| entry.company)
            .collect();
        let assessments = self
            .reranker
            .assess_pool(&incentive, &pool, &self.guard)
            .await;

        let candidates: Vec<ScoredCandidate> = shortlist
            .into_iter()
            .map(|entry| {
                let assessment = assessments.get(&entry.company.company_id);
                ScoredCandidate {
                    company_id: entry.company.company_id.clone(),
                    company_name: entry.company.name.clone(),
                    components: ComponentScores {
                        semantic: assessment.map(|a| a.score),
                        ..entry.components
                    },
                    penalty: entry.penalty,
                    justification: assessment.map(|a| a.justification.clone()).unwrap_or_default(),
                }
            })
            .collect();

        let outcomes = rank::aggregate(incentive_id, candidates, &config.weights, top_k);

        info!(
            request_id = %request_id,
            incentive_id = %incentive_id,
            matches = outcomes.len(),
            top_score = outcomes.first().map(|o| o.final_score).unwrap_or(0.0),
            "Ranking request complete"
        );

        if let Some(cache) = &self.result_cache {
            cache.insert(cache_key, Arc::new(outcomes.clone()));
        }

        Ok(outcomes)
    }

    /// Vector retrieval with degradation: a missing query embedding or a
    /// failed backend yields "no vector signal", not a failed request.
    async fn retrieve_vector(
        &self,
        incentive: &Incentive,
        snapshot: &CompanySnapshot,
        config: &RankConfig,
    ) -> VectorRetrieval {
        let Some(query_embedding) = &incentive.embedding else {
            warn!(
                incentive_id = %incentive.incentive_id,
                "Incentive has no embedding, ranking without vector signal"
            );
            return VectorRetrieval::default();
        };

        let params = RetrievalParams {
            threshold: config.retrieval_threshold,
            top_m: config.vector_top_m,
        };

        match self
            .retriever
            .retrieve(query_embedding, snapshot, &params)
            .await
        {
            Ok(retrieval) => retrieval,
            Err(err) => {
                warn!(
                    incentive_id = %incentive.incentive_id,
                    error = %err,
                    "Vector backend failed, ranking without vector signal"
                );
                VectorRetrieval::default()
            }
        }
    }

    /// Union of the vector and lexical shortlists, with eligibility applied
    /// and ordered by preliminary (non-semantic) score.
    fn build_shortlist<'s>(
        &self,
        incentive: &Incentive,
        snapshot: &'s CompanySnapshot,
        vector: &VectorRetrieval,
        lexical_scores: &[f32],
        config: &RankConfig,
    ) -> Vec<ShortlistEntry<'s>> {
        let mut member_ids: HashSet<&str> =
            vector.shortlist.iter().map(String::as_str).collect();

        // Lexical arm: the strongest positive-overlap candidates.
        let mut by_lexical: Vec<usize> = (0..lexical_scores.len())
            .filter(|&i| lexical_scores[i] > 0.0)
            .collect();
        by_lexical.sort_by(|&a, &b| {
            lexical_scores[b]
                .partial_cmp(&lexical_scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.cmp(&b))
        });
        for index in by_lexical.into_iter().take(config.shortlist_size) {
            member_ids.insert(&snapshot.companies[index].company_id);
        }

        let mut entries: Vec<ShortlistEntry<'s>> = snapshot
            .companies
            .iter()
            .enumerate()
            .filter(|(_, company)| member_ids.contains(company.company_id.as_str()))
            .map(|(index, company)| {
                let components = ComponentScores {
                    vector: vector.similarities.get(&company.company_id).copied(),
                    lexical: lexical_scores.get(index).copied(),
                    semantic: None,
                };
                let penalty =
                    eligibility::evaluate(&incentive.criteria, company, &config.penalties);

                ShortlistEntry {
                    company,
                    preliminary: rank::fuse(&components, &config.weights) * penalty.factor,
                    components,
                    penalty,
                }
            })
            .collect();

        entries.sort_by(|a, b| {
            b.preliminary
                .partial_cmp(&a.preliminary)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.company.company_id.cmp(&b.company.company_id))
        });
        entries.truncate(config.shortlist_size);

        entries
    }
}

struct ShortlistEntry<'s> {
    company: &'s Company,
    components: ComponentScores,
    penalty: Penalty,
    preliminary: f32,
}
