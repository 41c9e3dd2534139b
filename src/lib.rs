//! Fundmatch library crate (used by embedding services and integration tests).
//!
//! # Public API Surface
//!
//! This crate ranks a snapshot population of companies against a public
//! funding incentive using four fused signals. The exports are organized by
//! module:
//!
//! ## Core Types (Stable)
//! - [`MatchConfig`], [`RankConfig`], [`ConfigError`] - Engine configuration
//! - [`Incentive`], [`Company`], [`EligibilityCriteria`] - Domain entities
//! - [`MatchEngine`], [`EngineError`] - The `rank` operation
//! - [`MatchOutcome`], [`ComponentScores`] - Ranked results
//!
//! ## Signals
//! - [`eligibility`] - Deterministic penalty rules
//! - [`LexicalIndex`] - BM25 relevance over the candidate corpus
//! - [`SnapshotRetriever`], [`QdrantRetriever`] - Vector retrieval backends
//! - [`Reranker`], [`SemanticJudge`], [`GenAiJudge`] - LLM re-ranking
//!
//! ## Capabilities
//! - [`CatalogStore`], [`InMemoryCatalog`] - Read-only entity access
//! - [`BudgetGuard`], [`RequestBudget`] - Judge spend control
//! - [`JudgmentCache`], [`ResultCache`] - Injected content-keyed caches
//!
//! ## Constants
//! Dimension and cut-off constants are exported for consistency across
//! modules. Prefer [`DimConfig`] for runtime dimension configuration.
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod budget;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod eligibility;
pub mod engine;
pub mod hashing;
pub mod lexical;
pub mod model;
pub mod rank;
pub mod rerank;
pub mod vector;

pub use budget::{
    BudgetGuard, DEFAULT_REQUEST_BUDGET_EUR, ESTIMATED_ASSESSMENT_COST_EUR, RequestBudget,
    Unmetered,
};
pub use cache::{
    ContentCache, DEFAULT_JUDGMENT_CACHE_CAPACITY, DEFAULT_RESULT_CACHE_CAPACITY,
};
pub use catalog::{CatalogError, CatalogStore, CompanySnapshot, InMemoryCatalog};
pub use config::{ConfigError, DEFAULT_JUDGE_MODEL, MatchConfig, RankConfig};
pub use constants::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_RERANK_POOL_SIZE, DEFAULT_RETRIEVAL_THRESHOLD,
    DEFAULT_SHORTLIST_SIZE, DEFAULT_TOP_K, DEFAULT_VECTOR_TOP_M, DimConfig, DimValidationError,
    validate_embedding_dim,
};
pub use eligibility::{FiredRule, Penalty, PenaltyConfig, PenaltyRule};
pub use engine::{EngineError, MatchEngine, ResultCache};
pub use hashing::{hash_assessment, hash_rank_request, hash_to_u64};
pub use lexical::{BM25_B, BM25_K1, LexicalIndex};
pub use model::{
    Company, EligibilityCriteria, Embedding, Incentive, ModelError, SizeClass, SizeRequirement,
};
pub use rank::{ComponentScores, FusionWeights, MatchOutcome, ScoredCandidate, aggregate, fuse};
#[cfg(any(test, feature = "mock"))]
pub use rerank::{MockJudge, MockOutcome};
pub use rerank::{
    Assessment, GenAiJudge, JudgeError, JudgmentCache, Reranker, RerankConfig, SemanticJudge,
};
pub use vector::{
    QdrantRetriever, RetrievalParams, SnapshotRetriever, VectorError, VectorRetrieval,
    VectorSearchBackend, cosine_similarity, unit_similarity,
};
