//! Dense-vector retrieval over candidate embeddings.
//!
//! Cosine similarity is mapped to [0,1] via `(cos + 1) / 2` so it composes
//! with the other unit-interval signals. The shortlist cut takes everything
//! above the retrieval threshold, or the top-M by similarity, whichever set
//! is larger, so a sparse population never starves the shortlist.

pub mod error;
pub mod qdrant;


pub use error::VectorError;
pub use qdrant::QdrantRetriever;

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::warn;

use crate::catalog::CompanySnapshot;
use crate::constants::{DEFAULT_RETRIEVAL_THRESHOLD, DEFAULT_VECTOR_TOP_M};
use crate::model::Embedding;

/// Shortlist-cut parameters for one retrieval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalParams {
    /// Unit-interval similarity above which a candidate always enters the
    /// shortlist.
    pub threshold: f32,
    /// Minimum shortlist depth by similarity rank.
    pub top_m: usize,
}

impl Default for RetrievalParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_RETRIEVAL_THRESHOLD,
            top_m: DEFAULT_VECTOR_TOP_M,
        }
    }
}

/// Output of one vector retrieval pass.
///
/// A candidate absent from `similarities` had no embedding: its vector
/// component is "signal absent" (null downstream), never 0.0.
#[derive(Debug, Clone, Default)]
pub struct VectorRetrieval {
    /// Unit-interval similarity per scored company id.
    pub similarities: HashMap<String, f32>,
    /// Company ids passing the shortlist cut, best first.
    pub shortlist: Vec<String>,
}

/// Async retrieval backend over an embedding store.
pub trait VectorSearchBackend: Send + Sync {
    /// Scores the snapshot population against `query` and applies the
    /// shortlist cut.
    fn retrieve(
        &self,
        query: &Embedding,
        snapshot: &CompanySnapshot,
        params: &RetrievalParams,
    ) -> impl std::future::Future<Output = Result<VectorRetrieval, VectorError>> + Send;
}

/// In-process backend: pure reads over the snapshot's own embeddings.
///
/// This is the default production path: the snapshot already carries every
/// candidate embedding, so retrieval is a scan, not a network call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotRetriever;

impl SnapshotRetriever {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous core, shared with tests.
    pub fn score_snapshot(
        query: &Embedding,
        snapshot: &CompanySnapshot,
        params: &RetrievalParams,
    ) -> VectorRetrieval {
        let query_f32 = query.to_f32();

        let mut scored: Vec<(String, f32)> = Vec::with_capacity(snapshot.companies.len());

        for company in snapshot.companies.iter() {
            let Some(embedding) = &company.embedding else {
                continue;
            };

            if embedding.dim() != query.dim() {
                warn!(
                    company_id = %company.company_id,
                    expected_dim = query.dim(),
                    actual_dim = embedding.dim(),
                    "Skipping candidate: embedding dimension mismatch"
                );
                continue;
            }

            let similarity = unit_similarity(cosine_similarity(&query_f32, &embedding.to_f32()));
            scored.push((company.company_id.clone(), similarity));
        }

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        let shortlist = cut_shortlist(&scored, params);
        let similarities = scored.into_iter().collect();

        VectorRetrieval {
            similarities,
            shortlist,
        }
    }
}

impl VectorSearchBackend for SnapshotRetriever {
    async fn retrieve(
        &self,
        query: &Embedding,
        snapshot: &CompanySnapshot,
        params: &RetrievalParams,
    ) -> Result<VectorRetrieval, VectorError> {
        Ok(Self::score_snapshot(query, snapshot, params))
    }
}

/// Applies the threshold-or-top-M cut to similarity-ordered candidates.
pub(crate) fn cut_shortlist(ordered: &[(String, f32)], params: &RetrievalParams) -> Vec<String> {
    let above_threshold = ordered
        .iter()
        .take_while(|(_, s)| *s >= params.threshold)
        .count();

    let cut = above_threshold.max(params.top_m.min(ordered.len()));

    ordered.iter().take(cut).map(|(id, _)| id.clone()).collect()
}

/// Cosine similarity in [-1,1]; 0.0 for mismatched or empty inputs.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) =
        a.iter()
            .zip(b.iter())
            .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&av, &bv)| {
                (dot + av * bv, na + av * av, nb + bv * bv)
            });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Maps cosine similarity from [-1,1] to [0,1].
#[inline]
pub fn unit_similarity(cosine: f32) -> f32 {
    ((cosine + 1.0) / 2.0).clamp(0.0, 1.0)
}
