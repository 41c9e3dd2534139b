use thiserror::Error;

use crate::catalog::CatalogError;

#[derive(Debug, Error)]
/// Definite failures of the `rank` operation.
///
/// Everything else (missing embeddings, judge outages, budget exhaustion)
/// degrades to null components and never surfaces here.
pub enum EngineError {
    /// The query incentive does not exist.
    #[error("incentive not found: {incentive_id}")]
    IncentiveNotFound {
        /// The id that failed to resolve.
        incentive_id: String,
    },

    /// The candidate population is empty.
    #[error("candidate population is empty")]
    EmptyPopulation,

    /// The catalog store failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
