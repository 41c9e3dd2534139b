//! Read-only access to incentives and the candidate population snapshot.
//!
//! The engine never mutates entities: it resolves one incentive and takes
//! one immutable population snapshot per ranking request. Snapshot identity
//! is a content hash, so result caching keys stay honest when the
//! population changes.

pub mod error;


pub use error::CatalogError;

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::hashing::hash_to_u64;
use crate::model::{Company, Incentive};

/// An immutable view of the candidate population at ranking time.
#[derive(Debug, Clone)]
pub struct CompanySnapshot {
    /// Content-derived identity; equal populations hash equal.
    pub snapshot_id: u64,
    /// When the snapshot was taken.
    pub created_at: DateTime<Utc>,
    /// The population, in stable id order.
    pub companies: Arc<[Company]>,
    ids: Arc<HashSet<String>>,
}

impl CompanySnapshot {
    /// Builds a snapshot from a population, sorting by company id so equal
    /// populations produce byte-identical iteration order and snapshot ids.
    pub fn new(mut companies: Vec<Company>) -> Self {
        companies.sort_by(|a, b| a.company_id.cmp(&b.company_id));

        let mut hasher = blake3::Hasher::new();
        for company in &companies {
            hasher.update(company.company_id.as_bytes());
            hasher.update(b"|");
            if let Some(embedding) = &company.embedding {
                hasher.update(embedding.as_bytes());
            }
            hasher.update(b"\n");
        }
        let snapshot_id = hash_to_u64(hasher.finalize().as_bytes());

        let ids = companies
            .iter()
            .map(|c| c.company_id.clone())
            .collect::<HashSet<_>>();

        Self {
            snapshot_id,
            created_at: Utc::now(),
            companies: companies.into(),
            ids: Arc::new(ids),
        }
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    /// Returns `true` if the snapshot contains `company_id`.
    pub fn contains(&self, company_id: &str) -> bool {
        self.ids.contains(company_id)
    }

    /// Index of `company_id` in the stable order, if present.
    pub fn position(&self, company_id: &str) -> Option<usize> {
        self.companies
            .binary_search_by(|c| c.company_id.as_str().cmp(company_id))
            .ok()
    }
}

/// Read-only snapshot retrieval, the engine's only upstream data interface.
pub trait CatalogStore: Send + Sync {
    /// Resolves one incentive by id.
    fn incentive(
        &self,
        incentive_id: &str,
    ) -> impl std::future::Future<Output = Result<Incentive, CatalogError>> + Send;

    /// Takes the current population snapshot.
    fn snapshot(
        &self,
    ) -> impl std::future::Future<Output = Result<CompanySnapshot, CatalogError>> + Send;
}

/// In-memory catalog over pre-loaded entities.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    incentives: HashMap<String, Incentive>,
    snapshot: Option<CompanySnapshot>,
}

impl InMemoryCatalog {
    pub fn new(incentives: Vec<Incentive>, companies: Vec<Company>) -> Self {
        let incentives = incentives
            .into_iter()
            .map(|i| (i.incentive_id.clone(), i))
            .collect();

        Self {
            incentives,
            snapshot: Some(CompanySnapshot::new(companies)),
        }
    }

    /// Number of loaded incentives.
    pub fn incentive_count(&self) -> usize {
        self.incentives.len()
    }
}

impl CatalogStore for InMemoryCatalog {
    async fn incentive(&self, incentive_id: &str) -> Result<Incentive, CatalogError> {
        self.incentives
            .get(incentive_id)
            .cloned()
            .ok_or_else(|| CatalogError::IncentiveNotFound {
                incentive_id: incentive_id.to_string(),
            })
    }

    async fn snapshot(&self) -> Result<CompanySnapshot, CatalogError> {
        self.snapshot
            .clone()
            .ok_or_else(|| CatalogError::StoreFailed {
                message: "no population loaded".to_string(),
            })
    }
}
