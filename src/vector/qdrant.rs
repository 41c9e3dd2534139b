//! Qdrant-backed retrieval for populations whose embeddings live in an
//! external collection instead of the in-memory snapshot.

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder,
};
use std::collections::HashMap;

use super::error::VectorError;
use super::{RetrievalParams, VectorRetrieval, VectorSearchBackend, cut_shortlist, unit_similarity};
use crate::catalog::CompanySnapshot;
use crate::hashing::hash_to_u64;
use crate::model::{Company, Embedding};

/// Default collection holding company embeddings.
pub const DEFAULT_COLLECTION_NAME: &str = "fundmatch_companies";

#[derive(Clone)]
/// Retrieval backend over a Qdrant collection of company embeddings.
///
/// Point ids are BLAKE3 hashes of the company id; the payload carries the
/// company id string so hits map back to snapshot members.
pub struct QdrantRetriever {
    client: Qdrant,
    url: String,
    collection: String,
}

impl QdrantRetriever {
    /// Creates a retriever for `url` and `collection`.
    pub async fn new(url: &str, collection: &str) -> Result<Self, VectorError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.to_string(),
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Ensures the collection exists with cosine distance.
    pub async fn ensure_collection(&self, vector_size: u64) -> Result<(), VectorError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| VectorError::CreateCollectionFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        if exists {
            return Ok(());
        }

        let vectors_config = VectorParamsBuilder::new(vector_size, Distance::Cosine);

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(vectors_config)
                    .on_disk_payload(true),
            )
            .await
            .map_err(|e| VectorError::CreateCollectionFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    /// Upserts every embedded company in the snapshot into the collection.
    pub async fn index_snapshot(&self, snapshot: &CompanySnapshot) -> Result<(), VectorError> {
        let points: Vec<PointStruct> = snapshot
            .companies
            .iter()
            .filter_map(company_point)
            .collect();

        if points.is_empty() {
            return Ok(());
        }

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| VectorError::UpsertFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }
}

fn company_point(company: &Company) -> Option<PointStruct> {
    let embedding = company.embedding.as_ref()?;

    let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
    payload.insert("company_id".to_string(), company.company_id.clone().into());

    Some(PointStruct::new(
        hash_to_u64(company.company_id.as_bytes()),
        embedding.to_f32(),
        payload,
    ))
}

impl VectorSearchBackend for QdrantRetriever {
    async fn retrieve(
        &self,
        query: &Embedding,
        snapshot: &CompanySnapshot,
        params: &RetrievalParams,
    ) -> Result<VectorRetrieval, VectorError> {
        // Over-fetch so the threshold arm of the cut is not clipped by the
        // search limit on dense populations.
        let limit = snapshot.companies.len().max(params.top_m) as u64;

        let search_builder =
            SearchPointsBuilder::new(&self.collection, query.to_f32(), limit).with_payload(true);

        let search_result = self
            .client
            .search_points(search_builder)
            .await
            .map_err(|e| VectorError::SearchFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        let mut ordered: Vec<(String, f32)> = search_result
            .result
            .into_iter()
            .filter_map(|point| {
                let company_id = point
                    .payload
                    .get("company_id")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string())?;

                // Only score candidates still present in the snapshot.
                snapshot
                    .contains(&company_id)
                    .then(|| (company_id, unit_similarity(point.score)))
            })
            .collect();

        ordered.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        let shortlist = cut_shortlist(&ordered, params);
        let similarities = ordered.into_iter().collect();

        Ok(VectorRetrieval {
            similarities,
            shortlist,
        })
    }
}
