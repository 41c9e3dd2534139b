//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants (e.g. byte sizes) from primary ones to avoid drift.
//!
//! # Dimension Invariants
//!
//! The embedding dimension is treated as a compile-time invariant across the
//! model, vector, and engine modules. If you need runtime-configurable
//! dimensions:
//!
//! 1. Use [`DimConfig`] to pass dimensions through initialization
//! 2. Use [`validate_embedding_dim`] at module boundaries to catch mismatches early
//! 3. The compile-time constants remain as defaults and for static size calculations

pub const DEFAULT_EMBEDDING_DIM: usize = 1536;
pub const EMBEDDING_F16_BYTES: usize = DEFAULT_EMBEDDING_DIM * 2;
pub const EMBEDDING_F32_BYTES: usize = DEFAULT_EMBEDDING_DIM * 4;

/// Shortlist floor for the vector stage: top-M by similarity.
pub const DEFAULT_VECTOR_TOP_M: usize = 50;

/// Similarity threshold (on the [0,1] mapped scale) above which a candidate
/// always enters the shortlist.
pub const DEFAULT_RETRIEVAL_THRESHOLD: f32 = 0.65;

/// Maximum shortlist advanced to eligibility and fusion.
pub const DEFAULT_SHORTLIST_SIZE: usize = 100;

/// Maximum candidates advanced to the semantic judge.
pub const DEFAULT_RERANK_POOL_SIZE: usize = 20;

pub const DEFAULT_TOP_K: usize = 5;

/// Runtime dimension configuration for callers whose embedding provider does
/// not produce the default 1536-dimensional vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimConfig {
    /// The embedding vector dimension (number of floats).
    pub embedding_dim: usize,
}

impl Default for DimConfig {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl DimConfig {
    /// Creates a new dimension configuration with the specified embedding dimension.
    pub fn new(embedding_dim: usize) -> Self {
        Self { embedding_dim }
    }

    /// Validates that this configuration is internally consistent.
    pub fn validate(&self) -> Result<(), DimValidationError> {
        if self.embedding_dim == 0 {
            return Err(DimValidationError::ZeroDimension);
        }
        Ok(())
    }

    /// Byte size of one embedding stored as little-endian f16.
    pub fn f16_bytes(&self) -> usize {
        self.embedding_dim * 2
    }

    /// Byte size of one embedding stored as f32.
    pub fn f32_bytes(&self) -> usize {
        self.embedding_dim * 4
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DimValidationError {
    #[error("embedding dimension cannot be zero")]
    ZeroDimension,

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Validates an embedding dimension against the expected value at a module boundary.
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
