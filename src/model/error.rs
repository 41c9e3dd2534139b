use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised when constructing domain entities.
pub enum ModelError {
    /// Embedding bytes had the wrong length for the configured dimension.
    #[error("invalid embedding byte length: expected {expected} bytes, got {actual}")]
    InvalidEmbeddingBytesLength {
        /// Expected byte length.
        expected: usize,
        /// Actual byte length.
        actual: usize,
    },

    /// Embedding vector had the wrong dimension.
    #[error("invalid embedding dimension: expected {expected}, got {actual}")]
    InvalidEmbeddingDimension {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },
}
