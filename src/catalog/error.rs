use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by catalog stores.
pub enum CatalogError {
    /// No incentive with the given id.
    #[error("incentive not found: {incentive_id}")]
    IncentiveNotFound {
        /// The id that failed to resolve.
        incentive_id: String,
    },

    /// The backing store failed.
    #[error("catalog store failure: {message}")]
    StoreFailed {
        /// Error message.
        message: String,
    },
}
