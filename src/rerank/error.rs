use thiserror::Error;

#[derive(Debug, Error)]
/// Failures of one judge assessment.
///
/// The orchestrator retries transient failures once; definitive failures
/// fall back immediately. Either way the affected candidate degrades to a
/// null semantic component; a judge failure is never a ranking failure.
pub enum JudgeError {
    /// Transport-level failure (network, provider outage, rate limit).
    #[error("judge transport failure: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// The call exceeded the per-candidate deadline.
    #[error("judge call timed out after {timeout_secs}s")]
    Timeout {
        /// The deadline that was exceeded.
        timeout_secs: u64,
    },

    /// The response stayed malformed after the repair attempt.
    #[error("unparseable judge response: {message}")]
    Malformed {
        /// Error message.
        message: String,
    },

    /// The judge returned an empty or refused response.
    #[error("judge returned no assessment: {message}")]
    Refused {
        /// Error message.
        message: String,
    },
}

impl JudgeError {
    /// Transient failures are worth one retry; definitive ones are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, JudgeError::Transport { .. } | JudgeError::Timeout { .. })
    }
}
