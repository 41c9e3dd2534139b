use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while loading or validating configuration.
pub enum ConfigError {
    /// A numeric environment variable failed to parse.
    #[error("invalid value for {var}: '{value}'")]
    InvalidNumber {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// Fusion weights were negative, non-finite, or all zero.
    #[error("invalid fusion weights: {fingerprint}")]
    InvalidWeights {
        /// The offending weight set.
        fingerprint: String,
    },

    /// A penalty multiplier fell outside (0,1].
    #[error("penalty multipliers must be in (0,1]: size={size}, sector={sector}, geography={geography}")]
    InvalidPenalties {
        size: f32,
        sector: f32,
        geography: f32,
    },

    /// A size parameter was zero.
    #[error("{name} must be non-zero")]
    ZeroSize {
        /// Parameter name.
        name: &'static str,
    },

    /// The retrieval threshold fell outside [0,1].
    #[error("retrieval threshold must be in [0,1], got {value}")]
    InvalidThreshold { value: f32 },
}
