//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `FUNDMATCH_*` environment
//! variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::str::FromStr;

use crate::budget::DEFAULT_REQUEST_BUDGET_EUR;
use crate::cache::DEFAULT_JUDGMENT_CACHE_CAPACITY;
use crate::constants::{
    DEFAULT_RERANK_POOL_SIZE, DEFAULT_RETRIEVAL_THRESHOLD, DEFAULT_SHORTLIST_SIZE, DEFAULT_TOP_K,
    DEFAULT_VECTOR_TOP_M,
};
use crate::eligibility::PenaltyConfig;
use crate::rank::FusionWeights;
use crate::rerank::config::{DEFAULT_JUDGE_CONCURRENCY, DEFAULT_JUDGE_TIMEOUT_SECS};

/// Default judge model identifier.
pub const DEFAULT_JUDGE_MODEL: &str = "gpt-4o-mini";

/// Engine configuration loaded from environment variables.
///
/// Use [`MatchConfig::from_env`] to read `FUNDMATCH_*` overrides on top of
/// defaults.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Fusion weights for the three signal components.
    pub weights: FusionWeights,

    /// Unit-interval similarity above which a candidate always enters the
    /// vector shortlist. Default: `0.65`.
    pub retrieval_threshold: f32,

    /// Vector shortlist floor (top-M by similarity). Default: `50`.
    pub vector_top_m: usize,

    /// Maximum shortlist advanced to fusion. Default: `100`.
    pub shortlist_size: usize,

    /// Maximum candidates advanced to the judge. Default: `20`.
    pub rerank_pool_size: usize,

    /// Result-set size. Default: `5`.
    pub top_k: usize,

    /// Judge model identifier. Default: `gpt-4o-mini`.
    pub judge_model: String,

    /// Per-candidate judge deadline in seconds. Default: `10`.
    pub judge_timeout_secs: u64,

    /// Maximum in-flight judge calls. Default: `4`.
    pub judge_concurrency: usize,

    /// Per-request judge budget ceiling in EUR. Default: `0.30`.
    pub request_budget_eur: f64,

    /// Eligibility penalty multipliers.
    pub penalties: PenaltyConfig,

    /// Whether to cache ranked results per (incentive, snapshot, params).
    /// Default: `true`.
    pub result_cache: bool,

    /// Capacity of the judge-assessment cache. Default: `10_000`.
    pub judgment_cache_capacity: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            weights: FusionWeights::default(),
            retrieval_threshold: DEFAULT_RETRIEVAL_THRESHOLD,
            vector_top_m: DEFAULT_VECTOR_TOP_M,
            shortlist_size: DEFAULT_SHORTLIST_SIZE,
            rerank_pool_size: DEFAULT_RERANK_POOL_SIZE,
            top_k: DEFAULT_TOP_K,
            judge_model: DEFAULT_JUDGE_MODEL.to_string(),
            judge_timeout_secs: DEFAULT_JUDGE_TIMEOUT_SECS,
            judge_concurrency: DEFAULT_JUDGE_CONCURRENCY,
            request_budget_eur: DEFAULT_REQUEST_BUDGET_EUR,
            penalties: PenaltyConfig::default(),
            result_cache: true,
            judgment_cache_capacity: DEFAULT_JUDGMENT_CACHE_CAPACITY,
        }
    }
}

impl MatchConfig {
    const ENV_WEIGHT_VECTOR: &'static str = "FUNDMATCH_WEIGHT_VECTOR";
    const ENV_WEIGHT_LEXICAL: &'static str = "FUNDMATCH_WEIGHT_LEXICAL";
    const ENV_WEIGHT_SEMANTIC: &'static str = "FUNDMATCH_WEIGHT_SEMANTIC";
    const ENV_RETRIEVAL_THRESHOLD: &'static str = "FUNDMATCH_RETRIEVAL_THRESHOLD";
    const ENV_VECTOR_TOP_M: &'static str = "FUNDMATCH_VECTOR_TOP_M";
    const ENV_SHORTLIST_SIZE: &'static str = "FUNDMATCH_SHORTLIST_SIZE";
    const ENV_RERANK_POOL_SIZE: &'static str = "FUNDMATCH_RERANK_POOL_SIZE";
    const ENV_TOP_K: &'static str = "FUNDMATCH_TOP_K";
    const ENV_JUDGE_MODEL: &'static str = "FUNDMATCH_JUDGE_MODEL";
    const ENV_JUDGE_TIMEOUT_SECS: &'static str = "FUNDMATCH_JUDGE_TIMEOUT_SECS";
    const ENV_JUDGE_CONCURRENCY: &'static str = "FUNDMATCH_JUDGE_CONCURRENCY";
    const ENV_REQUEST_BUDGET_EUR: &'static str = "FUNDMATCH_REQUEST_BUDGET_EUR";
    const ENV_PENALTY_SIZE: &'static str = "FUNDMATCH_PENALTY_SIZE";
    const ENV_PENALTY_SECTOR: &'static str = "FUNDMATCH_PENALTY_SECTOR";
    const ENV_PENALTY_GEOGRAPHY: &'static str = "FUNDMATCH_PENALTY_GEOGRAPHY";
    const ENV_RESULT_CACHE: &'static str = "FUNDMATCH_RESULT_CACHE";

    /// Loads configuration from environment variables (falling back to
    /// defaults), then validates.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            weights: FusionWeights {
                vector: parse_env(Self::ENV_WEIGHT_VECTOR, defaults.weights.vector)?,
                lexical: parse_env(Self::ENV_WEIGHT_LEXICAL, defaults.weights.lexical)?,
                semantic: parse_env(Self::ENV_WEIGHT_SEMANTIC, defaults.weights.semantic)?,
            },
            retrieval_threshold: parse_env(
                Self::ENV_RETRIEVAL_THRESHOLD,
                defaults.retrieval_threshold,
            )?,
            vector_top_m: parse_env(Self::ENV_VECTOR_TOP_M, defaults.vector_top_m)?,
            shortlist_size: parse_env(Self::ENV_SHORTLIST_SIZE, defaults.shortlist_size)?,
            rerank_pool_size: parse_env(Self::ENV_RERANK_POOL_SIZE, defaults.rerank_pool_size)?,
            top_k: parse_env(Self::ENV_TOP_K, defaults.top_k)?,
            judge_model: env::var(Self::ENV_JUDGE_MODEL).unwrap_or(defaults.judge_model),
            judge_timeout_secs: parse_env(
                Self::ENV_JUDGE_TIMEOUT_SECS,
                defaults.judge_timeout_secs,
            )?,
            judge_concurrency: parse_env(Self::ENV_JUDGE_CONCURRENCY, defaults.judge_concurrency)?,
            request_budget_eur: parse_env(
                Self::ENV_REQUEST_BUDGET_EUR,
                defaults.request_budget_eur,
            )?,
            penalties: PenaltyConfig {
                size: parse_env(Self::ENV_PENALTY_SIZE, defaults.penalties.size)?,
                sector: parse_env(Self::ENV_PENALTY_SECTOR, defaults.penalties.sector)?,
                geography: parse_env(Self::ENV_PENALTY_GEOGRAPHY, defaults.penalties.geography)?,
            },
            result_cache: parse_env(Self::ENV_RESULT_CACHE, defaults.result_cache)?,
            judgment_cache_capacity: defaults.judgment_cache_capacity,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates invariants the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.weights.is_valid() {
            return Err(ConfigError::InvalidWeights {
                fingerprint: self.weights.fingerprint(),
            });
        }

        if !self.penalties.is_valid() {
            return Err(ConfigError::InvalidPenalties {
                size: self.penalties.size,
                sector: self.penalties.sector,
                geography: self.penalties.geography,
            });
        }

        if !(0.0..=1.0).contains(&self.retrieval_threshold) {
            return Err(ConfigError::InvalidThreshold {
                value: self.retrieval_threshold,
            });
        }

        for (name, value) in [
            ("vector_top_m", self.vector_top_m),
            ("shortlist_size", self.shortlist_size),
            ("rerank_pool_size", self.rerank_pool_size),
            ("top_k", self.top_k),
            ("judge_concurrency", self.judge_concurrency),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroSize { name });
            }
        }

        if self.judge_timeout_secs == 0 {
            return Err(ConfigError::ZeroSize {
                name: "judge_timeout_secs",
            });
        }

        Ok(())
    }

    /// Derives the per-request parameter set from these defaults.
    pub fn rank_config(&self) -> RankConfig {
        RankConfig {
            weights: self.weights,
            retrieval_threshold: self.retrieval_threshold,
            vector_top_m: self.vector_top_m,
            shortlist_size: self.shortlist_size,
            rerank_pool_size: self.rerank_pool_size,
            penalties: self.penalties,
        }
    }
}

fn parse_env<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        Err(_) => Ok(default),
    }
}

/// Per-request ranking parameters, the `config` of the `rank` operation.
///
/// Defaults come from [`MatchConfig::rank_config`]; callers override fields
/// per request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankConfig {
    pub weights: FusionWeights,
    pub retrieval_threshold: f32,
    pub vector_top_m: usize,
    pub shortlist_size: usize,
    pub rerank_pool_size: usize,
    /// Eligibility penalty overrides.
    pub penalties: PenaltyConfig,
}

impl Default for RankConfig {
    fn default() -> Self {
        MatchConfig::default().rank_config()
    }
}

impl RankConfig {
    /// Stable fingerprint of every parameter that influences a ranked
    /// result. Part of the result-cache key.
    pub fn fingerprint(&self) -> String {
        format!(
            "{};t={:.4};m={};s={};r={};p={:.3}/{:.3}/{:.3}",
            self.weights.fingerprint(),
            self.retrieval_threshold,
            self.vector_top_m,
            self.shortlist_size,
            self.rerank_pool_size,
            self.penalties.size,
            self.penalties.sector,
            self.penalties.geography,
        )
    }
}
