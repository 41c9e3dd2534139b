//! Domain entities: incentives (queries), companies (candidates), and the
//! structured eligibility criteria that connect them.
//!
//! Entities are immutable snapshots at ranking time. Embeddings are stored
//! as little-endian f16 bytes and converted to f32 at scoring time.

pub mod error;


pub use error::ModelError;

use half::f16;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_EMBEDDING_DIM;

/// Closed size-class enumeration used by both sides of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Micro,
    Pme,
    Grande,
    Unknown,
}

impl SizeClass {
    /// Parses the size labels found in company records. Unrecognized labels
    /// map to [`SizeClass::Unknown`] rather than failing.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "micro" => SizeClass::Micro,
            "pme" => SizeClass::Pme,
            "grande" => SizeClass::Grande,
            _ => SizeClass::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::Micro => "micro",
            SizeClass::Pme => "pme",
            SizeClass::Grande => "grande",
            SizeClass::Unknown => "unknown",
        }
    }
}

/// One entry of an incentive's allowed-size set.
///
/// `NotApplicable` is the wildcard tag extracted from source documents
/// ("não aplicável"): its presence disables the size rule entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeRequirement {
    Class(SizeClass),
    NotApplicable,
}

impl SizeRequirement {
    /// Parses an extracted size label, recognizing the wildcard forms.
    pub fn parse(label: &str) -> Self {
        let normalized = label.trim().to_lowercase();
        match normalized.as_str() {
            "não aplicável" | "nao aplicavel" | "n/a" => SizeRequirement::NotApplicable,
            _ => SizeRequirement::Class(SizeClass::parse(&normalized)),
        }
    }
}

/// Structured eligibility criteria extracted from an incentive's text.
///
/// Every criterion is optional: an empty collection (or `None`) means the
/// criterion does not apply, which is distinct from "present but
/// non-matching" everywhere downstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EligibilityCriteria {
    /// Allowed company sizes; empty means any size is eligible.
    #[serde(default)]
    pub size_classes: Vec<SizeRequirement>,

    /// CAE classification codes; empty means any sector is eligible.
    #[serde(default)]
    pub sector_codes: Vec<String>,

    /// Geography descriptor, e.g. "Norte" or "todo o país".
    #[serde(default)]
    pub location: Option<String>,

    /// Investment objectives extracted from the incentive text.
    #[serde(default)]
    pub investment_objectives: Vec<String>,

    /// Specific purposes extracted from the incentive text.
    #[serde(default)]
    pub specific_purposes: Vec<String>,

    /// Free-text eligibility criteria, most relevant first.
    #[serde(default)]
    pub eligibility_notes: Vec<String>,
}

impl EligibilityCriteria {
    /// Returns `true` if the size rule is disabled by the wildcard tag.
    pub fn size_not_applicable(&self) -> bool {
        self.size_classes
            .iter()
            .any(|s| matches!(s, SizeRequirement::NotApplicable))
    }

    /// Returns `true` if `size` satisfies the size criterion (or the
    /// criterion does not apply).
    pub fn allows_size(&self, size: SizeClass) -> bool {
        if self.size_classes.is_empty() || self.size_not_applicable() {
            return true;
        }
        self.size_classes
            .iter()
            .any(|s| matches!(s, SizeRequirement::Class(c) if *c == size))
    }
}

/// A dense embedding stored as little-endian f16 bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    bytes: Vec<u8>,
}

impl Embedding {
    /// Wraps raw f16 bytes, validating the length against `dim`.
    pub fn from_f16_bytes(bytes: Vec<u8>, dim: usize) -> Result<Self, ModelError> {
        if bytes.len() != dim * 2 {
            return Err(ModelError::InvalidEmbeddingBytesLength {
                expected: dim * 2,
                actual: bytes.len(),
            });
        }
        Ok(Self { bytes })
    }

    /// Converts an f32 vector (as produced by embedding providers) into the
    /// f16 storage form, validating the dimension.
    pub fn from_f32(vector: &[f32], dim: usize) -> Result<Self, ModelError> {
        if vector.len() != dim {
            return Err(ModelError::InvalidEmbeddingDimension {
                expected: dim,
                actual: vector.len(),
            });
        }
        let bytes = vector
            .iter()
            .flat_map(|&v| f16::from_f32(v).to_le_bytes())
            .collect();
        Ok(Self { bytes })
    }

    /// Convenience constructor for the default dimension.
    pub fn from_f32_default_dim(vector: &[f32]) -> Result<Self, ModelError> {
        Self::from_f32(vector, DEFAULT_EMBEDDING_DIM)
    }

    /// Number of components.
    pub fn dim(&self) -> usize {
        self.bytes.len() / 2
    }

    /// Raw storage bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Reinterprets the storage bytes as `&[f16]`. `None` when the buffer
    /// is not 2-byte aligned.
    pub fn as_f16(&self) -> Option<&[f16]> {
        bytemuck::try_cast_slice(&self.bytes).ok()
    }

    /// Decodes to f32 for similarity math.
    pub fn to_f32(&self) -> Vec<f32> {
        if let Some(values) = self.as_f16() {
            return values.iter().map(|v| v.to_f32()).collect();
        }

        self.bytes
            .chunks_exact(2)
            .map(|chunk| {
                let bits = u16::from_le_bytes([chunk[0], chunk[1]]);
                f16::from_bits(bits).to_f32()
            })
            .collect()
    }
}

/// The query entity: a public funding incentive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incentive {
    pub incentive_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub criteria: EligibilityCriteria,
    /// Budget ceiling in EUR, when published.
    #[serde(default)]
    pub total_budget: Option<f64>,
    #[serde(default)]
    pub embedding: Option<Embedding>,
}

impl Incentive {
    /// Assembles the lexical query document for this incentive: title,
    /// description, objectives, purposes, the strongest eligibility notes,
    /// and sector codes.
    pub fn lexical_text(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.title];

        if let Some(desc) = &self.description {
            parts.push(desc);
        }

        let c = &self.criteria;
        parts.extend(c.investment_objectives.iter().map(String::as_str));
        parts.extend(c.specific_purposes.iter().map(String::as_str));
        parts.extend(c.eligibility_notes.iter().take(3).map(String::as_str));
        parts.extend(c.sector_codes.iter().map(String::as_str));

        parts.join(" ")
    }
}

/// A candidate entity: a company from the population snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub company_id: String,
    pub name: String,
    #[serde(default)]
    pub sector_codes: Vec<String>,
    #[serde(default = "default_size")]
    pub size: SizeClass,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub embedding: Option<Embedding>,
}

fn default_size() -> SizeClass {
    SizeClass::Unknown
}

impl Company {
    /// Assembles the lexical corpus document for this company: name, sector
    /// codes, description, and district.
    pub fn lexical_text(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.name];

        parts.extend(self.sector_codes.iter().map(String::as_str));

        if let Some(desc) = &self.description {
            parts.push(desc);
        }
        if let Some(district) = &self.district {
            parts.push(district);
        }

        parts.join(" ")
    }
}
