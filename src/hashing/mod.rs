//! BLAKE3-based key derivation for caches and snapshot identity.
//!
//! Keys are truncated to 64 bits. That is plenty for cache indexing: a
//! collision produces a spurious cache miss or a stale judgment for one
//! candidate, never corruption, and every cached value is advisory (the
//! ranking pipeline recomputes everything else from the snapshot).

use blake3::Hasher;

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

/// Key for one judge assessment: model identity plus both summaries.
#[inline]
pub fn hash_assessment(model: &str, query_summary: &str, candidate_summary: &str) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(model.as_bytes());
    hasher.update(b"|");
    hasher.update(query_summary.as_bytes());
    hasher.update(b"|");
    hasher.update(candidate_summary.as_bytes());

    truncate(hasher)
}

/// Key for one ranking request: incentive, population snapshot, and the
/// parameter fingerprint that influenced the result.
#[inline]
pub fn hash_rank_request(incentive_id: &str, snapshot_id: u64, params_fingerprint: &str) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(incentive_id.as_bytes());
    hasher.update(b"|");
    hasher.update(&snapshot_id.to_le_bytes());
    hasher.update(b"|");
    hasher.update(params_fingerprint.as_bytes());

    truncate(hasher)
}

#[inline]
fn truncate(hasher: Hasher) -> u64 {
    let hash = hasher.finalize();
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_to_u64_deterministic() {
        assert_eq!(hash_to_u64(b"abc"), hash_to_u64(b"abc"));
        assert_ne!(hash_to_u64(b"abc"), hash_to_u64(b"abd"));
    }

    #[test]
    fn test_assessment_key_separates_fields() {
        // "ab" + "c" must not collide with "a" + "bc".
        let a = hash_assessment("m", "ab", "c");
        let b = hash_assessment("m", "a", "bc");
        assert_ne!(a, b);
    }

    #[test]
    fn test_assessment_key_sensitive_to_model() {
        let a = hash_assessment("gpt-4o-mini", "q", "c");
        let b = hash_assessment("gpt-4o", "q", "c");
        assert_ne!(a, b);
    }

    #[test]
    fn test_rank_request_key_sensitive_to_snapshot() {
        let a = hash_rank_request("inc-1", 1, "w=0.55");
        let b = hash_rank_request("inc-1", 2, "w=0.55");
        assert_ne!(a, b);
    }
}
