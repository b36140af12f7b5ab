//! Canonical serialization for deterministic hashing.
//!
//! ## Determinism Guarantees
//!
//! - Object keys serialize in sorted order (`serde_json::Map` is a `BTreeMap`)
//! - Arrays serialize in index order
//! - No insignificant whitespace
//!
//! Two hashes live here: a fast xxh64 fingerprint for whole graphs (log
//! correlation, change detection) and SHA-256 digests for side payloads,
//! which are recorded in the crate and re-checked on import.

use serde_json::Value;
use sha2::{Digest, Sha256};
use xxhash_rust::xxh64::xxh64;

/// Serialize a JSON value to canonical bytes.
pub fn to_canonical_bytes(value: &Value) -> Vec<u8> {
    value.to_string().into_bytes()
}

/// Compute canonical hash of a JSON value.
pub fn canonical_hash(value: &Value) -> u64 {
    let bytes = to_canonical_bytes(value);
    xxh64(&bytes, 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex(value: &Value) -> String {
    format!("{:016x}", canonical_hash(value))
}

/// SHA-256 of raw bytes, lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Result of checking a payload against a recorded digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestCheck {
    /// Digest matches.
    Valid,
    /// Digest does not match.
    Mismatch {
        /// Recorded digest.
        expected: String,
        /// Digest of the bytes at hand.
        computed: String,
    },
    /// No digest was recorded.
    Missing,
}

impl DigestCheck {
    /// Check if the payload can be trusted as recorded.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Check a JSON payload against an optional recorded SHA-256 digest.
pub fn check_payload_digest(payload: &Value, recorded: Option<&str>) -> DigestCheck {
    match recorded {
        None => DigestCheck::Missing,
        Some(expected) => {
            let computed = sha256_hex(&to_canonical_bytes(payload));
            if computed.eq_ignore_ascii_case(expected.trim()) {
                DigestCheck::Valid
            } else {
                DigestCheck::Mismatch {
                    expected: expected.to_string(),
                    computed,
                }
            }
        }
    }
}
