//! RFC 8785 JSON Canonicalization (JCS) and SHA-256 content hashing.
//!
//! Every hash the engine relies on for replay (context, ruleset, audit
//! record) is computed over the JCS form of a `serde_json::Value`. Do not
//! hand-roll a local canonical form here; `serde_jcs` already implements the
//! RFC.

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors produced while canonicalizing or hashing a value.
#[derive(Debug, Error)]
pub enum CanonicalError {
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Render `value` as its RFC 8785 canonical JSON byte string.
pub fn canonicalize<T: Serialize>(value: &T) -> Result<Vec<u8>, CanonicalError> {
    serde_jcs::to_vec(value).map_err(CanonicalError::from)
}

/// SHA-256 of the canonical form of `value`, hex-encoded.
pub fn content_hash<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    let bytes = canonicalize(value)?;
    Ok(hex_sha256(&bytes))
}

/// SHA-256 of raw bytes, hex-encoded.
pub fn hex_sha256(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Combine evaluator content hashes, in evaluator order, into a single
/// ruleset hash. Order-sensitive: swapping two evaluators changes the hash.
pub fn combine_hashes<'a, I: IntoIterator<Item = &'a str>>(hashes: I) -> String {
    let mut hasher = Sha256::new();
    for h in hashes {
        hasher.update(h.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_form_sorts_keys() {
        let a = json!({"b": 1, "a": 2});
        let b = json!({"a": 2, "b": 1});
        assert_eq!(canonicalize(&a).unwrap(), canonicalize(&b).unwrap());
    }

    #[test]
    fn content_hash_is_stable() {
        let v = json!({"x": [1, 2, 3], "y": "z"});
        let h1 = content_hash(&v).unwrap();
        let h2 = content_hash(&v).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn combine_hashes_is_order_sensitive() {
        let a = combine_hashes(["h1", "h2"]);
        let b = combine_hashes(["h2", "h1"]);
        assert_ne!(a, b);
    }
}
