//! Canonical byte form of a validated [`Ruleset`] (§3, §8 round-trip law):
//! `JSON rule → validator → canonical JSON → validator` is a fixed point.

use crate::document::Ruleset;
use crate::error::RuleDocumentError;
use crate::validate::validate_document;
use decision_core::canonicalize;

/// RFC 8785 canonical JSON bytes of a ruleset, keyed for stable hashing.
pub fn canonical_bytes(ruleset: &Ruleset) -> Result<Vec<u8>, RuleDocumentError> {
    Ok(canonicalize(ruleset)?)
}

/// SHA-256 hex digest of the ruleset's canonical form — the evaluator
/// content hash a `JsonRuleEvaluator` contributes to an `AuditRecord`.
pub fn content_hash(ruleset: &Ruleset) -> Result<String, RuleDocumentError> {
    Ok(decision_core::content_hash(ruleset)?)
}

/// Round-trip: canonicalize, re-parse, and re-validate. Used to assert the
/// fixed-point law in tests and as a defensive check before persisting a
/// version record.
pub fn round_trip(ruleset: &Ruleset) -> Result<Ruleset, RuleDocumentError> {
    let bytes = canonical_bytes(ruleset)?;
    let raw: serde_json::Value = serde_json::from_slice(&bytes)?;
    validate_document(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_form_is_a_fixed_point() {
        let raw = json!({
            "version": "1",
            "ruleset": "kyc",
            "rules": [
                {"id": "r1", "if": {"field": "amount", "op": "lt", "value": 100}, "then": {"decision": "approve", "weight": 0.9, "reason": "low value"}}
            ]
        });
        let parsed = validate_document(&raw).unwrap();
        let again = round_trip(&parsed).unwrap();
        assert_eq!(canonical_bytes(&parsed).unwrap(), canonical_bytes(&again).unwrap());
    }

    #[test]
    fn content_hash_is_stable_across_key_order() {
        let a = json!({"version":"1","ruleset":"x","rules":[]});
        let b = json!({"ruleset":"x","version":"1","rules":[]});
        let ra = validate_document(&a).unwrap();
        let rb = validate_document(&b).unwrap();
        assert_eq!(content_hash(&ra).unwrap(), content_hash(&rb).unwrap());
    }
}
