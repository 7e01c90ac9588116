//! `AuditRecord` (§3, §4.9): the canonically serializable fingerprint of a
//! decision. `deterministic_hash` is the SHA-256 of the record's own
//! canonical JSON with that field omitted — computed via a clone-and-strip
//! pattern rather than a custom `Serialize` impl, so the struct stays a
//! plain `derive(Serialize)` the way the rest of this workspace does it.

use decision_core::{canonicalize, hex_sha256, CanonicalError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluatorSignature {
    pub name: String,
    pub content_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditRecord {
    pub decision: Option<String>,
    pub confidence: f64,
    pub explanations: Vec<String>,
    pub evaluator_signatures: Vec<EvaluatorSignature>,
    pub context_hash: String,
    pub ruleset_hash: String,
    pub deterministic_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// Every field of [`AuditRecord`] except `deterministic_hash`, in the
/// shape that gets hashed to produce it. Kept as a separate type (instead
/// of skip-serializing the field on `AuditRecord` itself) so the canonical
/// bytes that are hashed are unambiguous and independent of serde's
/// attribute ordering rules.
#[derive(Serialize)]
struct Unsigned<'a> {
    decision: &'a Option<String>,
    confidence: f64,
    explanations: &'a [String],
    evaluator_signatures: &'a [EvaluatorSignature],
    context_hash: &'a str,
    ruleset_hash: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<u64>,
}

pub struct AuditRecordBuilder {
    decision: Option<String>,
    confidence: f64,
    explanations: Vec<String>,
    evaluator_signatures: Vec<EvaluatorSignature>,
    context_hash: String,
    ruleset_hash: String,
    timestamp: Option<u64>,
}

impl AuditRecordBuilder {
    pub fn new(context_hash: String, ruleset_hash: String) -> Self {
        Self {
            decision: None,
            confidence: 0.0,
            explanations: Vec::new(),
            evaluator_signatures: Vec::new(),
            context_hash,
            ruleset_hash,
            timestamp: None,
        }
    }

    pub fn decision(mut self, decision: Option<String>) -> Self {
        self.decision = decision;
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn explanations(mut self, explanations: Vec<String>) -> Self {
        self.explanations = explanations;
        self
    }

    pub fn evaluator_signatures(mut self, signatures: Vec<EvaluatorSignature>) -> Self {
        self.evaluator_signatures = signatures;
        self
    }

    pub fn timestamp(mut self, timestamp: Option<u64>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn build(self) -> Result<AuditRecord, CanonicalError> {
        let unsigned = Unsigned {
            decision: &self.decision,
            confidence: self.confidence,
            explanations: &self.explanations,
            evaluator_signatures: &self.evaluator_signatures,
            context_hash: &self.context_hash,
            ruleset_hash: &self.ruleset_hash,
            timestamp: self.timestamp,
        };
        let bytes = canonicalize(&unsigned)?;
        let deterministic_hash = hex_sha256(&bytes);
        Ok(AuditRecord {
            decision: self.decision,
            confidence: self.confidence,
            explanations: self.explanations,
            evaluator_signatures: self.evaluator_signatures,
            context_hash: self.context_hash,
            ruleset_hash: self.ruleset_hash,
            deterministic_hash,
            timestamp: self.timestamp,
        })
    }
}

impl AuditRecord {
    /// Recompute the deterministic hash this record *should* have and
    /// compare. Used by strict replay to detect tampering without having
    /// to reconstruct an `Unsigned` view by hand at every call site.
    pub fn recompute_hash(&self) -> Result<String, CanonicalError> {
        let unsigned = Unsigned {
            decision: &self.decision,
            confidence: self.confidence,
            explanations: &self.explanations,
            evaluator_signatures: &self.evaluator_signatures,
            context_hash: &self.context_hash,
            ruleset_hash: &self.ruleset_hash,
            timestamp: self.timestamp,
        };
        let bytes = canonicalize(&unsigned)?;
        Ok(hex_sha256(&bytes))
    }

    pub fn is_internally_consistent(&self) -> bool {
        self.recompute_hash().map(|h| h == self.deterministic_hash).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_hash_is_stable_across_builds() {
        let a = AuditRecordBuilder::new("ctxhash".into(), "rshash".into())
            .decision(Some("approve".into()))
            .confidence(0.75)
            .explanations(vec!["[kyc] ok".into()])
            .build()
            .unwrap();
        let b = AuditRecordBuilder::new("ctxhash".into(), "rshash".into())
            .decision(Some("approve".into()))
            .confidence(0.75)
            .explanations(vec!["[kyc] ok".into()])
            .build()
            .unwrap();
        assert_eq!(a.deterministic_hash, b.deterministic_hash);
        assert!(a.is_internally_consistent());
    }

    #[test]
    fn tampering_breaks_consistency() {
        let mut record = AuditRecordBuilder::new("c".into(), "r".into())
            .confidence(0.5)
            .build()
            .unwrap();
        record.confidence = 0.9;
        assert!(!record.is_internally_consistent());
    }
}
