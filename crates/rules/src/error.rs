//! Structured validation errors for rule documents (§4.3, §7
//! `ValidationFailure`). Every failure carries a JSON-pointer-like path
//! (`rules[3].if.all[1].op`) so a caller can locate the offending node
//! without re-deriving it from the raw document.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleDocumentError {
    #[error("malformed rule document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("{path}: duplicate rule id {id:?}")]
    DuplicateRuleId { path: String, id: String },

    #[error("{path}: {source}")]
    Condition { path: String, #[source] source: condition::ConditionError },

    #[error("{path}: then.weight must be in [0,1], got {weight}")]
    WeightOutOfRange { path: String, weight: f64 },

    #[error("{path}: then.decision must be non-empty")]
    EmptyDecision { path: String },

    #[error("canonicalization failed: {0}")]
    Canonicalize(#[from] decision_core::CanonicalError),
}
