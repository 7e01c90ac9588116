//! Rule document validation (§4.3): required keys, rule id uniqueness,
//! operator/value-shape checks (delegated to [`condition::shape`]), then
//! canonicalization so downstream consumers (and the audit layer) hash a
//! stable byte form.

use crate::document::Ruleset;
use crate::error::RuleDocumentError;
use condition::shape::validate_tree;
use serde_json::Value as Json;
use std::collections::HashSet;

/// Parse and validate a rule document. On success, returns the parsed
/// [`Ruleset`] — callers should immediately canonicalize it with
/// [`crate::canonical::canonical_bytes`] if they intend to hash it.
pub fn validate_document(raw: &Json) -> Result<Ruleset, RuleDocumentError> {
    let ruleset: Ruleset = serde_json::from_value(raw.clone())?;
    validate_ruleset(&ruleset)?;
    Ok(ruleset)
}

pub fn validate_ruleset(ruleset: &Ruleset) -> Result<(), RuleDocumentError> {
    let mut seen = HashSet::with_capacity(ruleset.rules.len());
    for (i, rule) in ruleset.rules.iter().enumerate() {
        let path = format!("rules[{i}]");
        if !seen.insert(rule.id.clone()) {
            return Err(RuleDocumentError::DuplicateRuleId { path, id: rule.id.clone() });
        }
        validate_tree(&rule.if_, &format!("{path}.if"))
            .map_err(|source| RuleDocumentError::Condition { path: format!("{path}.if"), source })?;
        if !(0.0..=1.0).contains(&rule.then.weight) {
            return Err(RuleDocumentError::WeightOutOfRange {
                path: format!("{path}.then.weight"),
                weight: rule.then.weight,
            });
        }
        if rule.then.decision.trim().is_empty() {
            return Err(RuleDocumentError::EmptyDecision { path: format!("{path}.then.decision") });
        }
    }
    Ok(())
}
