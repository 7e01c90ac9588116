//! `Evaluation`: the verdict of a single evaluator for one context (§3).
//! Immutable once produced; "no evaluation" is represented by the absence
//! of a value (`Option<Evaluation>`), not a sentinel.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evaluation {
    pub decision: String,
    pub weight: f64,
    pub reason: String,
    pub evaluator_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Json>,
}

impl Evaluation {
    pub fn new(
        decision: impl Into<String>,
        weight: f64,
        reason: impl Into<String>,
        evaluator_name: impl Into<String>,
    ) -> Self {
        Self {
            decision: decision.into(),
            weight,
            reason: reason.into(),
            evaluator_name: evaluator_name.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Json) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// §4.8: `weight ∈ [0,1]`, `decision` non-empty, `reason` present,
    /// `evaluator_name` present. Used by the agent's optional validation
    /// pass; off by default for hot paths.
    pub fn is_well_formed(&self) -> bool {
        (0.0..=1.0).contains(&self.weight)
            && !self.decision.trim().is_empty()
            && !self.reason.trim().is_empty()
            && !self.evaluator_name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_weight_in_validation() {
        let e = Evaluation::new("approve", 1.5, "because", "kyc");
        assert!(!e.is_well_formed());
    }

    #[test]
    fn well_formed_evaluation() {
        let e = Evaluation::new("approve", 0.5, "because", "kyc");
        assert!(e.is_well_formed());
    }
}
