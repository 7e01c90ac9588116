//! The JSON-rule evaluator (§4.4): holds one validated [`Ruleset`], scans it
//! in document order, and produces at most one [`Evaluation`] per decision
//! — from the first rule whose `if` matches.

use crate::evaluation::Evaluation;
use crate::traits::{Evaluator, EvaluatorOutcome};
use chrono::{DateTime, Utc};
use condition::{evaluate as eval_condition, EnrichmentClient};
use decision_core::Context;
use rules::Ruleset;

pub struct JsonRuleEvaluator {
    ruleset: Ruleset,
    content_hash: String,
}

impl JsonRuleEvaluator {
    /// Build an evaluator from an already-validated ruleset. Callers should
    /// run it through [`rules::validate_document`] first.
    pub fn new(ruleset: Ruleset) -> Result<Self, rules::RuleDocumentError> {
        let content_hash = rules::content_hash(&ruleset)?;
        Ok(Self { ruleset, content_hash })
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }
}

impl Evaluator for JsonRuleEvaluator {
    fn name(&self) -> &str {
        &self.ruleset.ruleset
    }

    fn content_hash(&self) -> &str {
        &self.content_hash
    }

    fn evaluate(
        &self,
        ctx: &Context,
        now: DateTime<Utc>,
        client: Option<&dyn EnrichmentClient>,
    ) -> EvaluatorOutcome {
        let mut current = ctx.clone();
        let mut failed = Vec::new();
        for rule in &self.ruleset.rules {
            let (outcome, effective) = eval_condition(&rule.if_, &current, now, client);
            current = effective;
            if outcome.passed {
                let evaluation = Evaluation {
                    decision: rule.then.decision.clone(),
                    weight: rule.then.weight,
                    reason: rule.then.reason.clone(),
                    evaluator_name: self.ruleset.ruleset.clone(),
                    metadata: rule.then.metadata.clone(),
                };
                return EvaluatorOutcome {
                    evaluation: Some(evaluation),
                    because: vec![outcome.descriptor],
                    failed,
                    effective_context: current,
                };
            }
            failed.push(outcome.descriptor);
        }
        EvaluatorOutcome { evaluation: None, because: Vec::new(), failed, effective_context: current }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_ruleset() -> Ruleset {
        let doc = json!({
            "version": "1",
            "ruleset": "kyc",
            "rules": [
                {"id": "low", "if": {"field": "amount", "op": "lt", "value": 100}, "then": {"decision": "approve", "weight": 0.9, "reason": "low value"}},
                {"id": "default", "if": {"all": []}, "then": {"decision": "review", "weight": 0.5, "reason": "catch-all"}}
            ]
        });
        rules::validate_document(&doc).unwrap()
    }

    #[test]
    fn first_matching_rule_wins() {
        let ev = JsonRuleEvaluator::new(sample_ruleset()).unwrap();
        let ctx = Context::new(json!({"amount": 50})).unwrap();
        let outcome = ev.evaluate(&ctx, Utc::now(), None);
        assert_eq!(outcome.evaluation.unwrap().decision, "approve");
        assert!(outcome.failed.is_empty());
    }

    #[test]
    fn falls_through_to_catch_all() {
        let ev = JsonRuleEvaluator::new(sample_ruleset()).unwrap();
        let ctx = Context::new(json!({"amount": 500})).unwrap();
        let outcome = ev.evaluate(&ctx, Utc::now(), None);
        assert_eq!(outcome.evaluation.unwrap().decision, "review");
        assert_eq!(outcome.failed.len(), 1);
    }

    #[test]
    fn no_evaluation_when_nothing_matches() {
        let doc = json!({
            "version": "1",
            "ruleset": "kyc",
            "rules": [
                {"id": "low", "if": {"field": "amount", "op": "lt", "value": 100}, "then": {"decision": "approve", "weight": 0.9, "reason": "low value"}}
            ]
        });
        let ruleset = rules::validate_document(&doc).unwrap();
        let ev = JsonRuleEvaluator::new(ruleset).unwrap();
        let ctx = Context::new(json!({"amount": 500})).unwrap();
        let outcome = ev.evaluate(&ctx, Utc::now(), None);
        assert!(outcome.evaluation.is_none());
    }
}
