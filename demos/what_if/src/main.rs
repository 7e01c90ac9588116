//! What-if / shadow comparison harness (Component O): runs the same
//! context through two rulesets built from the public `Agent` API and
//! prints where their verdicts disagree. Consumes the engine repeatedly
//! through its published surface; introduces no engine-internal behavior.

use agent::{Agent, AgentBuilder, WeightedAverage};
use chrono::Utc;
use decision_core::Context;
use evaluator::{Evaluator, JsonRuleEvaluator};
use serde_json::json;
use std::sync::Arc;

fn build_agent(ruleset_json: serde_json::Value) -> Agent {
    let ruleset = rules::validate_document(&ruleset_json).expect("ruleset must be valid");
    let ev: Arc<dyn Evaluator> = Arc::new(JsonRuleEvaluator::new(ruleset).expect("content hash"));
    AgentBuilder::new(Arc::new(WeightedAverage)).evaluator(ev).build()
}

fn main() {
    let production = build_agent(json!({
        "version": "1",
        "ruleset": "kyc",
        "rules": [
            {"id": "low", "if": {"field": "amount", "op": "lt", "value": 1000}, "then": {"decision": "approve", "weight": 0.9, "reason": "low value"}},
            {"id": "default", "if": {"all": []}, "then": {"decision": "review", "weight": 0.6, "reason": "catch-all"}}
        ]
    }));

    let candidate = build_agent(json!({
        "version": "2",
        "ruleset": "kyc",
        "rules": [
            {"id": "low", "if": {"field": "amount", "op": "lt", "value": 2000}, "then": {"decision": "approve", "weight": 0.9, "reason": "raised threshold"}},
            {"id": "default", "if": {"all": []}, "then": {"decision": "review", "weight": 0.6, "reason": "catch-all"}}
        ]
    }));

    let contexts = [json!({"amount": 500}), json!({"amount": 1500}), json!({"amount": 5000})];

    for raw in contexts {
        let ctx = Context::new(raw.clone()).expect("shadow input must be a valid context");
        let now = Utc::now();
        let prod = production.decide(&ctx, now).expect("production agent must not fail");
        let shadow = candidate.decide(&ctx, now).expect("candidate agent must not fail");

        if prod.decision == shadow.decision {
            println!("{raw}: agree on {:?}", prod.decision);
        } else {
            println!(
                "{raw}: DIVERGES production={:?} (conf {:.2}) candidate={:?} (conf {:.2})",
                prod.decision, prod.confidence, shadow.decision, shadow.confidence
            );
        }
    }
}
