//! Wires `init_json_logging` and [`telemetry::DecisionMetrics`] around a
//! handful of `Agent::decide` calls, the way a host application would.

use agent::{AgentBuilder, WeightedAverage};
use decision_core::Context;
use evaluator::{Evaluator, JsonRuleEvaluator};
use serde_json::json;
use std::sync::Arc;
use telemetry::DecisionMetrics;

fn main() {
    telemetry::init_json_logging();

    let ruleset = rules::validate_document(&json!({
        "version": "1",
        "ruleset": "kyc",
        "rules": [
            {"id": "low", "if": {"field": "amount", "op": "lt", "value": 1000}, "then": {"decision": "approve", "weight": 0.9, "reason": "low value"}},
            {"id": "default", "if": {"all": []}, "then": {"decision": "review", "weight": 0.5, "reason": "catch-all"}}
        ]
    }))
    .expect("ruleset must be valid");
    let ev: Arc<dyn Evaluator> = Arc::new(JsonRuleEvaluator::new(ruleset).expect("content hash"));
    let agent = AgentBuilder::new(Arc::new(WeightedAverage)).evaluator(ev).build();

    let metrics = DecisionMetrics::new();
    for amount in [100, 500, 5000] {
        let ctx = Context::new(json!({"amount": amount})).expect("valid context");
        let decision = agent.decide(&ctx, chrono::Utc::now()).expect("decide must not fail");
        metrics.record(decision.evaluations.len() as u64);
        tracing::info!(amount, decision = ?decision.decision, "demo.decide");
    }

    let (decisions, evaluations) = metrics.snapshot();
    println!("decisions={decisions} evaluations={evaluations}");
}
