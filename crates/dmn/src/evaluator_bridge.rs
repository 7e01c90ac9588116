//! The DMN evaluator (§4.5, §4.15): adapts a validated [`DecisionGraph`] to
//! the engine-wide [`Evaluator`] trait so a DMN table can sit in an
//! `Agent`'s evaluator list next to static and JSON-rule evaluators.
//!
//! A DMN decision table produces a literal FEEL value, not an `Evaluation`
//! directly — there is no DMN-native notion of "weight" or "reason". The
//! convention here (recorded as an open question in DESIGN.md) is:
//! a sink decision whose output is a FEEL context with `decision` (required),
//! `weight` (optional, default 1.0) and `reason` (optional, default
//! `"dmn:<sink id>"`) keys maps directly onto those `Evaluation` fields; a
//! bare scalar output (string/number/bool) is taken as the `decision` value
//! with the default weight and reason. `null` output (e.g. an unmatched
//! COLLECT) yields no evaluation at all.

use crate::error::DmnError;
use crate::graph_eval::evaluate_graph;
use crate::model::DecisionGraph;
use crate::validate::validate_graph;
use chrono::{DateTime, Utc};
use condition::{Descriptor, EnrichmentClient};
use decision_core::Context;
use evaluator::{Evaluation, Evaluator, EvaluatorOutcome};
use feel::FeelValue;

pub struct DmnEvaluator {
    name: String,
    content_hash: String,
    graph: DecisionGraph,
    sink_decision: String,
    default_weight: f64,
}

impl DmnEvaluator {
    /// Build an evaluator from a validated graph. `sink_decision` names the
    /// decision whose output, after the whole graph runs topologically, is
    /// read as this evaluator's verdict.
    pub fn new(
        name: impl Into<String>,
        graph: DecisionGraph,
        sink_decision: impl Into<String>,
    ) -> Result<Self, DmnError> {
        validate_graph(&graph)?;
        let sink_decision = sink_decision.into();
        if graph.get(&sink_decision).is_none() {
            return Err(DmnError::MissingRequirement {
                decision: "<sink>".to_string(),
                target: sink_decision,
            });
        }
        let content_hash = decision_core::content_hash(&graph)?;
        Ok(Self { name: name.into(), content_hash, graph, sink_decision, default_weight: 1.0 })
    }

    /// Override the default weight (1.0) assigned when a sink output is a
    /// bare scalar rather than a `{decision, weight, reason}` context.
    pub fn with_default_weight(mut self, weight: f64) -> Self {
        self.default_weight = weight;
        self
    }

    fn to_evaluation(&self, output: &FeelValue) -> Option<Evaluation> {
        match output {
            FeelValue::Null => None,
            FeelValue::Context(map) => {
                let decision = match map.get("decision") {
                    Some(FeelValue::String(s)) => s.clone(),
                    Some(other) => render_scalar(other),
                    None => return None,
                };
                let weight = map.get("weight").and_then(FeelValue::as_f64).unwrap_or(self.default_weight);
                let reason = match map.get("reason") {
                    Some(FeelValue::String(s)) => s.clone(),
                    _ => format!("dmn:{}", self.sink_decision),
                };
                Some(Evaluation::new(decision, weight, reason, self.name.clone()))
            }
            scalar => Some(Evaluation::new(
                render_scalar(scalar),
                self.default_weight,
                format!("dmn:{}", self.sink_decision),
                self.name.clone(),
            )),
        }
    }
}

fn render_scalar(value: &FeelValue) -> String {
    match value {
        FeelValue::String(s) => s.clone(),
        FeelValue::Number(n) => n.to_string(),
        FeelValue::Bool(b) => b.to_string(),
        other => format!("{:?}", other.to_json()),
    }
}

impl Evaluator for DmnEvaluator {
    fn name(&self) -> &str {
        &self.name
    }

    fn content_hash(&self) -> &str {
        &self.content_hash
    }

    fn evaluate(
        &self,
        ctx: &Context,
        _now: DateTime<Utc>,
        _client: Option<&dyn EnrichmentClient>,
    ) -> EvaluatorOutcome {
        match evaluate_graph(&self.graph, ctx.as_json()) {
            Ok(bindings) => {
                let output = bindings.get(&self.sink_decision).unwrap_or(&FeelValue::Null);
                match self.to_evaluation(output) {
                    Some(evaluation) => EvaluatorOutcome {
                        because: vec![Descriptor::leaf(
                            format!("dmn:{} -> {}", self.sink_decision, render_scalar(output)),
                            true,
                        )],
                        evaluation: Some(evaluation),
                        failed: Vec::new(),
                        effective_context: ctx.clone(),
                    },
                    None => EvaluatorOutcome::empty(ctx.clone()),
                }
            }
            Err(err) => EvaluatorOutcome {
                evaluation: None,
                because: Vec::new(),
                failed: vec![Descriptor::leaf(format!("{} failed: {err}", self.name), false)],
                effective_context: ctx.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Decision, DecisionLogic, DecisionRule, DecisionTable, HitPolicy, InputClause, OutputClause};
    use serde_json::json;

    fn eligibility_graph() -> DecisionGraph {
        DecisionGraph {
            decisions: vec![Decision {
                id: "eligibility".into(),
                name: None,
                logic: DecisionLogic::Table(DecisionTable {
                    hit_policy: HitPolicy::First,
                    inputs: vec![InputClause { id: "i1".into(), label: None, expression: "age".into() }],
                    outputs: vec![OutputClause {
                        id: "o1".into(),
                        label: None,
                        name: "decision".into(),
                        allowed_values: Vec::new(),
                    }],
                    rules: vec![
                        DecisionRule {
                            id: "r1".into(),
                            input_entries: vec![">= 18".into()],
                            output_entries: vec!["\"approve\"".into()],
                        },
                        DecisionRule {
                            id: "r2".into(),
                            input_entries: vec!["-".into()],
                            output_entries: vec!["\"reject\"".into()],
                        },
                    ],
                }),
                information_requirements: vec![],
            }],
        }
    }

    #[test]
    fn scalar_sink_output_becomes_an_evaluation() {
        let ev = DmnEvaluator::new("eligibility_dmn", eligibility_graph(), "eligibility").unwrap();
        let ctx = Context::new(json!({"age": 30})).unwrap();
        let outcome = ev.evaluate(&ctx, Utc::now(), None);
        let evaluation = outcome.evaluation.unwrap();
        assert_eq!(evaluation.decision, "approve");
        assert_eq!(evaluation.weight, 1.0);
    }

    #[test]
    fn unknown_sink_decision_is_rejected_at_construction() {
        assert!(DmnEvaluator::new("x", eligibility_graph(), "missing").is_err());
    }
}
