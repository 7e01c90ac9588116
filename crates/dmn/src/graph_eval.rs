//! Graph-level evaluation (§4.14): run every decision of a validated
//! [`DecisionGraph`] in topological order, injecting each upstream
//! decision's output into the effective context of its downstream
//! decisions under the upstream's decision id.

use crate::error::DmnError;
use crate::hit_policy::evaluate_table;
use crate::model::{DecisionGraph, DecisionLogic};
use feel::{evaluate as eval_expr, parse, Bindings, FeelValue};
use serde_json::Value as Json;

/// Evaluate every decision in `graph` against `ctx`, returning the bindings
/// environment with one entry per decision id (plus the original context
/// fields). Callers read a specific decision's result out of the returned
/// map by id.
pub fn evaluate_graph(graph: &DecisionGraph, ctx: &Json) -> Result<Bindings, DmnError> {
    let order = graph.topological_order().ok_or_else(|| {
        let first = graph.decisions.first().map(|d| d.id.clone()).unwrap_or_default();
        DmnError::Cycle(first)
    })?;

    let mut bindings = context_to_bindings(ctx);
    for decision in order {
        let output = match &decision.logic {
            DecisionLogic::Table(table) => evaluate_table(table, &bindings)?,
            DecisionLogic::Literal(lit) => eval_expr(&parse(&lit.text)?, &bindings)?,
        };
        bindings.insert(decision.id.clone(), output);
    }
    Ok(bindings)
}

fn context_to_bindings(ctx: &Json) -> Bindings {
    let mut bindings = Bindings::new();
    if let Json::Object(map) = ctx {
        for (k, v) in map {
            bindings.insert(k.clone(), FeelValue::from_json(v));
        }
    }
    bindings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Decision, DecisionRule, DecisionTable, HitPolicy, InputClause, OutputClause};
    use serde_json::json;

    fn table_decision(id: &str, requires: Vec<&str>, input_expr: &str) -> Decision {
        Decision {
            id: id.to_string(),
            name: None,
            logic: DecisionLogic::Table(DecisionTable {
                hit_policy: HitPolicy::First,
                inputs: vec![InputClause { id: "i1".into(), label: None, expression: input_expr.into() }],
                outputs: vec![OutputClause {
                    id: "o1".into(),
                    label: None,
                    name: "result".into(),
                    allowed_values: Vec::new(),
                }],
                rules: vec![
                    DecisionRule {
                        id: "r1".into(),
                        input_entries: vec![">= 18".into()],
                        output_entries: vec!["\"adult\"".into()],
                    },
                    DecisionRule {
                        id: "r2".into(),
                        input_entries: vec!["-".into()],
                        output_entries: vec!["\"minor\"".into()],
                    },
                ],
            }),
            information_requirements: requires.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn upstream_output_is_visible_downstream() {
        let upstream = table_decision("age_bracket", vec![], "age");
        let downstream = Decision {
            id: "eligibility".into(),
            name: None,
            logic: DecisionLogic::Literal(crate::model::LiteralExpression {
                text: "age_bracket = \"adult\"".into(),
            }),
            information_requirements: vec!["age_bracket".into()],
        };
        let graph = DecisionGraph { decisions: vec![upstream, downstream] };
        let bindings = evaluate_graph(&graph, &json!({"age": 30})).unwrap();
        assert_eq!(bindings.get("age_bracket"), Some(&FeelValue::String("adult".to_string())));
        assert_eq!(bindings.get("eligibility"), Some(&FeelValue::Bool(true)));
    }
}
