//! The FIRST-policy round trip (§4.16): a DMN decision table's rows become
//! one internal [`Rule`] each (input cells conjoined into the `if`, the
//! first output cell becoming `then.decision`), and back.
//!
//! The round trip is lossless only for the operator subset DMN unary tests
//! can express unambiguously: `eq`, `ne`, `lt`, `lte`, `gt`, `gte`, and
//! `between` (DMN's closed range). A condition tree built by hand with any
//! other operator, or with `any`/nested `all` shapes, has no DMN
//! representation and `ruleset_to_table` rejects it rather than lose
//! information silently.

use crate::error::BridgeError;
use condition::{ConditionNode, Op};
use dmn::{Decision, DecisionGraph, DecisionLogic, DecisionRule, DecisionTable, HitPolicy, InputClause, OutputClause};
use feel::{evaluate, parse, parse_unary_tests, Bindings, CompareOp, FeelValue, UnaryTest};
use rules::{Rule, Ruleset, Then};
use serde_json::Value as Json;

/// Convert a FIRST-policy decision's table into a [`Ruleset`] whose rules
/// mirror the table's rows in order.
pub fn table_to_ruleset(decision: &Decision) -> Result<Ruleset, BridgeError> {
    let DecisionLogic::Table(table) = &decision.logic else {
        return Err(BridgeError::NotATable(decision.id.clone()));
    };
    if table.hit_policy != HitPolicy::First {
        return Err(BridgeError::UnsupportedHitPolicy(decision.id.clone()));
    }

    let mut rules = Vec::with_capacity(table.rules.len());
    for row in &table.rules {
        let mut conditions = Vec::new();
        for (input, entry) in table.inputs.iter().zip(&row.input_entries) {
            let tests = parse_unary_tests(entry).map_err(|e| BridgeError::UnaryTest(row.id.clone(), e))?;
            if tests == [UnaryTest::DontCare] {
                continue;
            }
            let field = field_name(&input.expression)?;
            conditions.push(tests_to_condition(field, &tests)?);
        }

        let if_ = match conditions.len() {
            0 => ConditionNode::all(Vec::new()),
            1 => conditions.into_iter().next().unwrap(),
            _ => ConditionNode::all(conditions),
        };

        let decision_value = row
            .output_entries
            .first()
            .ok_or_else(|| BridgeError::EmptyOutput(row.id.clone()))?;
        let literal = evaluate(&parse(decision_value).map_err(|e| BridgeError::UnaryTest(row.id.clone(), e))?, &Bindings::new())
            .map_err(|e| BridgeError::UnaryTest(row.id.clone(), e))?;

        rules.push(Rule {
            id: row.id.clone(),
            if_,
            then: Then {
                decision: scalar_to_string(&literal),
                weight: 1.0,
                reason: format!("dmn:{}:{}", decision.id, row.id),
                metadata: None,
            },
        });
    }

    Ok(Ruleset { version: "1".to_string(), ruleset: decision.id.clone(), rules })
}

/// Convert a [`Ruleset`] into a single FIRST-policy decision whose table's
/// input columns are the distinct fields referenced across its rules, in
/// first-appearance order.
pub fn ruleset_to_table(ruleset: &Ruleset) -> Result<DecisionGraph, BridgeError> {
    let mut fields: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(ruleset.rules.len());

    for rule in &ruleset.rules {
        let mut leaves = Vec::new();
        collect_leaves(&rule.if_, &mut leaves)?;
        let mut entries_by_field: Vec<(String, String)> = Vec::with_capacity(leaves.len());
        for (field, op, value) in leaves {
            if !fields.iter().any(|f| f == &field) {
                fields.push(field.clone());
            }
            entries_by_field.push((field, unary_test_text(op, &value)?));
        }
        rows.push((rule.id.clone(), entries_by_field, rule.then.decision.clone()));
    }

    let inputs: Vec<InputClause> = fields
        .iter()
        .enumerate()
        .map(|(i, field)| InputClause { id: format!("i{}", i + 1), label: None, expression: field.clone() })
        .collect();

    let table_rules = rows
        .into_iter()
        .map(|(id, entries_by_field, decision)| {
            let input_entries = fields
                .iter()
                .map(|field| {
                    entries_by_field
                        .iter()
                        .find(|(f, _)| f == field)
                        .map(|(_, text)| text.clone())
                        .unwrap_or_else(|| "-".to_string())
                })
                .collect();
            DecisionRule { id, input_entries, output_entries: vec![quote_string(&decision)] }
        })
        .collect();

    let table = DecisionTable {
        hit_policy: HitPolicy::First,
        inputs,
        outputs: vec![OutputClause {
            id: "o1".to_string(),
            label: None,
            name: "decision".to_string(),
            allowed_values: Vec::new(),
        }],
        rules: table_rules,
    };

    Ok(DecisionGraph {
        decisions: vec![Decision {
            id: ruleset.ruleset.clone(),
            name: None,
            logic: DecisionLogic::Table(table),
            information_requirements: Vec::new(),
        }],
    })
}

fn field_name(expression: &str) -> Result<String, BridgeError> {
    let trimmed = expression.trim();
    let is_plain_path = !trimmed.is_empty()
        && trimmed.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.');
    if is_plain_path {
        Ok(trimmed.to_string())
    } else {
        Err(BridgeError::NonFieldExpression(expression.to_string()))
    }
}

fn tests_to_condition(field: String, tests: &[UnaryTest]) -> Result<ConditionNode, BridgeError> {
    if tests.len() == 1 {
        return leaf_from_test(&field, &tests[0]);
    }
    let leaves = tests.iter().map(|t| leaf_from_test(&field, t)).collect::<Result<Vec<_>, _>>()?;
    Ok(ConditionNode::any(leaves))
}

fn leaf_from_test(field: &str, test: &UnaryTest) -> Result<ConditionNode, BridgeError> {
    match test {
        UnaryTest::DontCare => Ok(ConditionNode::all(Vec::new())),
        UnaryTest::Equals(v) => Ok(ConditionNode::leaf(field, Op::Eq, v.to_json())),
        UnaryTest::Compare(op, v) => {
            let op = match op {
                CompareOp::Lt => Op::Lt,
                CompareOp::Lte => Op::Lte,
                CompareOp::Gt => Op::Gt,
                CompareOp::Gte => Op::Gte,
                CompareOp::Eq => Op::Eq,
                CompareOp::Ne => Op::Ne,
            };
            Ok(ConditionNode::leaf(field, op, v.to_json()))
        }
        UnaryTest::Range { lower, upper, lower_inclusive: true, upper_inclusive: true } => {
            Ok(ConditionNode::leaf(field, Op::Between, Json::Array(vec![lower.to_json(), upper.to_json()])))
        }
        UnaryTest::Range { .. } => {
            Err(BridgeError::UnsupportedCondition("half-open ranges have no `between` equivalent".to_string()))
        }
    }
}

/// Walk a condition tree built by [`leaf_from_test`]'s shape (a bare leaf,
/// or a top-level `all` of leaves) back into `(field, op, value)` triples.
fn collect_leaves(node: &ConditionNode, out: &mut Vec<(String, Op, Json)>) -> Result<(), BridgeError> {
    match node {
        ConditionNode::Leaf { field, op, value } => {
            out.push((field.clone(), *op, value.clone()));
            Ok(())
        }
        ConditionNode::All { all } => {
            for child in all {
                match child {
                    ConditionNode::Leaf { .. } => collect_leaves(child, out)?,
                    _ => {
                        return Err(BridgeError::UnsupportedCondition(
                            "bridge only converts a flat conjunction of leaves".to_string(),
                        ))
                    }
                }
            }
            Ok(())
        }
        ConditionNode::Any { .. } => {
            Err(BridgeError::UnsupportedCondition("`any` has no single-row DMN equivalent".to_string()))
        }
    }
}

fn unary_test_text(op: Op, value: &Json) -> Result<String, BridgeError> {
    match op {
        Op::Eq => render_literal(value),
        Op::Ne => Ok(format!("!= {}", render_literal(value)?)),
        Op::Lt => Ok(format!("< {}", render_literal(value)?)),
        Op::Lte => Ok(format!("<= {}", render_literal(value)?)),
        Op::Gt => Ok(format!("> {}", render_literal(value)?)),
        Op::Gte => Ok(format!(">= {}", render_literal(value)?)),
        Op::Between => {
            let arr = value.as_array().filter(|a| a.len() == 2).ok_or_else(|| {
                BridgeError::UnsupportedCondition("between requires a two-element [min, max] value".to_string())
            })?;
            Ok(format!("[{}..{}]", render_literal(&arr[0])?, render_literal(&arr[1])?))
        }
        other => Err(BridgeError::UnsupportedCondition(format!("operator {other:?} has no DMN unary-test form"))),
    }
}

fn render_literal(value: &Json) -> Result<String, BridgeError> {
    match value {
        Json::String(s) => Ok(quote_string(s)),
        Json::Number(n) => Ok(n.to_string()),
        Json::Bool(b) => Ok(b.to_string()),
        Json::Null => Ok("null".to_string()),
        other => Err(BridgeError::UnsupportedCondition(format!("{other} has no FEEL literal form"))),
    }
}

fn quote_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn scalar_to_string(value: &FeelValue) -> String {
    match value {
        FeelValue::String(s) => s.clone(),
        FeelValue::Number(n) => n.to_string(),
        FeelValue::Bool(b) => b.to_string(),
        other => format!("{:?}", other.to_json()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmn::LiteralExpression;

    fn sample_decision() -> Decision {
        Decision {
            id: "eligibility".to_string(),
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
        }
    }

    #[test]
    fn table_converts_to_ruleset_with_matching_rule_count() {
        let ruleset = table_to_ruleset(&sample_decision()).unwrap();
        assert_eq!(ruleset.rules.len(), 2);
        assert_eq!(ruleset.rules[0].then.decision, "approve");
        assert_eq!(ruleset.rules[1].then.decision, "reject");
        assert!(matches!(ruleset.rules[1].if_, ConditionNode::All { ref all } if all.is_empty()));
    }

    #[test]
    fn round_trip_preserves_row_count_and_hit_policy() {
        let original = sample_decision();
        let ruleset = table_to_ruleset(&original).unwrap();
        let graph = ruleset_to_table(&ruleset).unwrap();
        let DecisionLogic::Table(table) = &graph.decisions[0].logic else { panic!("expected table") };
        assert_eq!(table.hit_policy, HitPolicy::First);
        assert_eq!(table.rules.len(), 2);
        assert_eq!(table.inputs.len(), 1);
        assert_eq!(table.inputs[0].expression, "age");
    }

    #[test]
    fn non_first_hit_policy_is_rejected() {
        let mut decision = sample_decision();
        if let DecisionLogic::Table(t) = &mut decision.logic {
            t.hit_policy = HitPolicy::Unique;
        }
        assert!(matches!(table_to_ruleset(&decision), Err(BridgeError::UnsupportedHitPolicy(_))));
    }

    #[test]
    fn literal_logic_is_rejected() {
        let decision = Decision {
            id: "x".into(),
            name: None,
            logic: DecisionLogic::Literal(LiteralExpression { text: "1".into() }),
            information_requirements: vec![],
        };
        assert!(matches!(table_to_ruleset(&decision), Err(BridgeError::NotATable(_))));
    }
}
