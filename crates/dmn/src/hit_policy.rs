//! Hit-policy evaluation of a single [`DecisionTable`] (§4.15): inputs are
//! tested with FEEL unary tests, matching rows' outputs are combined
//! according to the table's declared hit policy.

use crate::error::DmnError;
use crate::model::{Aggregator, DecisionRule, DecisionTable, HitPolicy};
use feel::{evaluate, matches, parse, parse_unary_tests, Bindings, FeelValue};

/// Evaluate every input column's expression once, then test each rule row.
/// Returns the FEEL value produced by the winning rule(s) according to the
/// table's hit policy.
pub fn evaluate_table(table: &DecisionTable, bindings: &Bindings) -> Result<FeelValue, DmnError> {
    let input_values = table
        .inputs
        .iter()
        .map(|clause| evaluate(&parse(&clause.expression)?, bindings))
        .collect::<Result<Vec<_>, _>>()?;

    let mut matched: Vec<&DecisionRule> = Vec::new();
    for rule in &table.rules {
        if row_matches(rule, &input_values)? {
            matched.push(rule);
        }
    }

    match &table.hit_policy {
        HitPolicy::Unique => match matched.as_slice() {
            [single] => row_output(single, table, bindings),
            other => Err(DmnError::UniqueViolation(table_label(table), other.len())),
        },
        HitPolicy::First => match matched.first() {
            Some(rule) => row_output(rule, table, bindings),
            None => Err(DmnError::NoMatch(table_label(table))),
        },
        HitPolicy::Priority => {
            let mut outputs = matched
                .iter()
                .map(|rule| row_output(rule, table, bindings))
                .collect::<Result<Vec<_>, _>>()?;
            let allowed = table.outputs.first().map(|o| o.allowed_values.as_slice()).unwrap_or(&[]);
            outputs.sort_by_key(|out| priority_rank(out, allowed));
            outputs.into_iter().next().ok_or_else(|| DmnError::NoMatch(table_label(table)))
        }
        HitPolicy::Any => {
            let outputs = matched
                .iter()
                .map(|rule| row_output(rule, table, bindings))
                .collect::<Result<Vec<_>, _>>()?;
            match outputs.split_first() {
                Some((first, rest)) if rest.iter().all(|o| o == first) => Ok(first.clone()),
                Some(_) => Err(DmnError::AnyViolation(table_label(table))),
                None => Err(DmnError::NoMatch(table_label(table))),
            }
        }
        HitPolicy::Collect(aggregator) => {
            let outputs = matched
                .iter()
                .map(|rule| row_output(rule, table, bindings))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(match aggregator {
                Some(agg) => aggregate(*agg, &outputs),
                None => FeelValue::List(outputs),
            })
        }
    }
}

fn row_matches(rule: &DecisionRule, input_values: &[FeelValue]) -> Result<bool, DmnError> {
    for (entry, value) in rule.input_entries.iter().zip(input_values) {
        let tests = parse_unary_tests(entry)?;
        if !matches(&tests, value) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Render a matched rule's output entries into a single value: a context
/// keyed by output name when the table has more than one output column,
/// otherwise the bare scalar.
fn row_output(rule: &DecisionRule, table: &DecisionTable, bindings: &Bindings) -> Result<FeelValue, DmnError> {
    let values = rule
        .output_entries
        .iter()
        .map(|entry| evaluate(&parse(entry)?, bindings))
        .collect::<Result<Vec<_>, feel::FeelError>>()?;
    if table.outputs.len() == 1 {
        return Ok(values.into_iter().next().unwrap_or(FeelValue::Null));
    }
    let mut map = std::collections::BTreeMap::new();
    for (output, value) in table.outputs.iter().zip(values) {
        map.insert(output.name.clone(), value);
    }
    Ok(FeelValue::Context(map))
}

/// Rank a matched row's output by its position in the output clause's
/// declared allowed-values list (lower index wins). A value absent from
/// the list, or an empty list (no `<outputValues>` declared), ranks last
/// among declared values but preserves stable rule-row order among peers.
fn priority_rank(value: &FeelValue, allowed: &[String]) -> usize {
    if allowed.is_empty() {
        return 0;
    }
    let text = feel_display(value);
    allowed.iter().position(|v| *v == text).unwrap_or(allowed.len())
}

/// Render a FEEL value the way it would appear as an unquoted allowed-value
/// entry, for matching against a declared `<outputValues>` list.
fn feel_display(value: &FeelValue) -> String {
    match value {
        FeelValue::String(s) => s.clone(),
        FeelValue::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
        FeelValue::Number(n) => n.to_string(),
        FeelValue::Bool(b) => b.to_string(),
        FeelValue::Null => "null".to_string(),
        other => format!("{other:?}"),
    }
}

fn aggregate(aggregator: Aggregator, outputs: &[FeelValue]) -> FeelValue {
    let numbers: Vec<f64> = outputs.iter().filter_map(FeelValue::as_f64).collect();
    match aggregator {
        Aggregator::Count => FeelValue::Number(outputs.len() as f64),
        Aggregator::Sum => FeelValue::Number(numbers.iter().sum()),
        Aggregator::Min => FeelValue::Number(numbers.into_iter().fold(f64::INFINITY, f64::min)),
        Aggregator::Max => FeelValue::Number(numbers.into_iter().fold(f64::NEG_INFINITY, f64::max)),
    }
}

fn table_label(table: &DecisionTable) -> String {
    format!("{:?}", table.hit_policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InputClause, OutputClause};

    fn table(hit_policy: HitPolicy, rules: Vec<DecisionRule>) -> DecisionTable {
        table_with_allowed_values(hit_policy, rules, Vec::new())
    }

    fn table_with_allowed_values(
        hit_policy: HitPolicy,
        rules: Vec<DecisionRule>,
        allowed_values: Vec<String>,
    ) -> DecisionTable {
        DecisionTable {
            hit_policy,
            inputs: vec![InputClause { id: "i1".into(), label: None, expression: "age".into() }],
            outputs: vec![OutputClause { id: "o1".into(), label: None, name: "decision".into(), allowed_values }],
            rules,
        }
    }

    fn rule(id: &str, input: &str, output: &str) -> DecisionRule {
        DecisionRule { id: id.into(), input_entries: vec![input.into()], output_entries: vec![output.into()] }
    }

    fn bindings_with_age(age: f64) -> Bindings {
        let mut b = Bindings::new();
        b.insert("age".into(), FeelValue::Number(age));
        b
    }

    #[test]
    fn first_policy_stops_at_first_match() {
        let t = table(HitPolicy::First, vec![rule("r1", ">= 18", "\"approve\""), rule("r2", "-", "\"reject\"")]);
        let out = evaluate_table(&t, &bindings_with_age(30.0)).unwrap();
        assert_eq!(out, FeelValue::String("approve".to_string()));
    }

    #[test]
    fn unique_policy_rejects_multiple_matches() {
        let t = table(HitPolicy::Unique, vec![rule("r1", "-", "\"a\""), rule("r2", "-", "\"b\"")]);
        assert!(matches!(evaluate_table(&t, &bindings_with_age(10.0)), Err(DmnError::UniqueViolation(_, 2))));
    }

    #[test]
    fn any_policy_accepts_agreeing_duplicates() {
        let t = table(HitPolicy::Any, vec![rule("r1", "-", "\"same\""), rule("r2", "-", "\"same\"")]);
        let out = evaluate_table(&t, &bindings_with_age(10.0)).unwrap();
        assert_eq!(out, FeelValue::String("same".to_string()));
    }

    #[test]
    fn any_policy_rejects_disagreeing_matches() {
        let t = table(HitPolicy::Any, vec![rule("r1", "-", "\"a\""), rule("r2", "-", "\"b\"")]);
        assert!(matches!(evaluate_table(&t, &bindings_with_age(10.0)), Err(DmnError::AnyViolation(_))));
    }

    #[test]
    fn collect_without_aggregator_returns_list() {
        let t = table(HitPolicy::Collect(None), vec![rule("r1", "-", "1"), rule("r2", "-", "2")]);
        let out = evaluate_table(&t, &bindings_with_age(10.0)).unwrap();
        assert_eq!(out, FeelValue::List(vec![FeelValue::Number(1.0), FeelValue::Number(2.0)]));
    }

    #[test]
    fn collect_with_sum_aggregator_folds_the_list() {
        let t = table(HitPolicy::Collect(Some(Aggregator::Sum)), vec![rule("r1", "-", "1"), rule("r2", "-", "2")]);
        let out = evaluate_table(&t, &bindings_with_age(10.0)).unwrap();
        assert_eq!(out, FeelValue::Number(3.0));
    }

    #[test]
    fn priority_policy_ranks_string_outputs_by_declared_order() {
        let t = table_with_allowed_values(
            HitPolicy::Priority,
            vec![
                rule("r1", ">= 18", "\"conditional\""),
                rule("r2", ">= 18", "\"approve\""),
            ],
            vec!["approve".to_string(), "conditional".to_string(), "reject".to_string()],
        );
        let out = evaluate_table(&t, &bindings_with_age(30.0)).unwrap();
        assert_eq!(out, FeelValue::String("approve".to_string()));
    }

    #[test]
    fn priority_policy_without_declared_values_falls_back_to_row_order() {
        let t = table(HitPolicy::Priority, vec![rule("r1", ">= 18", "\"conditional\""), rule("r2", ">= 18", "\"approve\"")]);
        let out = evaluate_table(&t, &bindings_with_age(30.0)).unwrap();
        assert_eq!(out, FeelValue::String("conditional".to_string()));
    }

    #[test]
    fn no_match_is_an_error_for_first_policy() {
        let t = table(HitPolicy::First, vec![rule("r1", ">= 18", "\"approve\"")]);
        assert!(matches!(evaluate_table(&t, &bindings_with_age(5.0)), Err(DmnError::NoMatch(_))));
    }
}
