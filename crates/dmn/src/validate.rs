//! Structural validation of a parsed [`DecisionGraph`] (§4.14): duplicate
//! ids, cycles, dangling information requirements, and rule/header count
//! mismatches are all rejected here so the evaluator can assume a
//! well-formed graph.

use crate::error::DmnError;
use crate::model::{DecisionGraph, DecisionLogic};
use std::collections::HashSet;

pub fn validate_graph(graph: &DecisionGraph) -> Result<(), DmnError> {
    check_duplicate_ids(graph)?;
    check_requirements_resolve(graph)?;
    if graph.topological_order().is_none() {
        let first = graph.decisions.first().map(|d| d.id.clone()).unwrap_or_default();
        return Err(DmnError::Cycle(first));
    }
    check_table_shapes(graph)?;
    Ok(())
}

fn check_duplicate_ids(graph: &DecisionGraph) -> Result<(), DmnError> {
    let mut seen = HashSet::new();
    for decision in &graph.decisions {
        if !seen.insert(decision.id.as_str()) {
            return Err(DmnError::DuplicateId(decision.id.clone()));
        }
        if let DecisionLogic::Table(table) = &decision.logic {
            let mut column_ids = HashSet::new();
            for input in &table.inputs {
                if !column_ids.insert(input.id.as_str()) {
                    return Err(DmnError::DuplicateId(input.id.clone()));
                }
            }
            for output in &table.outputs {
                if !column_ids.insert(output.id.as_str()) {
                    return Err(DmnError::DuplicateId(output.id.clone()));
                }
            }
            let mut rule_ids = HashSet::new();
            for rule in &table.rules {
                if !rule_ids.insert(rule.id.as_str()) {
                    return Err(DmnError::DuplicateId(rule.id.clone()));
                }
            }
        }
    }
    Ok(())
}

fn check_requirements_resolve(graph: &DecisionGraph) -> Result<(), DmnError> {
    for decision in &graph.decisions {
        for target in &decision.information_requirements {
            if graph.get(target).is_none() {
                return Err(DmnError::MissingRequirement {
                    decision: decision.id.clone(),
                    target: target.clone(),
                });
            }
        }
    }
    Ok(())
}

fn check_table_shapes(graph: &DecisionGraph) -> Result<(), DmnError> {
    for decision in &graph.decisions {
        let DecisionLogic::Table(table) = &decision.logic else { continue };
        for rule in &table.rules {
            if rule.input_entries.len() != table.inputs.len() {
                return Err(DmnError::InputCountMismatch {
                    decision: decision.id.clone(),
                    rule_id: rule.id.clone(),
                    expected: table.inputs.len(),
                    actual: rule.input_entries.len(),
                });
            }
            if rule.output_entries.len() != table.outputs.len() {
                return Err(DmnError::OutputCountMismatch {
                    decision: decision.id.clone(),
                    rule_id: rule.id.clone(),
                    expected: table.outputs.len(),
                    actual: rule.output_entries.len(),
                });
            }
        }
    }
    Ok(())
}
