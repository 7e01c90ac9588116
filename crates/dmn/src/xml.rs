//! DMN 1.3 XML import/export (§4.14, §6). Supports the element subset
//! named in the external-interface contract: `definitions, decision,
//! decisionTable, input, output, inputExpression, inputEntry, outputEntry,
//! rule, informationRequirement, literalExpression`.

use crate::error::DmnError;
use crate::model::{
    Decision, DecisionGraph, DecisionLogic, DecisionRule, DecisionTable, HitPolicy, InputClause,
    LiteralExpression, OutputClause,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

pub fn parse(xml: &str) -> Result<DecisionGraph, DmnError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut decisions = Vec::new();

    let mut current: Option<PartialDecision> = None;
    let mut table: Option<PartialTable> = None;
    let mut rule: Option<DecisionRule> = None;
    let mut pending_input: Option<(String, Option<String>)> = None;
    let mut pending_output: Option<OutputClause> = None;
    let mut last_text = String::new();

    loop {
        match reader.read_event().map_err(|e| DmnError::Xml(e.to_string()))? {
            Event::Start(ref e) => {
                let name = local_name(e);
                handle_start(&name, e, false, &mut current, &mut table, &mut pending_input, &mut pending_output)?;
                if name == "rule" {
                    rule = Some(DecisionRule {
                        id: attr(e, "id").unwrap_or_else(|| format!("rule-{}", table.as_ref().map_or(0, |t| t.rules.len()))),
                        input_entries: Vec::new(),
                        output_entries: Vec::new(),
                    });
                }
            }
            Event::Empty(ref e) => {
                let name = local_name(e);
                handle_start(&name, e, true, &mut current, &mut table, &mut pending_input, &mut pending_output)?;
            }
            Event::Text(ref t) => {
                last_text = t.unescape().map_err(|e| DmnError::Xml(e.to_string()))?.into_owned();
            }
            Event::End(ref e) => {
                let name = local_name_end(e);
                handle_end(
                    &name,
                    &last_text,
                    &mut decisions,
                    &mut current,
                    &mut table,
                    &mut rule,
                    &mut pending_input,
                    &mut pending_output,
                )?;
                last_text.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(DecisionGraph { decisions })
}

struct PartialDecision {
    id: String,
    name: Option<String>,
    information_requirements: Vec<String>,
    literal: Option<String>,
    table: Option<DecisionTable>,
}

struct PartialTable {
    hit_policy: HitPolicy,
    inputs: Vec<InputClause>,
    outputs: Vec<OutputClause>,
    rules: Vec<DecisionRule>,
}

fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn local_name_end(e: &quick_xml::events::BytesEnd) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attr(e: &BytesStart, key: &str) -> Option<String> {
    e.attributes().flatten().find(|a| a.key.as_ref() == key.as_bytes()).map(|a| {
        String::from_utf8_lossy(a.value.as_ref()).into_owned()
    })
}

#[allow(clippy::too_many_arguments)]
fn handle_start(
    name: &str,
    e: &BytesStart,
    is_empty: bool,
    current: &mut Option<PartialDecision>,
    table: &mut Option<PartialTable>,
    pending_input: &mut Option<(String, Option<String>)>,
    pending_output: &mut Option<OutputClause>,
) -> Result<(), DmnError> {
    match name {
        "decision" => {
            let id = attr(e, "id").ok_or_else(|| DmnError::Xml("decision missing id".into()))?;
            let label = attr(e, "name");
            *current = Some(PartialDecision {
                id,
                name: label,
                information_requirements: Vec::new(),
                literal: None,
                table: None,
            });
        }
        "requiredDecision" => {
            if let Some(href) = attr(e, "href") {
                if let Some(dec) = current.as_mut() {
                    dec.information_requirements.push(href.trim_start_matches('#').to_string());
                }
            }
        }
        "decisionTable" => {
            let hit_policy_attr = attr(e, "hitPolicy").unwrap_or_else(|| "UNIQUE".to_string());
            let aggregation = attr(e, "aggregation");
            let hit_policy = HitPolicy::parse(&hit_policy_attr, aggregation.as_deref())
                .ok_or_else(|| DmnError::UnknownHitPolicy(hit_policy_attr.clone()))?;
            *table = Some(PartialTable { hit_policy, inputs: Vec::new(), outputs: Vec::new(), rules: Vec::new() });
        }
        "input" => {
            let id = attr(e, "id").ok_or_else(|| DmnError::Xml("input missing id".into()))?;
            let label = attr(e, "label");
            *pending_input = Some((id, label));
        }
        "output" => {
            let id = attr(e, "id").ok_or_else(|| DmnError::Xml("output missing id".into()))?;
            let label = attr(e, "label");
            let output_name = attr(e, "name").unwrap_or_else(|| id.clone());
            let clause = OutputClause { id, label, name: output_name, allowed_values: Vec::new() };
            if is_empty {
                if let Some(t) = table.as_mut() {
                    t.outputs.push(clause);
                }
            } else {
                *pending_output = Some(clause);
            }
        }
        _ => {}
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_end(
    name: &str,
    text: &str,
    decisions: &mut Vec<Decision>,
    current: &mut Option<PartialDecision>,
    table: &mut Option<PartialTable>,
    rule: &mut Option<DecisionRule>,
    pending_input: &mut Option<(String, Option<String>)>,
    pending_output: &mut Option<OutputClause>,
) -> Result<(), DmnError> {
    match name {
        "inputExpression" => {
            if let Some((id, label)) = pending_input.take() {
                if let Some(t) = table.as_mut() {
                    t.inputs.push(InputClause { id, label, expression: text.to_string() });
                }
            }
        }
        "inputEntry" => {
            if let Some(r) = rule.as_mut() {
                r.input_entries.push(text.to_string());
            }
        }
        "outputEntry" => {
            if let Some(r) = rule.as_mut() {
                r.output_entries.push(text.to_string());
            }
        }
        "text" => {
            if let Some(o) = pending_output.as_mut() {
                o.allowed_values = parse_allowed_values(text);
            }
        }
        "output" => {
            if let Some(o) = pending_output.take() {
                if let Some(t) = table.as_mut() {
                    t.outputs.push(o);
                }
            }
        }
        "rule" => {
            if let (Some(t), Some(r)) = (table.as_mut(), rule.take()) {
                t.rules.push(r);
            }
        }
        "decisionTable" => {
            if let (Some(dec), Some(t)) = (current.as_mut(), table.take()) {
                dec.table = Some(DecisionTable {
                    hit_policy: t.hit_policy,
                    inputs: t.inputs,
                    outputs: t.outputs,
                    rules: t.rules,
                });
            }
        }
        "literalExpression" => {
            if let Some(dec) = current.as_mut() {
                if dec.literal.is_none() {
                    dec.literal = Some(text.to_string());
                }
            }
        }
        "decision" => {
            if let Some(dec) = current.take() {
                let logic = dec
                    .table
                    .map(DecisionLogic::Table)
                    .or_else(|| dec.literal.map(|t| DecisionLogic::Literal(LiteralExpression { text: t })));
                let logic = logic.ok_or_else(|| DmnError::Xml(format!("decision {:?} has no logic", dec.id)))?;
                decisions.push(Decision {
                    id: dec.id,
                    name: dec.name,
                    logic,
                    information_requirements: dec.information_requirements,
                });
            }
        }
        _ => {}
    }
    Ok(())
}

/// Serialize a graph back to DMN 1.3 XML. Lossless for FIRST-policy tables
/// built by the `dmn-bridge` crate's rule-to-table conversion; other
/// policies re-export the original structure verbatim since it was never
/// converted away from.
pub fn to_xml(graph: &DecisionGraph) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<definitions xmlns=\"https://www.omg.org/spec/DMN/20191111/MODEL/\" id=\"definitions\" name=\"definitions\">\n");
    for decision in &graph.decisions {
        out.push_str(&format!(
            "  <decision id=\"{}\" name=\"{}\">\n",
            escape(&decision.id),
            escape(decision.name.as_deref().unwrap_or(&decision.id))
        ));
        for req in &decision.information_requirements {
            out.push_str("    <informationRequirement>\n");
            out.push_str(&format!("      <requiredDecision href=\"#{}\"/>\n", escape(req)));
            out.push_str("    </informationRequirement>\n");
        }
        match &decision.logic {
            DecisionLogic::Table(table) => write_table(&mut out, table),
            DecisionLogic::Literal(lit) => {
                out.push_str(&format!("    <literalExpression>{}</literalExpression>\n", escape(&lit.text)));
            }
        }
        out.push_str("  </decision>\n");
    }
    out.push_str("</definitions>\n");
    out
}

fn write_table(out: &mut String, table: &DecisionTable) {
    let (hit_policy, aggregation) = hit_policy_attrs(&table.hit_policy);
    out.push_str(&format!("    <decisionTable hitPolicy=\"{hit_policy}\""));
    if let Some(agg) = aggregation {
        out.push_str(&format!(" aggregation=\"{agg}\""));
    }
    out.push_str(">\n");
    for input in &table.inputs {
        out.push_str(&format!(
            "      <input id=\"{}\" label=\"{}\"><inputExpression>{}</inputExpression></input>\n",
            escape(&input.id),
            escape(input.label.as_deref().unwrap_or("")),
            escape(&input.expression)
        ));
    }
    for output in &table.outputs {
        if output.allowed_values.is_empty() {
            out.push_str(&format!(
                "      <output id=\"{}\" name=\"{}\"/>\n",
                escape(&output.id),
                escape(&output.name)
            ));
        } else {
            out.push_str(&format!(
                "      <output id=\"{}\" name=\"{}\">\n",
                escape(&output.id),
                escape(&output.name)
            ));
            out.push_str(&format!(
                "        <outputValues><text>{}</text></outputValues>\n",
                render_allowed_values(&output.allowed_values)
            ));
            out.push_str("      </output>\n");
        }
    }
    for rule in &table.rules {
        out.push_str(&format!("      <rule id=\"{}\">\n", escape(&rule.id)));
        for entry in &rule.input_entries {
            out.push_str(&format!("        <inputEntry>{}</inputEntry>\n", escape(entry)));
        }
        for entry in &rule.output_entries {
            out.push_str(&format!("        <outputEntry>{}</outputEntry>\n", escape(entry)));
        }
        out.push_str("      </rule>\n");
    }
    out.push_str("    </decisionTable>\n");
}

fn hit_policy_attrs(policy: &HitPolicy) -> (&'static str, Option<&'static str>) {
    match policy {
        HitPolicy::Unique => ("UNIQUE", None),
        HitPolicy::First => ("FIRST", None),
        HitPolicy::Priority => ("PRIORITY", None),
        HitPolicy::Any => ("ANY", None),
        HitPolicy::Collect(agg) => (
            "COLLECT",
            agg.map(|a| match a {
                crate::model::Aggregator::Sum => "SUM",
                crate::model::Aggregator::Min => "MIN",
                crate::model::Aggregator::Max => "MAX",
                crate::model::Aggregator::Count => "COUNT",
            }),
        ),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

/// Split an `<outputValues><text>` body (a comma-separated FEEL unary-test
/// list, e.g. `"approve","conditional","reject"`) into its unquoted
/// values, in declared order.
fn parse_allowed_values(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_matches('"').to_string())
        .collect()
}

fn render_allowed_values(values: &[String]) -> String {
    values.iter().map(|v| format!("\"{}\"", escape(v))).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<definitions xmlns="https://www.omg.org/spec/DMN/20191111/MODEL/" id="defs" name="defs">
  <decision id="eligibility" name="eligibility">
    <decisionTable hitPolicy="FIRST">
      <input id="i1" label="age"><inputExpression>age</inputExpression></input>
      <output id="o1" name="decision"/>
      <rule id="r1">
        <inputEntry>&gt;= 18</inputEntry>
        <outputEntry>"approve"</outputEntry>
      </rule>
      <rule id="r2">
        <inputEntry>-</inputEntry>
        <outputEntry>"reject"</outputEntry>
      </rule>
    </decisionTable>
  </decision>
</definitions>"#;

    #[test]
    fn parses_decision_table_with_first_policy() {
        let graph = parse(SAMPLE).unwrap();
        assert_eq!(graph.decisions.len(), 1);
        let decision = &graph.decisions[0];
        assert_eq!(decision.id, "eligibility");
        let DecisionLogic::Table(table) = &decision.logic else { panic!("expected table") };
        assert_eq!(table.hit_policy, HitPolicy::First);
        assert_eq!(table.rules.len(), 2);
        assert_eq!(table.rules[0].input_entries, vec![">= 18".to_string()]);
        assert_eq!(table.rules[0].output_entries, vec!["\"approve\"".to_string()]);
    }

    #[test]
    fn round_trips_through_export_and_reimport() {
        let graph = parse(SAMPLE).unwrap();
        let xml = to_xml(&graph);
        let reparsed = parse(&xml).unwrap();
        assert_eq!(graph, reparsed);
    }

    const PRIORITY_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<definitions xmlns="https://www.omg.org/spec/DMN/20191111/MODEL/" id="defs" name="defs">
  <decision id="eligibility" name="eligibility">
    <decisionTable hitPolicy="PRIORITY">
      <input id="i1" label="age"><inputExpression>age</inputExpression></input>
      <output id="o1" name="decision">
        <outputValues><text>"approve","conditional","reject"</text></outputValues>
      </output>
      <rule id="r1">
        <inputEntry>>= 18</inputEntry>
        <outputEntry>"conditional"</outputEntry>
      </rule>
    </decisionTable>
  </decision>
</definitions>"#;

    #[test]
    fn parses_declared_output_values() {
        let graph = parse(PRIORITY_SAMPLE).unwrap();
        let DecisionLogic::Table(table) = &graph.decisions[0].logic else { panic!("expected table") };
        assert_eq!(
            table.outputs[0].allowed_values,
            vec!["approve".to_string(), "conditional".to_string(), "reject".to_string()]
        );
    }

    #[test]
    fn output_values_round_trip_through_export_and_reimport() {
        let graph = parse(PRIORITY_SAMPLE).unwrap();
        let xml = to_xml(&graph);
        let reparsed = parse(&xml).unwrap();
        assert_eq!(graph, reparsed);
    }
}
