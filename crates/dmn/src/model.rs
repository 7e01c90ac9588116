//! The DMN decision-graph model (§3): a directed acyclic graph of
//! Decisions, each carrying either a decision table or a literal FEEL
//! expression, connected by information-requirement edges.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregator {
    Sum,
    Min,
    Max,
    Count,
}

impl Aggregator {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "SUM" => Some(Self::Sum),
            "MIN" => Some(Self::Min),
            "MAX" => Some(Self::Max),
            "COUNT" => Some(Self::Count),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HitPolicy {
    Unique,
    First,
    Priority,
    Any,
    Collect(Option<Aggregator>),
}

impl HitPolicy {
    /// Parse the `hitPolicy` attribute, plus the collect aggregator from a
    /// sibling `aggregation` attribute when present.
    pub fn parse(hit_policy: &str, aggregation: Option<&str>) -> Option<Self> {
        match hit_policy {
            "UNIQUE" => Some(Self::Unique),
            "FIRST" => Some(Self::First),
            "PRIORITY" => Some(Self::Priority),
            "ANY" => Some(Self::Any),
            "COLLECT" => Some(Self::Collect(aggregation.and_then(Aggregator::parse))),
            _ => None,
        }
    }
}

/// One input column: the FEEL expression whose value is tested against
/// each rule row's unary test for this column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputClause {
    pub id: String,
    pub label: Option<String>,
    pub expression: String,
}

/// One output column: the name under which its value is exposed once a
/// rule matches, plus its declared allowed-values list (`<outputValues>`),
/// which PRIORITY hit policy ranks matches against. Empty when the table
/// declares no allowed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputClause {
    pub id: String,
    pub label: Option<String>,
    pub name: String,
    pub allowed_values: Vec<String>,
}

/// One row of a decision table: a FEEL unary-test text per input column,
/// a FEEL literal-expression text per output column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRule {
    pub id: String,
    pub input_entries: Vec<String>,
    pub output_entries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTable {
    pub hit_policy: HitPolicy,
    pub inputs: Vec<InputClause>,
    pub outputs: Vec<OutputClause>,
    pub rules: Vec<DecisionRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralExpression {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecisionLogic {
    Table(DecisionTable),
    Literal(LiteralExpression),
}

/// One node of the decision graph: named logic plus the ids of decisions
/// whose output this one's logic may reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: String,
    pub name: Option<String>,
    pub logic: DecisionLogic,
    pub information_requirements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionGraph {
    pub decisions: Vec<Decision>,
}

impl DecisionGraph {
    pub fn get(&self, id: &str) -> Option<&Decision> {
        self.decisions.iter().find(|d| d.id == id)
    }

    /// Decisions no other decision requires — the graph's output nodes.
    pub fn sinks(&self) -> Vec<&Decision> {
        let required: std::collections::HashSet<&str> = self
            .decisions
            .iter()
            .flat_map(|d| d.information_requirements.iter().map(String::as_str))
            .collect();
        self.decisions.iter().filter(|d| !required.contains(d.id.as_str())).collect()
    }

    /// Kahn's-algorithm topological order, shallowest dependencies first.
    /// Returns `None` if the graph contains a cycle.
    pub fn topological_order(&self) -> Option<Vec<&Decision>> {
        let mut in_degree: std::collections::HashMap<&str, usize> = self
            .decisions
            .iter()
            .map(|d| (d.id.as_str(), d.information_requirements.len()))
            .collect();

        let mut ready: std::collections::VecDeque<&str> = in_degree
            .iter()
            .filter(|(_, deg)| **deg == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut order = Vec::with_capacity(self.decisions.len());
        let mut remaining = in_degree.clone();

        while let Some(id) = ready.pop_front() {
            order.push(id);
            for decision in &self.decisions {
                if decision.information_requirements.iter().any(|r| r == id) {
                    let entry = remaining.get_mut(decision.id.as_str()).unwrap();
                    *entry -= 1;
                    if *entry == 0 {
                        ready.push_back(&decision.id);
                    }
                }
            }
        }

        if order.len() != self.decisions.len() {
            return None;
        }
        Some(order.into_iter().filter_map(|id| self.get(id)).collect())
    }
}
