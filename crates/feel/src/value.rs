//! `FeelValue`: the runtime value a FEEL expression or unary test
//! produces. A strict subset of the FEEL data model (§4.15) — enough for
//! DMN decision tables and literal expressions, not the full OMG spec.

use serde_json::Value as Json;
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum FeelValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<FeelValue>),
    Context(BTreeMap<String, FeelValue>),
    Range { start: Box<FeelValue>, end: Box<FeelValue>, start_inclusive: bool, end_inclusive: bool },
}

impl FeelValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            FeelValue::Null => "null",
            FeelValue::Bool(_) => "boolean",
            FeelValue::Number(_) => "number",
            FeelValue::String(_) => "string",
            FeelValue::List(_) => "list",
            FeelValue::Context(_) => "context",
            FeelValue::Range { .. } => "range",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FeelValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeelValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn from_json(json: &Json) -> Self {
        match json {
            Json::Null => FeelValue::Null,
            Json::Bool(b) => FeelValue::Bool(*b),
            Json::Number(n) => FeelValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => FeelValue::String(s.clone()),
            Json::Array(items) => FeelValue::List(items.iter().map(FeelValue::from_json).collect()),
            Json::Object(map) => {
                FeelValue::Context(map.iter().map(|(k, v)| (k.clone(), FeelValue::from_json(v))).collect())
            }
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            FeelValue::Null => Json::Null,
            FeelValue::Bool(b) => Json::Bool(*b),
            FeelValue::Number(n) => serde_json::Number::from_f64(*n).map(Json::Number).unwrap_or(Json::Null),
            FeelValue::String(s) => Json::String(s.clone()),
            FeelValue::List(items) => Json::Array(items.iter().map(FeelValue::to_json).collect()),
            FeelValue::Context(map) => {
                Json::Object(map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
            }
            FeelValue::Range { .. } => Json::Null,
        }
    }

    /// FEEL's partial order over comparable values (numbers and strings).
    /// Returns `None` for values that cannot be ordered against each
    /// other, matching the non-fatality contract used across this engine.
    pub fn partial_compare(&self, other: &FeelValue) -> Option<Ordering> {
        match (self, other) {
            (FeelValue::Number(a), FeelValue::Number(b)) => a.partial_cmp(b),
            (FeelValue::String(a), FeelValue::String(b)) => Some(a.cmp(b)),
            (FeelValue::Bool(a), FeelValue::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}
