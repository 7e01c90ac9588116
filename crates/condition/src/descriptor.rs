//! Human-readable, pass/fail-annotated renderings of a condition tree,
//! used for `Decision::because` / `Decision::failed_conditions`.

use serde::Serialize;

/// A rendered condition node, annotated with whether it passed.
#[derive(Debug, Clone, Serialize)]
pub struct Descriptor {
    pub text: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Descriptor>,
}

impl Descriptor {
    pub fn leaf(text: impl Into<String>, passed: bool) -> Self {
        Descriptor { text: text.into(), passed, children: Vec::new() }
    }

    pub fn combinator(text: impl Into<String>, passed: bool, children: Vec<Descriptor>) -> Self {
        Descriptor { text: text.into(), passed, children }
    }
}

/// The outcome of evaluating a [`crate::ConditionNode`]: the boolean result
/// plus the descriptor tree explaining why.
#[derive(Debug, Clone)]
pub struct EvalOutcome {
    pub passed: bool,
    pub descriptor: Descriptor,
}

/// Render a leaf's canonical value form for inclusion in a descriptor string.
pub fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
