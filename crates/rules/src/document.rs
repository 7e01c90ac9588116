//! The rule document data model (§3): `Ruleset`, `Rule`, and the `then`
//! verdict template a matched rule produces.

use condition::ConditionNode;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// The verdict template a rule contributes when its `if` matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Then {
    pub decision: String,
    pub weight: f64,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Json>,
}

/// One rule: a predicate plus the verdict it contributes when matched.
/// Belongs to a [`Ruleset`]; never mutated after validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    pub id: String,
    #[serde(rename = "if")]
    pub if_: ConditionNode,
    pub then: Then,
}

/// An ordered collection of rules under a namespace and version tag.
/// Rule evaluation order is document order; this document is canonicalized
/// on load and its canonical byte form is what the audit layer hashes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ruleset {
    pub version: String,
    pub ruleset: String,
    pub rules: Vec<Rule>,
}

impl Ruleset {
    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }
}
