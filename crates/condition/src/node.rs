//! The condition predicate tree: combinators over leaf operator checks.

use crate::op::Op;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// A single node in a rule's `if` predicate tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionNode {
    /// Short-circuit conjunction. An empty list is vacuously true.
    #[serde(deny_unknown_fields)]
    All {
        all: Vec<ConditionNode>,
    },
    /// Short-circuit disjunction. An empty list is vacuously false.
    #[serde(deny_unknown_fields)]
    Any {
        any: Vec<ConditionNode>,
    },
    #[serde(deny_unknown_fields)]
    Leaf {
        field: String,
        op: Op,
        #[serde(default)]
        value: Json,
    },
}

impl ConditionNode {
    pub fn leaf(field: impl Into<String>, op: Op, value: Json) -> Self {
        ConditionNode::Leaf { field: field.into(), op, value }
    }

    pub fn all(children: Vec<ConditionNode>) -> Self {
        ConditionNode::All { all: children }
    }

    pub fn any(children: Vec<ConditionNode>) -> Self {
        ConditionNode::Any { any: children }
    }
}
