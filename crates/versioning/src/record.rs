//! `VersionRecord` (§4.11): one persisted edition of a ruleset under a
//! `rule_id`, with lifecycle status. Never destroyed in normal flow —
//! version history is append-only; only `status` transitions.

use rules::Ruleset;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VersionStatus {
    Draft,
    Active,
    Archived,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VersionRecord {
    pub id: String,
    pub rule_id: String,
    pub version_number: u64,
    pub content: Ruleset,
    pub created_by: String,
    pub created_at: u64,
    pub status: VersionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_version_id: Option<String>,
}

/// `rule_id`-scoped history summary (§4.11 `get_history`).
#[derive(Debug, Clone, Serialize)]
pub struct History {
    pub rule_id: String,
    pub total_versions: usize,
    pub active_version: Option<VersionSummary>,
    pub earliest_created_at: Option<u64>,
    pub latest_created_at: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionSummary {
    pub id: String,
    pub version_number: u64,
}

/// Structural diff between two rulesets' rule lists, by rule id (§4.11
/// `compare`). `changed` lists rule ids present in both whose canonical
/// JSON form differs, without attempting a deep key-path diff beyond that
/// — callers needing finer detail can canonicalize each side themselves.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RulesetDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
}

pub fn diff_rulesets(a: &Ruleset, b: &Ruleset) -> RulesetDiff {
    use std::collections::HashMap;

    let a_rules: HashMap<&str, &rules::Rule> = a.rules.iter().map(|r| (r.id.as_str(), r)).collect();
    let b_rules: HashMap<&str, &rules::Rule> = b.rules.iter().map(|r| (r.id.as_str(), r)).collect();

    let mut added: Vec<String> = b_rules.keys().filter(|id| !a_rules.contains_key(*id)).map(|s| s.to_string()).collect();
    let mut removed: Vec<String> =
        a_rules.keys().filter(|id| !b_rules.contains_key(*id)).map(|s| s.to_string()).collect();
    let mut changed: Vec<String> = a_rules
        .iter()
        .filter_map(|(id, rule_a)| {
            b_rules.get(id).and_then(|rule_b| {
                let a_json = serde_json::to_value(rule_a).ok()?;
                let b_json = serde_json::to_value(rule_b).ok()?;
                (a_json != b_json).then(|| id.to_string())
            })
        })
        .collect();

    added.sort();
    removed.sort();
    changed.sort();
    RulesetDiff { added, removed, changed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ruleset(rules_json: serde_json::Value) -> Ruleset {
        rules::validate_document(&json!({"version": "1", "ruleset": "kyc", "rules": rules_json})).unwrap()
    }

    #[test]
    fn diff_detects_added_removed_changed() {
        let a = ruleset(json!([
            {"id": "r1", "if": {"field": "a", "op": "eq", "value": 1}, "then": {"decision": "x", "weight": 0.5, "reason": "r"}},
            {"id": "r2", "if": {"field": "a", "op": "eq", "value": 2}, "then": {"decision": "y", "weight": 0.5, "reason": "r"}}
        ]));
        let b = ruleset(json!([
            {"id": "r1", "if": {"field": "a", "op": "eq", "value": 99}, "then": {"decision": "x", "weight": 0.5, "reason": "r"}},
            {"id": "r3", "if": {"field": "a", "op": "eq", "value": 3}, "then": {"decision": "z", "weight": 0.5, "reason": "r"}}
        ]));
        let diff = diff_rulesets(&a, &b);
        assert_eq!(diff.added, vec!["r3".to_string()]);
        assert_eq!(diff.removed, vec!["r2".to_string()]);
        assert_eq!(diff.changed, vec!["r1".to_string()]);
    }
}
