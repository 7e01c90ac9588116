//! Replay (§4.10): reconstruct a [`Decision`] from an [`AuditRecord`] by
//! re-running the same [`Agent`] against a caller-supplied context, then
//! comparing the two records.

use crate::decision::Decision;
use crate::error::{AgentError, ReplayError};
use crate::orchestrator::Agent;
use audit::AuditRecord;
use chrono::{DateTime, Utc};
use decision_core::Context;

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayDiff {
    pub expected: AuditRecord,
    pub actual: AuditRecord,
    pub differences: Vec<String>,
}

pub enum ReplayOutcome {
    Matched(Decision),
    Diverged(ReplayDiff),
}

/// Strict replay: field-by-field diff against `original`. Any divergence is
/// an error carrying the full diff so callers can inspect it.
pub fn replay_strict(
    agent: &Agent,
    ctx: &Context,
    now: DateTime<Utc>,
    original: &AuditRecord,
) -> Result<Decision, ReplayError> {
    match replay_outcome(agent, ctx, now, original)? {
        ReplayOutcome::Matched(decision) => Ok(decision),
        ReplayOutcome::Diverged(diff) => Err(ReplayError::Mismatch(Box::new(diff))),
    }
}

/// Reconstruct a decision and report whether it matched `original`, without
/// turning a divergence into an error. Strict replay is built on top of
/// this; callers that want the structured diff without the `Result`
/// plumbing can call it directly.
pub fn replay_outcome(
    agent: &Agent,
    ctx: &Context,
    now: DateTime<Utc>,
    original: &AuditRecord,
) -> Result<ReplayOutcome, AgentError> {
    let decision = agent.decide(ctx, now)?;
    let differences = diff(original, &decision.audit_payload);
    if differences.is_empty() {
        Ok(ReplayOutcome::Matched(decision))
    } else {
        Ok(ReplayOutcome::Diverged(ReplayDiff {
            expected: original.clone(),
            actual: decision.audit_payload.clone(),
            differences,
        }))
    }
}

/// Lenient replay: reconstruct and return regardless of divergence,
/// logging a warning for each field that differs from `original`.
pub fn replay_lenient(
    agent: &Agent,
    ctx: &Context,
    now: DateTime<Utc>,
    original: &AuditRecord,
) -> Result<Decision, ReplayError> {
    let decision = agent.decide(ctx, now)?;
    for field in diff(original, &decision.audit_payload) {
        tracing::warn!(field = %field, "replay diverged from original audit record");
    }
    Ok(decision)
}

fn diff(expected: &AuditRecord, actual: &AuditRecord) -> Vec<String> {
    let mut differences = Vec::new();
    if expected.decision != actual.decision {
        differences.push("decision".to_string());
    }
    if (expected.confidence - actual.confidence).abs() > f64::EPSILON {
        differences.push("confidence".to_string());
    }
    if expected.explanations != actual.explanations {
        differences.push("explanations".to_string());
    }
    if expected.evaluator_signatures != actual.evaluator_signatures {
        differences.push("evaluator_signatures".to_string());
    }
    if expected.context_hash != actual.context_hash {
        differences.push("context_hash".to_string());
    }
    if expected.ruleset_hash != actual.ruleset_hash {
        differences.push("ruleset_hash".to_string());
    }
    if expected.deterministic_hash != actual.deterministic_hash {
        differences.push("deterministic_hash".to_string());
    }
    differences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::AgentBuilder;
    use crate::scoring::WeightedAverage;
    use evaluator::StaticEvaluator;
    use serde_json::json;
    use std::sync::Arc;

    fn sample_agent() -> Agent {
        let evaluation = evaluator::Evaluation::new("approve", 0.9, "low value", "kyc");
        let ev = Arc::new(StaticEvaluator::new("kyc", evaluation));
        AgentBuilder::new(Arc::new(WeightedAverage)).evaluator(ev).build()
    }

    #[test]
    fn strict_replay_matches_identical_rerun() {
        let agent = sample_agent();
        let ctx = Context::new(json!({"amount": 100})).unwrap();
        let now = Utc::now();
        let original = agent.decide(&ctx, now).unwrap().audit_payload;
        let replayed = replay_strict(&agent, &ctx, now, &original).unwrap();
        assert_eq!(replayed.audit_payload.deterministic_hash, original.deterministic_hash);
    }

    #[test]
    fn strict_replay_detects_tampering() {
        let agent = sample_agent();
        let ctx = Context::new(json!({"amount": 100})).unwrap();
        let now = Utc::now();
        let mut tampered = agent.decide(&ctx, now).unwrap().audit_payload;
        tampered.confidence = 0.01;
        tampered.deterministic_hash = "deadbeef".to_string();
        let result = replay_strict(&agent, &ctx, now, &tampered);
        let Err(ReplayError::Mismatch(diff)) = result else { panic!("expected a mismatch") };
        assert!(diff.differences.contains(&"confidence".to_string()));
        assert!(diff.differences.contains(&"deterministic_hash".to_string()));
    }

    #[test]
    fn lenient_replay_never_fails_on_divergence() {
        let agent = sample_agent();
        let ctx = Context::new(json!({"amount": 100})).unwrap();
        let now = Utc::now();
        let mut tampered = agent.decide(&ctx, now).unwrap().audit_payload;
        tampered.confidence = 0.01;
        assert!(replay_lenient(&agent, &ctx, now, &tampered).is_ok());
    }
}
