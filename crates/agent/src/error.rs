use thiserror::Error;

/// Errors surfaced by [`crate::orchestrator::Agent::decide`] (§4.7, §7).
///
/// Audit sink failures are deliberately absent here: per §7 they are logged
/// and never abort a decision.
#[derive(Debug, Error)]
pub enum AgentError {
    /// §7 `NoEvaluationsFailure`, raised only in strict mode when every
    /// evaluator in the agent produced no evaluation.
    #[error("no evaluator produced an evaluation for this context")]
    NoEvaluations,

    /// An evaluator's own ruleset or static evaluation was malformed in a
    /// way that should have been caught at construction time, not at
    /// decide-time; surfaced rather than silently skipped.
    #[error("evaluator {name} produced a malformed evaluation: {reason}")]
    MalformedEvaluation { name: String, reason: String },

    #[error("failed to canonicalize context: {0}")]
    Canonicalize(#[from] decision_core::CanonicalError),
}

/// Errors surfaced by [`crate::replay::replay_strict`] (§4.10).
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// §7 `ReplayMismatchFailure`: the recomputed audit record diverged from
    /// the original. Carries the full `{expected, actual, differences}` diff
    /// rather than a flattened message so callers can inspect individual
    /// fields without re-parsing error text.
    #[error("replay diverged from audit record: {} field(s): {}", .0.differences.len(), .0.differences.join(", "))]
    Mismatch(Box<crate::replay::ReplayDiff>),
}
