use thiserror::Error;

/// Errors raised parsing, validating, or evaluating a DMN decision graph.
#[derive(Debug, Error)]
pub enum DmnError {
    #[error("malformed DMN document: {0}")]
    Xml(String),

    #[error("unknown hit policy {0:?}")]
    UnknownHitPolicy(String),

    #[error("duplicate element id {0:?}")]
    DuplicateId(String),

    #[error("decision graph contains a cycle involving {0:?}")]
    Cycle(String),

    #[error("information requirement on {decision:?} targets unknown decision {target:?}")]
    MissingRequirement { decision: String, target: String },

    #[error("rule {rule_id:?} in decision {decision:?} has {actual} input entries, table declares {expected}")]
    InputCountMismatch { decision: String, rule_id: String, expected: usize, actual: usize },

    #[error("rule {rule_id:?} in decision {decision:?} has {actual} output entries, table declares {expected}")]
    OutputCountMismatch { decision: String, rule_id: String, expected: usize, actual: usize },

    #[error("hit policy UNIQUE violated in decision {0:?}: {1} rules matched")]
    UniqueViolation(String, usize),

    #[error("hit policy ANY violated in decision {0:?}: matching rules disagree on output")]
    AnyViolation(String),

    #[error("no rule matched in decision {0:?} and no default output is defined")]
    NoMatch(String),

    #[error(transparent)]
    Feel(#[from] feel::FeelError),

    #[error("failed to canonicalize DMN graph: {0}")]
    Canonicalize(#[from] decision_core::CanonicalError),
}
