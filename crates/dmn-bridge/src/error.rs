use thiserror::Error;

/// Errors converting between a FIRST-policy [`dmn::DecisionTable`] and an
/// internal [`rules::Ruleset`].
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("dmn bridge only converts FIRST-policy tables, decision {0:?} uses a different hit policy")]
    UnsupportedHitPolicy(String),

    #[error("decision {0:?} has no decision table to convert")]
    NotATable(String),

    #[error("input clause {0:?} is not a simple field reference; the bridge requires a bare dotted path")]
    NonFieldExpression(String),

    #[error("rule {0:?}: {1}")]
    UnaryTest(String, #[source] feel::FeelError),

    #[error("rule {0:?} has no output entries to convert to a `then` block")]
    EmptyOutput(String),

    #[error("condition shape unsupported by the bridge: {0}")]
    UnsupportedCondition(String),

    #[error(transparent)]
    Dmn(#[from] dmn::DmnError),
}
