use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("unknown enrichment endpoint {0:?}")]
    UnknownEndpoint(String),

    #[error("failed to parse endpoint config: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("failed to canonicalize cache key: {0}")]
    Canonicalize(#[from] decision_core::CanonicalError),
}
