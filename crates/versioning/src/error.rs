use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersioningError {
    #[error("rule_id {0:?} has no versions")]
    UnknownRule(String),

    #[error("version {0:?} not found")]
    UnknownVersion(String),

    #[error("serialization failure: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("storage io error at {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("storage is in an inconsistent state for rule_id {rule_id:?}: {detail}")]
    Inconsistent { rule_id: String, detail: String },

    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
