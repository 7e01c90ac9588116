//! Audit sink interface (§6): `record(audit) → ok|err`. Sink failures must
//! never poison the decide path — §7 `AuditSinkFailure` is logged but does
//! not surface as an error from `Agent::decide`.

use crate::record::AuditRecord;
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditSinkError {
    #[error("failed to serialize audit record: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write audit record to {path}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },
}

pub trait AuditSink: Send + Sync {
    fn record(&self, audit: &AuditRecord) -> Result<(), AuditSinkError>;
}

/// Discards every record. The default for embedders that don't need audit
/// persistence (tests, simulation harnesses).
#[derive(Default)]
pub struct NullSink;

impl AuditSink for NullSink {
    fn record(&self, _audit: &AuditRecord) -> Result<(), AuditSinkError> {
        Ok(())
    }
}

/// Appends one JSON line per record to a file, serializing writes behind a
/// mutex so concurrent decisions don't interleave partial lines.
pub struct FileAuditSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, audit: &AuditRecord) -> Result<(), AuditSinkError> {
        let line = serde_json::to_string(audit)?;
        let _guard = self.lock.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| AuditSinkError::Io { path: self.path.clone(), source })?;
        writeln!(file, "{line}").map_err(|source| AuditSinkError::Io { path: self.path.clone(), source })?;
        Ok(())
    }
}

/// Emits each record as a structured `tracing` event at `info` level.
#[derive(Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, audit: &AuditRecord) -> Result<(), AuditSinkError> {
        tracing::info!(
            decision = ?audit.decision,
            confidence = audit.confidence,
            deterministic_hash = %audit.deterministic_hash,
            "audit.record"
        );
        Ok(())
    }
}

/// Fans a record out to every sink in the list; a failure in one sink does
/// not stop delivery to the rest, and all failures are collected.
#[derive(Default)]
pub struct FanOutSink {
    sinks: Vec<Arc<dyn AuditSink>>,
}

impl FanOutSink {
    pub fn new(sinks: Vec<Arc<dyn AuditSink>>) -> Self {
        Self { sinks }
    }
}

impl AuditSink for FanOutSink {
    fn record(&self, audit: &AuditRecord) -> Result<(), AuditSinkError> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.record(audit) {
                tracing::warn!(error = %e, "audit sink failed");
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AuditRecordBuilder;
    use tempfile::tempdir;

    fn sample() -> AuditRecord {
        AuditRecordBuilder::new("c".into(), "r".into()).decision(Some("approve".into())).build().unwrap()
    }

    #[test]
    fn file_sink_appends_jsonl() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let sink = FileAuditSink::new(&path);
        sink.record(&sample()).unwrap();
        sink.record(&sample()).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn null_sink_always_ok() {
        assert!(NullSink.record(&sample()).is_ok());
    }
}
