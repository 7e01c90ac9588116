//! Canonical audit record construction and pluggable audit sinks (§4.9, §6).

#![deny(unsafe_code)]

pub mod record;
pub mod sink;

pub use record::{AuditRecord, AuditRecordBuilder, EvaluatorSignature};
pub use sink::{AuditSink, AuditSinkError, FanOutSink, FileAuditSink, NullSink, TracingAuditSink};
