//! Rule document types, schema validation, and canonicalization (§3, §4.3).

#![deny(unsafe_code)]

pub mod canonical;
pub mod document;
pub mod error;
pub mod validate;

pub use canonical::{canonical_bytes, content_hash, round_trip};
pub use document::{Rule, Ruleset, Then};
pub use error::RuleDocumentError;
pub use validate::{validate_document, validate_ruleset};
