//! Core primitives shared across the decision engine: the context/value
//! model, id generation, and RFC 8785 canonical hashing.

#![deny(unsafe_code)]

pub mod canonical;
pub mod context;
pub mod ids;

pub use canonical::{canonicalize, combine_hashes, content_hash, hex_sha256, CanonicalError};
pub use context::{Context, ContextError, Lookup};
