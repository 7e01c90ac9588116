//! Immutable context: the attribute map a decision is evaluated against.

use serde_json::Value as Json;
use std::fmt;
use thiserror::Error;

/// Errors raised constructing a [`Context`].
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("context root must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("unsupported value kind at {path}: {kind}")]
    UnsupportedKind { path: String, kind: &'static str },
}

/// The result of resolving a dotted path against a [`Context`].
///
/// `Absent` is distinct from `Found(Json::Null)`: a path that does not exist
/// in the document is not the same as a path whose value is JSON `null`.
/// Operators that are not specifically absence-checking must treat `Absent`
/// as a failed condition rather than attempting to coerce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Found(&'a Json),
    Absent,
}

impl<'a> Lookup<'a> {
    pub fn as_json(&self) -> Option<&'a Json> {
        match self {
            Lookup::Found(v) => Some(v),
            Lookup::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }
}

/// An immutable, deep-read-only attribute map supplied to a decision.
///
/// Construction validates that every value is one of the supported kinds
/// (null, bool, number, string, array, object); functions, byte blobs, or
/// other opaque handles are rejected at construction, not lazily during
/// evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    root: Json,
}

impl Context {
    /// Build a context from a JSON object. Fails if the root is not an
    /// object or contains an unsupported value kind.
    pub fn new(root: Json) -> Result<Self, ContextError> {
        if !root.is_object() {
            return Err(ContextError::NotAnObject(json_kind(&root)));
        }
        validate_kinds(&root, "$")?;
        Ok(Self { root })
    }

    /// Build a context from an already-validated JSON object without
    /// re-walking it. Callers must guarantee the invariant held by [`new`].
    pub fn from_validated(root: Json) -> Self {
        debug_assert!(root.is_object());
        Self { root }
    }

    /// Raw JSON view of the context root, for canonicalization and hashing.
    pub fn as_json(&self) -> &Json {
        &self.root
    }

    /// Resolve a dotted path (`customer.address.country`). Numeric segments
    /// index arrays (zero-based); non-numeric segments key into objects.
    /// Any unresolvable segment yields [`Lookup::Absent`].
    pub fn get(&self, path: &str) -> Lookup<'_> {
        let mut cur = &self.root;
        for segment in path.split('.') {
            if segment.is_empty() {
                return Lookup::Absent;
            }
            cur = match cur {
                Json::Object(map) => match map.get(segment) {
                    Some(v) => v,
                    None => return Lookup::Absent,
                },
                Json::Array(items) => match segment.parse::<usize>().ok().and_then(|i| items.get(i)) {
                    Some(v) => v,
                    None => return Lookup::Absent,
                },
                _ => return Lookup::Absent,
            };
        }
        Lookup::Found(cur)
    }

    /// Merge enrichment-derived fields into a side context without mutating
    /// `self`. Used by the `fetch_from_api` operator to make response fields
    /// visible to subsequent conditions in the same rule.
    pub fn with_overlay(&self, overlay: &Json) -> Context {
        let mut merged = self.root.clone();
        if let (Json::Object(base), Json::Object(add)) = (&mut merged, overlay) {
            for (k, v) in add {
                base.insert(k.clone(), v.clone());
            }
        }
        Context { root: merged }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

fn json_kind(v: &Json) -> &'static str {
    match v {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn validate_kinds(v: &Json, path: &str) -> Result<(), ContextError> {
    match v {
        Json::Null | Json::Bool(_) | Json::Number(_) | Json::String(_) => Ok(()),
        Json::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                validate_kinds(item, &format!("{path}[{i}]"))?;
            }
            Ok(())
        }
        Json::Object(map) => {
            for (k, val) in map {
                validate_kinds(val, &format!("{path}.{k}"))?;
            }
            Ok(())
        }
    }
}
