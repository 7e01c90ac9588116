//! Strict, non-coercing helpers for pulling typed data out of context JSON.
//!
//! Every operator in this crate is contractually non-fatal: a type mismatch
//! must make the operator return `false`, never raise. These helpers return
//! `Option`/`None` on mismatch so call sites can `?`-short-circuit straight
//! to "condition failed" with `ok_or(false)`-style folding.

use serde_json::Value as Json;
use std::cmp::Ordering;

pub const DEFAULT_TOLERANCE: f64 = 1e-9;

pub fn as_f64(v: &Json) -> Option<f64> {
    v.as_f64()
}

pub fn as_str(v: &Json) -> Option<&str> {
    v.as_str()
}

pub fn as_list(v: &Json) -> Option<&Vec<Json>> {
    v.as_array()
}

pub fn as_f64_list(v: &Json) -> Option<Vec<f64>> {
    v.as_array()?.iter().map(|x| x.as_f64()).collect()
}

/// Strict typed comparison: numbers compare numerically, strings
/// lexicographically, bools by `false < true`. Any other pairing (including
/// mixed types where neither side is numeric) is declared incomparable.
pub fn typed_cmp(a: &Json, b: &Json) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x.partial_cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_str(), b.as_str()) {
        return Some(x.cmp(y));
    }
    if let (Some(x), Some(y)) = (a.as_bool(), b.as_bool()) {
        return Some(x.cmp(&y));
    }
    None
}

/// Structural equality used by `eq`/`ne`: numeric-aware but otherwise exact.
pub fn typed_eq(a: &Json, b: &Json) -> bool {
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return (x - y).abs() <= f64::EPSILON.max((x.abs().max(y.abs())) * f64::EPSILON);
    }
    a == b
}

/// Read an optional `tolerance` override from an operator value shaped as
/// `{..., "tolerance": <number>}`; falls back to [`DEFAULT_TOLERANCE`].
pub fn tolerance_of(value: &Json) -> f64 {
    value.get("tolerance").and_then(Json::as_f64).unwrap_or(DEFAULT_TOLERANCE)
}

pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_cmp_rejects_mixed_non_numeric() {
        assert_eq!(typed_cmp(&json!("a"), &json!(1)), None);
    }

    #[test]
    fn typed_cmp_numeric_cross_repr() {
        assert_eq!(typed_cmp(&json!(1), &json!(1.0)), Some(Ordering::Equal));
    }
}
