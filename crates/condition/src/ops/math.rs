//! Math operators: apply a unary (or paired) function to the field value,
//! then compare the result to `value` within a small-epsilon tolerance.
//! These are operators, not pure functions — the comparison is the verdict.

use crate::op::Op;
use crate::values::{approx_eq, tolerance_of};
use serde_json::Value as Json;

fn result_of(value: &Json) -> Option<f64> {
    if let Some(n) = value.as_f64() {
        return Some(n);
    }
    value.get("result").and_then(Json::as_f64)
}

fn factorial(n: f64) -> Option<f64> {
    if n < 0.0 || n.fract() != 0.0 || n > 170.0 {
        return None;
    }
    let mut acc = 1.0f64;
    let mut i = 2.0f64;
    while i <= n {
        acc *= i;
        i += 1.0;
    }
    Some(acc)
}

/// Evaluate any single-operand math operator (`sin` through `factorial`).
pub fn unary(op: Op, field: &Json, value: &Json) -> bool {
    let Some(x) = field.as_f64() else { return false };
    let Some(expected) = result_of(value) else { return false };
    let tol = tolerance_of(value);
    let computed = match op {
        Op::Sin => Some(x.sin()),
        Op::Cos => Some(x.cos()),
        Op::Tan => Some(x.tan()),
        Op::Asin => Some(x.asin()),
        Op::Acos => Some(x.acos()),
        Op::Atan => Some(x.atan()),
        Op::Sinh => Some(x.sinh()),
        Op::Cosh => Some(x.cosh()),
        Op::Tanh => Some(x.tanh()),
        Op::Sqrt => (x >= 0.0).then(|| x.sqrt()),
        Op::Cbrt => Some(x.cbrt()),
        Op::Exp => Some(x.exp()),
        Op::Log => (x > 0.0).then(|| x.ln()),
        Op::Log10 => (x > 0.0).then(|| x.log10()),
        Op::Log2 => (x > 0.0).then(|| x.log2()),
        Op::Round => Some(x.round()),
        Op::Floor => Some(x.floor()),
        Op::Ceil => Some(x.ceil()),
        Op::Truncate => Some(x.trunc()),
        Op::Abs => Some(x.abs()),
        Op::Factorial => factorial(x),
        _ => None,
    };
    match computed {
        Some(c) => approx_eq(c, expected, tol),
        None => false,
    }
}

/// `atan2(field, value.x)` compared against `value.result`.
pub fn atan2(field: &Json, value: &Json) -> bool {
    let (Some(y), Some(x)) = (field.as_f64(), value.get("x").and_then(Json::as_f64)) else {
        return false;
    };
    let Some(expected) = result_of(value) else { return false };
    approx_eq(y.atan2(x), expected, tolerance_of(value))
}

fn exponent_of(value: &Json) -> Option<f64> {
    value.get("exponent").and_then(Json::as_f64)
}

/// `field ^ value.exponent` compared against `value.result`.
pub fn power(field: &Json, value: &Json) -> bool {
    let (Some(base), Some(exp)) = (field.as_f64(), exponent_of(value)) else { return false };
    let Some(expected) = result_of(value) else { return false };
    approx_eq(base.powf(exp), expected, tolerance_of(value))
}

fn second_operand(field: &Json, value: &Json) -> Option<(f64, f64)> {
    let a = field.as_f64()?;
    if let Some(b) = value.get("other").and_then(Json::as_f64) {
        return Some((a, b));
    }
    if let Some(arr) = value.as_array() {
        if arr.len() == 2 {
            return Some((arr[0].as_f64()?, arr[1].as_f64()?));
        }
    }
    None
}

fn gcd_u64(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// `gcd(field, value.other)` compared against `value.result`.
pub fn gcd(field: &Json, value: &Json) -> bool {
    let Some((a, b)) = second_operand(field, value) else { return false };
    if a < 0.0 || b < 0.0 || a.fract() != 0.0 || b.fract() != 0.0 {
        return false;
    }
    let Some(expected) = result_of(value) else { return false };
    approx_eq(gcd_u64(a as u64, b as u64) as f64, expected, tolerance_of(value))
}

/// `lcm(field, value.other)` compared against `value.result`.
pub fn lcm(field: &Json, value: &Json) -> bool {
    let Some((a, b)) = second_operand(field, value) else { return false };
    if a < 0.0 || b < 0.0 || a.fract() != 0.0 || b.fract() != 0.0 {
        return false;
    }
    let (a, b) = (a as u64, b as u64);
    if a == 0 || b == 0 {
        return false;
    }
    let Some(expected) = result_of(value) else { return false };
    let computed = a / gcd_u64(a, b) * b;
    approx_eq(computed as f64, expected, tolerance_of(value))
}
