//! Aggregation operators over list-valued fields. Reordering the list must
//! not change any of these (they are pure set/multiset statistics) — the
//! exception being `join`, which is order-sensitive by its nature as a
//! string operator over a sequence.

use crate::values::as_f64_list;
use serde_json::Value as Json;

fn sum(xs: &[f64]) -> f64 {
    xs.iter().sum()
}

fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        None
    } else {
        Some(sum(xs) / xs.len() as f64)
    }
}

fn variance(xs: &[f64]) -> Option<f64> {
    let m = mean(xs)?;
    if xs.is_empty() {
        return None;
    }
    Some(xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64)
}

fn median(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = sorted.len();
    Some(if n % 2 == 1 { sorted[n / 2] } else { (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0 })
}

fn percentile(xs: &[f64], p: f64) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let rank = (p / 100.0) * (sorted.len() as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        Some(sorted[lo])
    } else {
        let frac = rank - lo as f64;
        Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
    }
}

/// Match a computed statistic against `value`: either a bare scalar
/// (equality within tolerance) or an object of comparison thresholds.
fn matches(computed: f64, value: &Json) -> bool {
    super::threshold::matches_scalar_or_thresholds(computed, value)
}

pub fn min(field: &Json, value: &Json) -> bool {
    let Some(xs) = as_f64_list(field) else { return false };
    xs.iter().cloned().fold(None, |acc: Option<f64>, x| Some(acc.map_or(x, |a| a.min(x))))
        .map(|m| matches(m, value))
        .unwrap_or(false)
}

pub fn max(field: &Json, value: &Json) -> bool {
    let Some(xs) = as_f64_list(field) else { return false };
    xs.iter().cloned().fold(None, |acc: Option<f64>, x| Some(acc.map_or(x, |a| a.max(x))))
        .map(|m| matches(m, value))
        .unwrap_or(false)
}

pub fn sum_op(field: &Json, value: &Json) -> bool {
    let Some(xs) = as_f64_list(field) else { return false };
    matches(sum(&xs), value)
}

pub fn average(field: &Json, value: &Json) -> bool {
    let Some(xs) = as_f64_list(field) else { return false };
    mean(&xs).map(|m| matches(m, value)).unwrap_or(false)
}

pub fn median_op(field: &Json, value: &Json) -> bool {
    let Some(xs) = as_f64_list(field) else { return false };
    median(&xs).map(|m| matches(m, value)).unwrap_or(false)
}

pub fn stddev(field: &Json, value: &Json) -> bool {
    let Some(xs) = as_f64_list(field) else { return false };
    variance(&xs).map(|v| matches(v.sqrt(), value)).unwrap_or(false)
}

pub fn variance_op(field: &Json, value: &Json) -> bool {
    let Some(xs) = as_f64_list(field) else { return false };
    variance(&xs).map(|v| matches(v, value)).unwrap_or(false)
}

pub fn percentile_op(field: &Json, value: &Json) -> bool {
    let Some(xs) = as_f64_list(field) else { return false };
    let Some(p) = value.get("percentile").and_then(Json::as_f64) else { return false };
    let Some(computed) = percentile(&xs, p) else { return false };
    let threshold = value.get("threshold").cloned().unwrap_or_else(|| value.clone());
    matches(computed, &threshold)
}

pub fn count(field: &Json, value: &Json) -> bool {
    let Some(items) = field.as_array() else { return false };
    matches(items.len() as f64, value)
}

pub fn length(field: &Json, value: &Json) -> bool {
    match field {
        Json::Array(items) => matches(items.len() as f64, value),
        Json::String(s) => matches(s.chars().count() as f64, value),
        _ => false,
    }
}

pub fn join(field: &Json, value: &Json) -> bool {
    let Some(items) = field.as_array() else { return false };
    let separator = value.get("separator").and_then(Json::as_str).unwrap_or(",");
    let joined = items
        .iter()
        .map(|v| match v {
            Json::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(separator);
    if let Some(expect_contains) = value.get("contains").and_then(Json::as_str) {
        return joined.contains(expect_contains);
    }
    if let Some(expected) = value.as_str() {
        return joined == expected;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reordering_does_not_change_sum_or_average() {
        let a = json!([1, 2, 3, 4]);
        let b = json!([4, 1, 3, 2]);
        assert!(sum_op(&a, &json!(10)));
        assert!(sum_op(&b, &json!(10)));
        assert!(average(&a, &json!(2.5)));
        assert!(average(&b, &json!(2.5)));
    }

    #[test]
    fn median_even_and_odd() {
        assert!(median_op(&json!([1, 2, 3]), &json!(2)));
        assert!(median_op(&json!([1, 2, 3, 4]), &json!(2.5)));
    }

    #[test]
    fn percentile_threshold_form() {
        let xs = json!([1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert!(percentile_op(&xs, &json!({"percentile": 50, "threshold": {"gte": 5}})));
    }

    #[test]
    fn join_contains() {
        assert!(join(&json!(["a", "b", "c"]), &json!({"separator": "-", "contains": "b-c"})));
    }
}
