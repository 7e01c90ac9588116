//! Moving-window operators over ordered numeric lists. Unlike the plain
//! aggregations, these are order-sensitive by construction: the window
//! slides across the list in its given order.

use crate::values::as_f64_list;
use serde_json::Value as Json;

fn eval(field: &Json, value: &Json, reduce: impl Fn(&[f64]) -> f64) -> bool {
    let Some(xs) = as_f64_list(field) else { return false };
    let Some(window) = value.get("window").and_then(Json::as_u64) else { return false };
    let window = window as usize;
    if window == 0 || window > xs.len() {
        return false;
    }
    let series: Vec<f64> = xs.windows(window).map(|w| reduce(w)).collect();
    let Some(last) = series.last().copied() else { return false };
    super::threshold::matches_scalar_or_thresholds(last, value)
}

pub fn moving_average(field: &Json, value: &Json) -> bool {
    eval(field, value, |w| w.iter().sum::<f64>() / w.len() as f64)
}

pub fn moving_sum(field: &Json, value: &Json) -> bool {
    eval(field, value, |w| w.iter().sum::<f64>())
}

pub fn moving_max(field: &Json, value: &Json) -> bool {
    eval(field, value, |w| w.iter().cloned().fold(f64::NEG_INFINITY, f64::max))
}

pub fn moving_min(field: &Json, value: &Json) -> bool {
    eval(field, value, |w| w.iter().cloned().fold(f64::INFINITY, f64::min))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn moving_average_uses_last_window() {
        // last window of size 3 over [1,2,3,4,5] is [3,4,5] -> avg 4
        assert!(moving_average(&json!([1, 2, 3, 4, 5]), &json!({"window": 3, "eq": 4})));
    }

    #[test]
    fn window_larger_than_series_fails() {
        assert!(!moving_sum(&json!([1, 2]), &json!({"window": 5, "eq": 3})));
    }
}
