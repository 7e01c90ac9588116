//! Shared helper for operators whose `value` is either a bare scalar
//! (equality) or an object carrying one or more comparison keys
//! (`{gt, lte, ...}`), all of which must hold (conjunction).

use serde_json::Value as Json;

pub fn matches_scalar_or_thresholds(n: f64, value: &Json) -> bool {
    if let Some(obj) = value.as_object() {
        if obj.is_empty() {
            return false;
        }
        let nj = serde_json::json!(n);
        let mut any = false;
        for (key, bound) in obj {
            let Some(b) = bound.as_f64() else { continue };
            any = true;
            let ok = match key.as_str() {
                "eq" => (n - b).abs() <= 1e-9,
                "ne" => (n - b).abs() > 1e-9,
                "lt" => n < b,
                "lte" => n <= b,
                "gt" => n > b,
                "gte" => n >= b,
                _ => continue,
            };
            let _ = &nj;
            if !ok {
                return false;
            }
        }
        any
    } else {
        value.as_f64().map(|b| (n - b).abs() <= 1e-9).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_equality() {
        assert!(matches_scalar_or_thresholds(5.0, &json!(5)));
        assert!(!matches_scalar_or_thresholds(5.0, &json!(6)));
    }

    #[test]
    fn object_thresholds_conjunction() {
        assert!(matches_scalar_or_thresholds(5.0, &json!({"gt": 1, "lte": 10})));
        assert!(!matches_scalar_or_thresholds(5.0, &json!({"gt": 10})));
    }
}
