use serde_json::Value as Json;

fn bounds(value: &Json) -> Option<(f64, f64)> {
    if let Some(arr) = value.as_array() {
        if arr.len() == 2 {
            return Some((arr[0].as_f64()?, arr[1].as_f64()?));
        }
        return None;
    }
    Some((value.get("min")?.as_f64()?, value.get("max")?.as_f64()?))
}

/// Inclusive on both ends (see DESIGN.md Open Questions).
pub fn between(field: &Json, value: &Json) -> bool {
    let Some(x) = field.as_f64() else { return false };
    let Some((lo, hi)) = bounds(value) else { return false };
    x >= lo && x <= hi
}

fn divisor_remainder(value: &Json) -> Option<(f64, f64)> {
    if let Some(arr) = value.as_array() {
        if arr.len() == 2 {
            return Some((arr[0].as_f64()?, arr[1].as_f64()?));
        }
        return None;
    }
    Some((value.get("divisor")?.as_f64()?, value.get("remainder")?.as_f64()?))
}

pub fn modulo(field: &Json, value: &Json) -> bool {
    let Some(x) = field.as_f64() else { return false };
    let Some((d, r)) = divisor_remainder(value) else { return false };
    if d == 0.0 {
        return false;
    }
    (x.rem_euclid(d) - r).abs() <= 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn between_is_inclusive_both_ends() {
        assert!(between(&json!(0), &json!([0, 100])));
        assert!(between(&json!(100), &json!([0, 100])));
        assert!(!between(&json!(101), &json!([0, 100])));
    }

    #[test]
    fn modulo_checks_remainder() {
        assert!(modulo(&json!(10), &json!([3, 1])));
        assert!(!modulo(&json!(10), &json!([3, 0])));
    }
}
