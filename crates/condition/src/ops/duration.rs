//! Duration operators: elapsed time between the field timestamp and
//! `value.end`, measured in the operator's declared unit, checked against
//! any comparison thresholds carried in `value`.

use super::temporal::parse_dt;
use serde_json::Value as Json;

fn elapsed_seconds(field: &Json, value: &Json) -> Option<f64> {
    let start = field.as_str().and_then(parse_dt)?;
    let end = value.get("end")?.as_str().and_then(parse_dt)?;
    Some((end - start).num_seconds() as f64)
}

fn eval(field: &Json, value: &Json, unit_seconds: f64) -> bool {
    let Some(seconds) = elapsed_seconds(field, value) else { return false };
    super::threshold::matches_scalar_or_thresholds(seconds / unit_seconds, value)
}

pub fn duration_seconds(field: &Json, value: &Json) -> bool {
    eval(field, value, 1.0)
}

pub fn duration_minutes(field: &Json, value: &Json) -> bool {
    eval(field, value, 60.0)
}

pub fn duration_hours(field: &Json, value: &Json) -> bool {
    eval(field, value, 3_600.0)
}

pub fn duration_days(field: &Json, value: &Json) -> bool {
    eval(field, value, 86_400.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duration_hours_threshold() {
        let field = json!("2024-01-01T00:00:00Z");
        let value = json!({"end": "2024-01-01T05:00:00Z", "gte": 4.0});
        assert!(duration_hours(&field, &value));
    }

    #[test]
    fn duration_days_exact() {
        let field = json!("2024-01-01T00:00:00Z");
        let value = json!({"end": "2024-01-03T00:00:00Z", "eq": 2.0});
        assert!(duration_days(&field, &value));
    }
}
