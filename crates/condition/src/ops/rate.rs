//! Rate operators over ordered timestamp lists: events per elapsed interval
//! between the first and last timestamp. Order-sensitive by construction.

use super::temporal::parse_dt;
use serde_json::Value as Json;

fn elapsed_seconds(field: &Json) -> Option<f64> {
    let items = field.as_array()?;
    if items.len() < 2 {
        return None;
    }
    let first = items.first()?.as_str().and_then(parse_dt)?;
    let last = items.last()?.as_str().and_then(parse_dt)?;
    Some((last - first).num_seconds() as f64)
}

fn rate_per(field: &Json, value: &Json, unit_seconds: f64) -> bool {
    let Some(items) = field.as_array() else { return false };
    let Some(elapsed) = elapsed_seconds(field) else { return false };
    if elapsed <= 0.0 {
        return false;
    }
    let rate = items.len() as f64 / (elapsed / unit_seconds);
    super::threshold::matches_scalar_or_thresholds(rate, value)
}

pub fn rate_per_second(field: &Json, value: &Json) -> bool {
    rate_per(field, value, 1.0)
}

pub fn rate_per_minute(field: &Json, value: &Json) -> bool {
    rate_per(field, value, 60.0)
}

pub fn rate_per_hour(field: &Json, value: &Json) -> bool {
    rate_per(field, value, 3_600.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rate_per_minute_over_window() {
        let ts = json!([
            "2024-01-01T00:00:00Z",
            "2024-01-01T00:01:00Z",
            "2024-01-01T00:02:00Z"
        ]);
        // 3 events over 2 minutes = 1.5/min
        assert!(rate_per_minute(&ts, &json!({"gte": 1.0})));
    }

    #[test]
    fn reordering_changes_rate() {
        let forward = json!(["2024-01-01T00:00:00Z", "2024-01-01T00:10:00Z"]);
        let backward = json!(["2024-01-01T00:10:00Z", "2024-01-01T00:00:00Z"]);
        assert!(rate_per_minute(&forward, &json!({"gte": 0.0})));
        assert!(!rate_per_minute(&backward, &json!({"gte": 0.0})));
    }
}
