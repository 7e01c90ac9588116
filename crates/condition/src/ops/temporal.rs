use super::threshold::matches_scalar_or_thresholds;
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde_json::Value as Json;

pub fn parse_dt(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)).ok()
}

pub fn before_date(field: &Json, value: &Json) -> bool {
    let (Some(f), Some(v)) = (field.as_str().and_then(parse_dt), value.as_str().and_then(parse_dt))
    else {
        return false;
    };
    f < v
}

pub fn after_date(field: &Json, value: &Json) -> bool {
    let (Some(f), Some(v)) = (field.as_str().and_then(parse_dt), value.as_str().and_then(parse_dt))
    else {
        return false;
    };
    f > v
}

/// `value` is the number of days (or `{days, ...}`) separating `field` from now.
pub fn within_days(field: &Json, value: &Json, now: DateTime<Utc>) -> bool {
    let Some(f) = field.as_str().and_then(parse_dt) else { return false };
    let days = (now - f).num_seconds() as f64 / 86_400.0;
    matches_scalar_or_thresholds(days.abs(), value)
}

pub fn day_of_week(field: &Json, value: &Json) -> bool {
    let Some(f) = field.as_str().and_then(parse_dt) else { return false };
    matches_scalar_or_thresholds(f.weekday().num_days_from_sunday() as f64, value)
}

pub fn hour_of_day(field: &Json, value: &Json) -> bool {
    let Some(f) = field.as_str().and_then(parse_dt) else { return false };
    matches_scalar_or_thresholds(f.hour() as f64, value)
}

pub fn day_of_month(field: &Json, value: &Json) -> bool {
    let Some(f) = field.as_str().and_then(parse_dt) else { return false };
    matches_scalar_or_thresholds(f.day() as f64, value)
}

pub fn month(field: &Json, value: &Json) -> bool {
    let Some(f) = field.as_str().and_then(parse_dt) else { return false };
    matches_scalar_or_thresholds(f.month() as f64, value)
}

pub fn year(field: &Json, value: &Json) -> bool {
    let Some(f) = field.as_str().and_then(parse_dt) else { return false };
    matches_scalar_or_thresholds(f.year() as f64, value)
}

pub fn week_of_year(field: &Json, value: &Json) -> bool {
    let Some(f) = field.as_str().and_then(parse_dt) else { return false };
    matches_scalar_or_thresholds(f.iso_week().week() as f64, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn before_after_date() {
        assert!(before_date(&json!("2024-01-01T00:00:00Z"), &json!("2024-06-01T00:00:00Z")));
        assert!(after_date(&json!("2024-06-01T00:00:00Z"), &json!("2024-01-01T00:00:00Z")));
    }

    #[test]
    fn day_of_week_is_numeric() {
        // 2024-01-01 is a Monday -> num_days_from_sunday = 1
        assert!(day_of_week(&json!("2024-01-01T00:00:00Z"), &json!(1)));
    }
}
