use regex::Regex;
use serde_json::Value as Json;

pub fn contains(field: &Json, value: &Json) -> bool {
    match (field.as_str(), value.as_str()) {
        (Some(f), Some(v)) => f.contains(v),
        _ => false,
    }
}

pub fn starts_with(field: &Json, value: &Json) -> bool {
    match (field.as_str(), value.as_str()) {
        (Some(f), Some(v)) => f.starts_with(v),
        _ => false,
    }
}

pub fn ends_with(field: &Json, value: &Json) -> bool {
    match (field.as_str(), value.as_str()) {
        (Some(f), Some(v)) => f.ends_with(v),
        _ => false,
    }
}

/// Invalid regex is a data error, not a crash: it degrades to `false`.
pub fn matches(field: &Json, value: &Json) -> bool {
    let (Some(f), Some(pattern)) = (field.as_str(), value.as_str()) else { return false };
    match Regex::new(pattern) {
        Ok(re) => re.is_match(f),
        Err(_) => false,
    }
}
