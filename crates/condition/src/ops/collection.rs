use serde_json::Value as Json;
use std::collections::HashSet;

fn as_set(v: &Json) -> Option<HashSet<String>> {
    Some(v.as_array()?.iter().map(|x| x.to_string()).collect())
}

pub fn contains_all(field: &Json, value: &Json) -> bool {
    let (Some(f), Some(v)) = (as_set(field), as_set(value)) else { return false };
    v.iter().all(|item| f.contains(item))
}

pub fn contains_any(field: &Json, value: &Json) -> bool {
    let (Some(f), Some(v)) = (as_set(field), as_set(value)) else { return false };
    v.iter().any(|item| f.contains(item))
}

pub fn intersects(field: &Json, value: &Json) -> bool {
    contains_any(field, value)
}

pub fn subset_of(field: &Json, value: &Json) -> bool {
    let (Some(f), Some(v)) = (as_set(field), as_set(value)) else { return false };
    f.iter().all(|item| v.contains(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn contains_all_ignores_duplicates() {
        assert!(contains_all(&json!(["a", "a", "b", "c"]), &json!(["a", "b"])));
    }

    #[test]
    fn subset_of_checks_full_containment() {
        assert!(subset_of(&json!(["a", "b"]), &json!(["a", "b", "c"])));
        assert!(!subset_of(&json!(["a", "d"]), &json!(["a", "b", "c"])));
    }
}
