use crate::values::typed_cmp;
use serde_json::Value as Json;
use std::cmp::Ordering;

pub fn eq(field: &Json, value: &Json) -> bool {
    crate::values::typed_eq(field, value)
}

pub fn ne(field: &Json, value: &Json) -> bool {
    !eq(field, value)
}

pub fn lt(field: &Json, value: &Json) -> bool {
    typed_cmp(field, value) == Some(Ordering::Less)
}

pub fn lte(field: &Json, value: &Json) -> bool {
    matches!(typed_cmp(field, value), Some(Ordering::Less) | Some(Ordering::Equal))
}

pub fn gt(field: &Json, value: &Json) -> bool {
    typed_cmp(field, value) == Some(Ordering::Greater)
}

pub fn gte(field: &Json, value: &Json) -> bool {
    matches!(typed_cmp(field, value), Some(Ordering::Greater) | Some(Ordering::Equal))
}
