use super::temporal::parse_dt;
use crate::op::Op;
use chrono::{DateTime, Duration, Utc};
use decision_core::{Context, Lookup};
use serde_json::Value as Json;

fn resolve_target(value: &Json, now: DateTime<Utc>, ctx: &Context) -> Option<DateTime<Utc>> {
    match value.get("target")? {
        Json::String(s) if s == "now" => Some(now),
        Json::String(s) => parse_dt(s).or_else(|| match ctx.get(s) {
            Lookup::Found(v) => v.as_str().and_then(parse_dt),
            Lookup::Absent => None,
        }),
        _ => None,
    }
}

/// Shared evaluator for `add_days`/`subtract_days`/`add_hours`/`subtract_hours`/
/// `add_minutes`/`subtract_minutes`: shift the field's timestamp by the
/// declared amount, then compare against `target` using `compare`.
pub fn eval(op: Op, field: &Json, value: &Json, now: DateTime<Utc>, ctx: &Context) -> bool {
    let Some(base) = field.as_str().and_then(parse_dt) else { return false };
    let amount = value
        .get("days")
        .or_else(|| value.get("hours"))
        .or_else(|| value.get("minutes"))
        .and_then(Json::as_f64);
    let Some(amount) = amount else { return false };
    let seconds = match op {
        Op::AddDays | Op::SubtractDays => amount * 86_400.0,
        Op::AddHours | Op::SubtractHours => amount * 3_600.0,
        Op::AddMinutes | Op::SubtractMinutes => amount * 60.0,
        _ => return false,
    };
    let delta = Duration::seconds(seconds as i64);
    let computed = match op {
        Op::AddDays | Op::AddHours | Op::AddMinutes => base + delta,
        Op::SubtractDays | Op::SubtractHours | Op::SubtractMinutes => base - delta,
        _ => return false,
    };
    let Some(target) = resolve_target(value, now, ctx) else { return false };
    let Some(compare) = value.get("compare").and_then(Json::as_str) else { return false };
    match compare {
        "eq" => computed == target,
        "ne" => computed != target,
        "lt" => computed < target,
        "lte" => computed <= target,
        "gt" => computed > target,
        "gte" => computed >= target,
        _ => false,
    }
}
