//! The condition evaluator: walks a [`ConditionNode`] tree against a
//! [`Context`], producing a boolean verdict plus an explainability
//! descriptor tree (§4.2). Combinators short-circuit; leaves dispatch to the
//! operator library in [`crate::ops`].
//!
//! `fetch_from_api` is the one leaf that can grow the effective context: its
//! mapped response fields become visible to later leaves within the same
//! tree, threaded left-to-right through [`eval_children`].

use crate::descriptor::{render_value, Descriptor, EvalOutcome};
use crate::node::ConditionNode;
use crate::op::Op;
use crate::ops::external::EnrichmentClient;
use crate::ops::*;
use chrono::{DateTime, Utc};
use decision_core::{Context, Lookup};
use serde_json::Value as Json;

/// Evaluate a condition tree against a context. `now` pins the wall-clock
/// reference used by temporal-arithmetic operators so replay stays
/// deterministic when the caller supplies a fixed instant. Returns the
/// outcome plus the effective context (base context plus any enrichment
/// overlays accumulated during evaluation) for callers that need it — e.g.
/// to fold enrichment fields into the audited context hash.
pub fn evaluate(
    node: &ConditionNode,
    ctx: &Context,
    now: DateTime<Utc>,
    client: Option<&dyn EnrichmentClient>,
) -> (EvalOutcome, Context) {
    let (passed, descriptor, effective) = eval_node(node, ctx, now, client);
    (EvalOutcome { passed, descriptor }, effective)
}

fn eval_node(
    node: &ConditionNode,
    ctx: &Context,
    now: DateTime<Utc>,
    client: Option<&dyn EnrichmentClient>,
) -> (bool, Descriptor, Context) {
    match node {
        ConditionNode::All { all } => {
            let (passed, children, effective) = eval_children(all, ctx, now, client, true);
            (passed, Descriptor::combinator("all", passed, children), effective)
        }
        ConditionNode::Any { any } => {
            let (passed, children, effective) = eval_children(any, ctx, now, client, false);
            (passed, Descriptor::combinator("any", passed, children), effective)
        }
        ConditionNode::Leaf { field, op, value } => {
            let (passed, overlay) = eval_leaf(*op, field, value, ctx, now, client);
            let text = format!("{field} {op:?} {}", render_value(value));
            let effective = match overlay {
                Json::Null => ctx.clone(),
                other => ctx.with_overlay(&other),
            };
            (passed, Descriptor::leaf(text, passed), effective)
        }
    }
}

/// `stop_on` is the value that ends the short-circuit: `false` for `all`
/// (stop at the first failing child), `true` for `any` (stop at the first
/// passing child).
fn eval_children(
    children: &[ConditionNode],
    ctx: &Context,
    now: DateTime<Utc>,
    client: Option<&dyn EnrichmentClient>,
    is_all: bool,
) -> (bool, Vec<Descriptor>, Context) {
    if children.is_empty() {
        return (is_all, Vec::new(), ctx.clone());
    }
    let mut current = ctx.clone();
    let mut descriptors = Vec::with_capacity(children.len());
    let mut result = is_all;
    for child in children {
        let (passed, descriptor, next_ctx) = eval_node(child, &current, now, client);
        descriptors.push(descriptor);
        current = next_ctx;
        if is_all && !passed {
            result = false;
            break;
        }
        if !is_all && passed {
            result = true;
            break;
        }
    }
    (result, descriptors, current)
}

fn eval_leaf(
    op: Op,
    field: &str,
    value: &Json,
    ctx: &Context,
    now: DateTime<Utc>,
    client: Option<&dyn EnrichmentClient>,
) -> (bool, Json) {
    if op == Op::FetchFromApi {
        let (ok, overlay) = external::fetch_from_api(value, ctx, client);
        return (ok, overlay);
    }

    let lookup = ctx.get(field);
    if op == Op::Present {
        return (presence::present(lookup), Json::Null);
    }
    if op == Op::Absent {
        return (presence::absent(lookup), Json::Null);
    }
    let Some(f) = lookup.as_json() else { return (false, Json::Null) };

    let passed = match op {
        Op::Eq => comparison::eq(f, value),
        Op::Ne => comparison::ne(f, value),
        Op::Lt => comparison::lt(f, value),
        Op::Lte => comparison::lte(f, value),
        Op::Gt => comparison::gt(f, value),
        Op::Gte => comparison::gte(f, value),

        Op::Between => range::between(f, value),
        Op::Modulo => range::modulo(f, value),

        Op::Contains => string_ops::contains(f, value),
        Op::StartsWith => string_ops::starts_with(f, value),
        Op::EndsWith => string_ops::ends_with(f, value),
        Op::Matches => string_ops::matches(f, value),

        Op::ContainsAll => collection::contains_all(f, value),
        Op::ContainsAny => collection::contains_any(f, value),
        Op::Intersects => collection::intersects(f, value),
        Op::SubsetOf => collection::subset_of(f, value),

        Op::BeforeDate => temporal::before_date(f, value),
        Op::AfterDate => temporal::after_date(f, value),
        Op::WithinDays => temporal::within_days(f, value, now),
        Op::DayOfWeek => temporal::day_of_week(f, value),
        Op::HourOfDay => temporal::hour_of_day(f, value),
        Op::DayOfMonth => temporal::day_of_month(f, value),
        Op::Month => temporal::month(f, value),
        Op::Year => temporal::year(f, value),
        Op::WeekOfYear => temporal::week_of_year(f, value),

        Op::AddDays | Op::SubtractDays | Op::AddHours | Op::SubtractHours | Op::AddMinutes
        | Op::SubtractMinutes => temporal_arith::eval(op, f, value, now, ctx),

        Op::DurationSeconds => duration::duration_seconds(f, value),
        Op::DurationMinutes => duration::duration_minutes(f, value),
        Op::DurationHours => duration::duration_hours(f, value),
        Op::DurationDays => duration::duration_days(f, value),

        Op::WithinRadius => geospatial::within_radius(f, value),
        Op::InPolygon => geospatial::in_polygon(f, value),

        Op::Sin | Op::Cos | Op::Tan | Op::Asin | Op::Acos | Op::Atan | Op::Sinh | Op::Cosh
        | Op::Tanh | Op::Sqrt | Op::Cbrt | Op::Exp | Op::Log | Op::Log10 | Op::Log2
        | Op::Round | Op::Floor | Op::Ceil | Op::Truncate | Op::Abs | Op::Factorial => {
            math::unary(op, f, value)
        }
        Op::Atan2 => math::atan2(f, value),
        Op::Power => math::power(f, value),
        Op::Gcd => math::gcd(f, value),
        Op::Lcm => math::lcm(f, value),

        Op::Min => aggregation::min(f, value),
        Op::Max => aggregation::max(f, value),
        Op::Sum => aggregation::sum_op(f, value),
        Op::Average => aggregation::average(f, value),
        Op::Median => aggregation::median_op(f, value),
        Op::Stddev => aggregation::stddev(f, value),
        Op::Variance => aggregation::variance_op(f, value),
        Op::Percentile => aggregation::percentile_op(f, value),
        Op::Count => aggregation::count(f, value),
        Op::Length => aggregation::length(f, value),
        Op::Join => aggregation::join(f, value),

        Op::MovingAverage => moving_window::moving_average(f, value),
        Op::MovingSum => moving_window::moving_sum(f, value),
        Op::MovingMax => moving_window::moving_max(f, value),
        Op::MovingMin => moving_window::moving_min(f, value),

        Op::RatePerSecond => rate::rate_per_second(f, value),
        Op::RatePerMinute => rate::rate_per_minute(f, value),
        Op::RatePerHour => rate::rate_per_hour(f, value),

        Op::CompoundInterest => financial::compound_interest(f, value),
        Op::PresentValue => financial::present_value(f, value),
        Op::FutureValue => financial::future_value(f, value),

        Op::Present | Op::Absent | Op::FetchFromApi => unreachable!("handled above"),
    };
    (passed, Json::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ConditionNode;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn empty_all_is_vacuously_true() {
        let ctx = Context::new(json!({})).unwrap();
        let (outcome, _) = evaluate(&ConditionNode::all(vec![]), &ctx, now(), None);
        assert!(outcome.passed);
    }

    #[test]
    fn empty_any_is_vacuously_false() {
        let ctx = Context::new(json!({})).unwrap();
        let (outcome, _) = evaluate(&ConditionNode::any(vec![]), &ctx, now(), None);
        assert!(!outcome.passed);
    }

    #[test]
    fn all_short_circuits_on_first_failure() {
        let ctx = Context::new(json!({"a": 1})).unwrap();
        let tree = ConditionNode::all(vec![
            ConditionNode::leaf("a", Op::Eq, json!(2)),
            ConditionNode::leaf("missing", Op::Present, Json::Null),
        ]);
        let (outcome, _) = evaluate(&tree, &ctx, now(), None);
        assert!(!outcome.passed);
        assert_eq!(outcome.descriptor.children.len(), 1);
    }

    #[test]
    fn absent_field_fails_non_presence_operator() {
        let ctx = Context::new(json!({})).unwrap();
        let tree = ConditionNode::leaf("missing", Op::Gt, json!(1));
        let (outcome, _) = evaluate(&tree, &ctx, now(), None);
        assert!(!outcome.passed);
    }

    #[test]
    fn malformed_regex_degrades_to_false() {
        let ctx = Context::new(json!({"s": "abc"})).unwrap();
        let tree = ConditionNode::leaf("s", Op::Matches, json!("("));
        let (outcome, _) = evaluate(&tree, &ctx, now(), None);
        assert!(!outcome.passed);
    }

    #[test]
    fn enrichment_overlay_visible_to_later_sibling() {
        struct Fixed;
        impl EnrichmentClient for Fixed {
            fn fetch(&self, _e: &str, _p: &Json, _m: &Json) -> external::EnrichmentOutcome {
                external::EnrichmentOutcome { success: true, fields: json!({"score": 720}) }
            }
        }
        let ctx = Context::new(json!({})).unwrap();
        let tree = ConditionNode::all(vec![
            ConditionNode::leaf("_", Op::FetchFromApi, json!({"endpoint": "kyc"})),
            ConditionNode::leaf("score", Op::Gte, json!(700)),
        ]);
        let (outcome, _) = evaluate(&tree, &ctx, now(), Some(&Fixed));
        assert!(outcome.passed);
    }
}
