//! Financial operators: compute a standard time-value-of-money formula over
//! the field and `value.rate`/`value.periods`, compare to `value.result`
//! within tolerance.

use crate::values::{approx_eq, tolerance_of};
use serde_json::Value as Json;

fn rate_periods(value: &Json) -> Option<(f64, f64)> {
    Some((value.get("rate")?.as_f64()?, value.get("periods")?.as_f64()?))
}

fn result_of(value: &Json) -> Option<f64> {
    value.get("result").and_then(Json::as_f64)
}

/// `field * (1 + rate)^periods` (principal compounded `periods` times).
pub fn compound_interest(field: &Json, value: &Json) -> bool {
    let Some(principal) = field.as_f64() else { return false };
    let Some((rate, periods)) = rate_periods(value) else { return false };
    let Some(expected) = result_of(value) else { return false };
    let computed = principal * (1.0 + rate).powf(periods);
    approx_eq(computed, expected, tolerance_of(value))
}

/// `field / (1 + rate)^periods` — present value of a future amount.
pub fn present_value(field: &Json, value: &Json) -> bool {
    let Some(future) = field.as_f64() else { return false };
    let Some((rate, periods)) = rate_periods(value) else { return false };
    let Some(expected) = result_of(value) else { return false };
    let computed = future / (1.0 + rate).powf(periods);
    approx_eq(computed, expected, tolerance_of(value))
}

/// `field * (1 + rate)^periods` — future value of a present amount.
/// Distinct operator from `compound_interest` for explainability even
/// though the formula coincides; kept separate per the operator taxonomy.
pub fn future_value(field: &Json, value: &Json) -> bool {
    compound_interest(field, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compound_interest_matches_formula() {
        let value = json!({"rate": 0.05, "periods": 2.0, "result": 1102.5});
        assert!(compound_interest(&json!(1000.0), &value));
    }

    #[test]
    fn present_value_inverts_future_value() {
        let fv = json!({"rate": 0.1, "periods": 3.0, "result": 1331.0});
        assert!(future_value(&json!(1000.0), &fv));
        let pv = json!({"rate": 0.1, "periods": 3.0, "result": 1000.0});
        assert!(present_value(&json!(1331.0), &pv));
    }
}
