//! Coarse-grained per-family value-shape validation, run once at rule-load
//! time so a malformed rule document fails fast instead of silently
//! evaluating to `false` on every context.

use crate::error::ConditionError;
use crate::node::ConditionNode;
use crate::op::Op;
use serde_json::Value as Json;

pub fn validate_tree(node: &ConditionNode, path: &str) -> Result<(), ConditionError> {
    match node {
        ConditionNode::All { all } => validate_children(all, path, "all"),
        ConditionNode::Any { any } => validate_children(any, path, "any"),
        ConditionNode::Leaf { field, op, value } => {
            if field.trim().is_empty() {
                return Err(ConditionError::EmptyField { path: path.to_string() });
            }
            validate_leaf_shape(*op, value, path)
        }
    }
}

fn validate_children(children: &[ConditionNode], path: &str, key: &str) -> Result<(), ConditionError> {
    for (i, child) in children.iter().enumerate() {
        validate_tree(child, &format!("{path}.{key}[{i}]"))?;
    }
    Ok(())
}

fn mismatch(path: &str, op: Op, expected: &'static str, actual: &Json) -> ConditionError {
    ConditionError::ValueShapeMismatch {
        path: path.to_string(),
        op,
        expected,
        actual: actual.to_string(),
    }
}

fn validate_leaf_shape(op: Op, value: &Json, path: &str) -> Result<(), ConditionError> {
    use Op::*;
    match op {
        // Comparisons accept any scalar/number/string value; presence ignores value.
        Eq | Ne | Lt | Lte | Gt | Gte | Present | Absent => Ok(()),

        Between => {
            let ok = value.is_array() && value.as_array().map(|a| a.len() == 2).unwrap_or(false)
                || (value.get("min").is_some() && value.get("max").is_some());
            if ok { Ok(()) } else { Err(mismatch(path, op, "[lo, hi] or {min, max}", value)) }
        }
        Modulo => {
            let ok = value.is_array() && value.as_array().map(|a| a.len() == 2).unwrap_or(false)
                || (value.get("divisor").is_some() && value.get("remainder").is_some());
            if ok { Ok(()) } else { Err(mismatch(path, op, "[divisor, remainder] or {divisor, remainder}", value)) }
        }

        Contains | StartsWith | EndsWith | Matches => {
            if value.is_string() { Ok(()) } else { Err(mismatch(path, op, "string", value)) }
        }

        ContainsAll | ContainsAny | Intersects | SubsetOf => {
            if value.is_array() { Ok(()) } else { Err(mismatch(path, op, "array", value)) }
        }

        BeforeDate | AfterDate => {
            if value.is_string() { Ok(()) } else { Err(mismatch(path, op, "ISO-8601 string", value)) }
        }
        WithinDays | DayOfWeek | HourOfDay | DayOfMonth | Month | Year | WeekOfYear => {
            if value.is_number() || value.is_array() || value.is_object() {
                Ok(())
            } else {
                Err(mismatch(path, op, "number or {..threshold}", value))
            }
        }

        AddDays | SubtractDays | AddHours | SubtractHours | AddMinutes | SubtractMinutes => {
            if value.is_object() && value.get("compare").is_some() && value.get("target").is_some() {
                Ok(())
            } else {
                Err(mismatch(path, op, "{compare, target, ...amount}", value))
            }
        }

        DurationSeconds | DurationMinutes | DurationHours | DurationDays => {
            if value.is_object() && value.get("end").is_some() {
                Ok(())
            } else {
                Err(mismatch(path, op, "{end, ...thresholds}", value))
            }
        }

        WithinRadius => {
            if value.is_object() && value.get("center").is_some() && value.get("radius_km").is_some() {
                Ok(())
            } else {
                Err(mismatch(path, op, "{center, radius_km}", value))
            }
        }
        InPolygon => {
            if value.is_array() || (value.is_object() && value.get("polygon").is_some()) {
                Ok(())
            } else {
                Err(mismatch(path, op, "[[lat,lon], ...] or {polygon: [...]}", value))
            }
        }

        Sin | Cos | Tan | Asin | Acos | Atan | Sinh | Cosh | Tanh | Sqrt | Cbrt | Exp | Log
        | Log10 | Log2 | Round | Floor | Ceil | Truncate | Abs | Factorial => {
            if value.is_number() || (value.is_object() && value.get("result").is_some()) {
                Ok(())
            } else {
                Err(mismatch(path, op, "number or {result, tolerance?}", value))
            }
        }
        Atan2 | Power | Gcd | Lcm => {
            if value.is_object() { Ok(()) } else { Err(mismatch(path, op, "object with second operand", value)) }
        }

        Min | Max | Sum | Average | Median | Stddev | Variance | Count | Length => Ok(()),
        Percentile => {
            if value.is_object() && value.get("percentile").is_some() {
                Ok(())
            } else {
                Err(mismatch(path, op, "{percentile, ...threshold}", value))
            }
        }
        Join => {
            if value.is_object() || value.is_string() {
                Ok(())
            } else {
                Err(mismatch(path, op, "string or {separator, contains}", value))
            }
        }

        MovingAverage | MovingSum | MovingMax | MovingMin => {
            if value.is_object() && value.get("window").is_some() {
                Ok(())
            } else {
                Err(mismatch(path, op, "{window, ...threshold}", value))
            }
        }

        RatePerSecond | RatePerMinute | RatePerHour => Ok(()),

        CompoundInterest | PresentValue | FutureValue => {
            if value.is_object() && value.get("rate").is_some() && value.get("periods").is_some() {
                Ok(())
            } else {
                Err(mismatch(path, op, "{rate, periods, result, tolerance?}", value))
            }
        }

        FetchFromApi => {
            if value.is_object() && value.get("endpoint").is_some() {
                Ok(())
            } else {
                Err(mismatch(path, op, "{endpoint, params?, mapping?}", value))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn between_accepts_array_or_object() {
        assert!(validate_leaf_shape(Op::Between, &json!([0, 100]), "$").is_ok());
        assert!(validate_leaf_shape(Op::Between, &json!({"min": 0, "max": 100}), "$").is_ok());
        assert!(validate_leaf_shape(Op::Between, &json!(5), "$").is_err());
    }

    #[test]
    fn fetch_requires_endpoint() {
        assert!(validate_leaf_shape(Op::FetchFromApi, &json!({"endpoint": "kyc"}), "$").is_ok());
        assert!(validate_leaf_shape(Op::FetchFromApi, &json!({}), "$").is_err());
    }
}
