//! Pure evaluation of a parsed FEEL [`Expr`] tree against a binding
//! environment. No I/O, no wall-clock reads — reproducible by
//! construction, the way replay requires of everything in this engine.

use crate::ast::{BinaryOp, Expr};
use crate::error::FeelError;
use crate::value::FeelValue;
use std::collections::HashMap;

pub type Bindings = HashMap<String, FeelValue>;

pub fn evaluate(expr: &Expr, bindings: &Bindings) -> Result<FeelValue, FeelError> {
    match expr {
        Expr::Null => Ok(FeelValue::Null),
        Expr::Bool(b) => Ok(FeelValue::Bool(*b)),
        Expr::Number(n) => Ok(FeelValue::Number(*n)),
        Expr::String(s) => Ok(FeelValue::String(s.clone())),
        Expr::Var(name) => Ok(bindings.get(name).cloned().unwrap_or(FeelValue::Null)),
        Expr::Path(base, field) => {
            let base = evaluate(base, bindings)?;
            match base {
                FeelValue::Context(map) => Ok(map.get(field).cloned().unwrap_or(FeelValue::Null)),
                _ => Ok(FeelValue::Null),
            }
        }
        Expr::List(items) => {
            let values = items.iter().map(|e| evaluate(e, bindings)).collect::<Result<Vec<_>, _>>()?;
            Ok(FeelValue::List(values))
        }
        Expr::Context(entries) => {
            let mut map = std::collections::BTreeMap::new();
            for (key, value_expr) in entries {
                map.insert(key.clone(), evaluate(value_expr, bindings)?);
            }
            Ok(FeelValue::Context(map))
        }
        Expr::Neg(inner) => {
            let value = evaluate(inner, bindings)?;
            match value {
                FeelValue::Number(n) => Ok(FeelValue::Number(-n)),
                other => Err(FeelError::Type(format!("cannot negate {}", other.type_name()))),
            }
        }
        Expr::Not(inner) => {
            let value = evaluate(inner, bindings)?;
            match value.as_bool() {
                Some(b) => Ok(FeelValue::Bool(!b)),
                None => Ok(FeelValue::Null),
            }
        }
        Expr::Binary(op, lhs, rhs) => eval_binary(op, lhs, rhs, bindings),
        Expr::Call(name, args) => eval_call(name, args, bindings),
        Expr::If { cond, then_branch, else_branch } => {
            let cond = evaluate(cond, bindings)?;
            if cond.as_bool().unwrap_or(false) {
                evaluate(then_branch, bindings)
            } else {
                evaluate(else_branch, bindings)
            }
        }
        Expr::For { var, iterable, body } => {
            let FeelValue::List(items) = evaluate(iterable, bindings)? else {
                return Err(FeelError::Type("for...return requires a list".to_string()));
            };
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                let mut scoped = bindings.clone();
                scoped.insert(var.clone(), item);
                out.push(evaluate(body, &scoped)?);
            }
            Ok(FeelValue::List(out))
        }
        Expr::Quantified { every, var, iterable, predicate } => {
            let FeelValue::List(items) = evaluate(iterable, bindings)? else {
                return Err(FeelError::Type("quantified expression requires a list".to_string()));
            };
            let mut results = Vec::with_capacity(items.len());
            for item in items {
                let mut scoped = bindings.clone();
                scoped.insert(var.clone(), item);
                results.push(evaluate(predicate, &scoped)?.as_bool().unwrap_or(false));
            }
            let outcome = if *every { results.iter().all(|b| *b) } else { results.iter().any(|b| *b) };
            Ok(FeelValue::Bool(outcome))
        }
        Expr::Between { value, lower, upper } => {
            let value = evaluate(value, bindings)?;
            let lower = evaluate(lower, bindings)?;
            let upper = evaluate(upper, bindings)?;
            let above_lower = value.partial_compare(&lower).map(|o| o != std::cmp::Ordering::Less);
            let below_upper = value.partial_compare(&upper).map(|o| o != std::cmp::Ordering::Greater);
            Ok(FeelValue::Bool(above_lower.unwrap_or(false) && below_upper.unwrap_or(false)))
        }
        Expr::In { value, list } => {
            let value = evaluate(value, bindings)?;
            match evaluate(list, bindings)? {
                FeelValue::List(items) => Ok(FeelValue::Bool(items.contains(&value))),
                other => Ok(FeelValue::Bool(other == value)),
            }
        }
        Expr::InstanceOf { value, type_name } => {
            let value = evaluate(value, bindings)?;
            Ok(FeelValue::Bool(value.type_name() == type_name))
        }
    }
}

fn eval_binary(op: &BinaryOp, lhs: &Expr, rhs: &Expr, bindings: &Bindings) -> Result<FeelValue, FeelError> {
    if matches!(op, BinaryOp::And | BinaryOp::Or) {
        let left = evaluate(lhs, bindings)?.as_bool().unwrap_or(false);
        return match op {
            BinaryOp::And => {
                if !left {
                    Ok(FeelValue::Bool(false))
                } else {
                    Ok(FeelValue::Bool(evaluate(rhs, bindings)?.as_bool().unwrap_or(false)))
                }
            }
            BinaryOp::Or => {
                if left {
                    Ok(FeelValue::Bool(true))
                } else {
                    Ok(FeelValue::Bool(evaluate(rhs, bindings)?.as_bool().unwrap_or(false)))
                }
            }
            _ => unreachable!(),
        };
    }

    let left = evaluate(lhs, bindings)?;
    let right = evaluate(rhs, bindings)?;

    match op {
        BinaryOp::Eq => return Ok(FeelValue::Bool(left == right)),
        BinaryOp::Ne => return Ok(FeelValue::Bool(left != right)),
        _ => {}
    }

    match op {
        BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Gt | BinaryOp::Gte => {
            let Some(ordering) = left.partial_compare(&right) else {
                return Ok(FeelValue::Bool(false));
            };
            let result = match op {
                BinaryOp::Lt => ordering == std::cmp::Ordering::Less,
                BinaryOp::Lte => ordering != std::cmp::Ordering::Greater,
                BinaryOp::Gt => ordering == std::cmp::Ordering::Greater,
                BinaryOp::Gte => ordering != std::cmp::Ordering::Less,
                _ => unreachable!(),
            };
            return Ok(FeelValue::Bool(result));
        }
        _ => {}
    }

    let (FeelValue::Number(a), FeelValue::Number(b)) = (&left, &right) else {
        return Err(FeelError::Type(format!(
            "arithmetic on non-numbers: {} and {}",
            left.type_name(),
            right.type_name()
        )));
    };
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Mod => a.rem_euclid(*b),
        BinaryOp::Pow => a.powf(*b),
        _ => unreachable!(),
    };
    Ok(FeelValue::Number(result))
}

fn eval_call(name: &str, args: &[Expr], bindings: &Bindings) -> Result<FeelValue, FeelError> {
    let values = args.iter().map(|a| evaluate(a, bindings)).collect::<Result<Vec<_>, _>>()?;
    match name {
        "not" => match values.first() {
            Some(v) => Ok(FeelValue::Bool(!v.as_bool().unwrap_or(false))),
            None => Err(FeelError::Type("not() requires one argument".to_string())),
        },
        "abs" => match values.first().and_then(FeelValue::as_f64) {
            Some(n) => Ok(FeelValue::Number(n.abs())),
            None => Err(FeelError::Type("abs() requires a number".to_string())),
        },
        "sum" => numeric_list(&values).map(|ns| FeelValue::Number(ns.iter().sum())),
        "count" => match values.first() {
            Some(FeelValue::List(items)) => Ok(FeelValue::Number(items.len() as f64)),
            _ => Err(FeelError::Type("count() requires a list".to_string())),
        },
        "min" => numeric_list(&values)
            .map(|ns| FeelValue::Number(ns.into_iter().fold(f64::INFINITY, f64::min))),
        "max" => numeric_list(&values)
            .map(|ns| FeelValue::Number(ns.into_iter().fold(f64::NEG_INFINITY, f64::max))),
        other => Err(FeelError::UnknownFunction(other.to_string())),
    }
}

fn numeric_list(values: &[FeelValue]) -> Result<Vec<f64>, FeelError> {
    match values.first() {
        Some(FeelValue::List(items)) => {
            items.iter().map(|v| v.as_f64().ok_or_else(|| FeelError::Type("expected a number".to_string()))).collect()
        }
        _ => Err(FeelError::Type("expected a list argument".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn eval_str(src: &str, bindings: &Bindings) -> FeelValue {
        evaluate(&parse(src).unwrap(), bindings).unwrap()
    }

    #[test]
    fn evaluates_arithmetic() {
        let bindings = Bindings::new();
        assert_eq!(eval_str("1 + 2 * 3", &bindings), FeelValue::Number(7.0));
        assert_eq!(eval_str("2 ** 10", &bindings), FeelValue::Number(1024.0));
    }

    #[test]
    fn evaluates_if_then_else_with_variable() {
        let mut bindings = Bindings::new();
        bindings.insert("age".to_string(), FeelValue::Number(20.0));
        assert_eq!(eval_str("if age >= 18 then \"adult\" else \"minor\"", &bindings), FeelValue::String("adult".to_string()));
    }

    #[test]
    fn evaluates_dotted_path_through_context() {
        let mut customer = std::collections::BTreeMap::new();
        customer.insert("age".to_string(), FeelValue::Number(42.0));
        let mut bindings = Bindings::new();
        bindings.insert("customer".to_string(), FeelValue::Context(customer));
        assert_eq!(eval_str("customer.age", &bindings), FeelValue::Number(42.0));
    }

    #[test]
    fn evaluates_for_return_and_quantified() {
        let bindings = Bindings::new();
        assert_eq!(
            eval_str("for x in [1,2,3] return x * 2", &bindings),
            FeelValue::List(vec![FeelValue::Number(2.0), FeelValue::Number(4.0), FeelValue::Number(6.0)])
        );
        assert_eq!(eval_str("every x in [1,2,3] satisfies x > 0", &bindings), FeelValue::Bool(true));
        assert_eq!(eval_str("some x in [1,2,3] satisfies x > 2", &bindings), FeelValue::Bool(true));
    }

    #[test]
    fn evaluates_between_and_in() {
        let bindings = Bindings::new();
        assert_eq!(eval_str("5 between 1 and 10", &bindings), FeelValue::Bool(true));
        assert_eq!(eval_str("5 in [1,2,3]", &bindings), FeelValue::Bool(false));
    }
}
