//! FEEL unary tests (§4.15): the restricted grammar used in DMN decision
//! table input entries. Each entry is one of literal equality, a
//! comparison, a range, the don't-care dash, or a comma-separated
//! disjunction of any of those — evaluated against a single input value,
//! never against a binding environment.

use crate::error::FeelError;
use crate::eval::{evaluate, Bindings};
use crate::parser::parse;
use crate::value::FeelValue;

#[derive(Debug, Clone, PartialEq)]
pub enum CompareOp {
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    Ne,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnaryTest {
    DontCare,
    Equals(FeelValue),
    Compare(CompareOp, FeelValue),
    Range { lower: FeelValue, upper: FeelValue, lower_inclusive: bool, upper_inclusive: bool },
}

/// Parse a full entry, e.g. `"<0,>100"`, `"[0..100]"`, `"-"`, into the
/// disjunction of tests it denotes.
pub fn parse_unary_tests(text: &str) -> Result<Vec<UnaryTest>, FeelError> {
    let trimmed = text.trim();
    if trimmed == "-" {
        return Ok(vec![UnaryTest::DontCare]);
    }
    split_top_level_commas(trimmed).iter().map(|entry| parse_single_test(entry.trim())).collect()
}

pub fn matches(tests: &[UnaryTest], value: &FeelValue) -> bool {
    tests.iter().any(|test| matches_one(test, value))
}

fn matches_one(test: &UnaryTest, value: &FeelValue) -> bool {
    match test {
        UnaryTest::DontCare => true,
        UnaryTest::Equals(expected) => expected == value,
        UnaryTest::Compare(op, rhs) => {
            let Some(ordering) = value.partial_compare(rhs) else { return false };
            match op {
                CompareOp::Lt => ordering == std::cmp::Ordering::Less,
                CompareOp::Lte => ordering != std::cmp::Ordering::Greater,
                CompareOp::Gt => ordering == std::cmp::Ordering::Greater,
                CompareOp::Gte => ordering != std::cmp::Ordering::Less,
                CompareOp::Eq => value == rhs,
                CompareOp::Ne => value != rhs,
            }
        }
        UnaryTest::Range { lower, upper, lower_inclusive, upper_inclusive } => {
            let above = value.partial_compare(lower).map(|o| {
                if *lower_inclusive {
                    o != std::cmp::Ordering::Less
                } else {
                    o == std::cmp::Ordering::Greater
                }
            });
            let below = value.partial_compare(upper).map(|o| {
                if *upper_inclusive {
                    o != std::cmp::Ordering::Greater
                } else {
                    o == std::cmp::Ordering::Less
                }
            });
            above.unwrap_or(false) && below.unwrap_or(false)
        }
    }
}

fn split_top_level_commas(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    for c in text.chars() {
        match c {
            '[' | '(' => {
                depth += 1;
                current.push(c);
            }
            ']' | ')' => {
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}

fn eval_literal(src: &str) -> Result<FeelValue, FeelError> {
    let expr = parse(src)?;
    evaluate(&expr, &Bindings::new())
}

fn parse_single_test(entry: &str) -> Result<UnaryTest, FeelError> {
    if entry == "-" {
        return Ok(UnaryTest::DontCare);
    }
    if let Some(rest) = entry.strip_prefix(">=") {
        return Ok(UnaryTest::Compare(CompareOp::Gte, eval_literal(rest.trim())?));
    }
    if let Some(rest) = entry.strip_prefix("<=") {
        return Ok(UnaryTest::Compare(CompareOp::Lte, eval_literal(rest.trim())?));
    }
    if let Some(rest) = entry.strip_prefix("!=") {
        return Ok(UnaryTest::Compare(CompareOp::Ne, eval_literal(rest.trim())?));
    }
    if let Some(rest) = entry.strip_prefix('>') {
        return Ok(UnaryTest::Compare(CompareOp::Gt, eval_literal(rest.trim())?));
    }
    if let Some(rest) = entry.strip_prefix('<') {
        return Ok(UnaryTest::Compare(CompareOp::Lt, eval_literal(rest.trim())?));
    }
    if let Some(rest) = entry.strip_prefix('=') {
        return Ok(UnaryTest::Compare(CompareOp::Eq, eval_literal(rest.trim())?));
    }
    if (entry.starts_with('[') || entry.starts_with(']')) && (entry.ends_with(']') || entry.ends_with('[')) {
        return parse_range(entry);
    }
    Ok(UnaryTest::Equals(eval_literal(entry)?))
}

fn parse_range(entry: &str) -> Result<UnaryTest, FeelError> {
    let lower_inclusive = entry.starts_with('[');
    let upper_inclusive = entry.ends_with(']');
    let inner = &entry[1..entry.len() - 1];
    let Some((lower_text, upper_text)) = inner.split_once("..") else {
        return Err(FeelError::Syntax(format!("malformed range {entry:?}")));
    };
    Ok(UnaryTest::Range {
        lower: eval_literal(lower_text.trim())?,
        upper: eval_literal(upper_text.trim())?,
        lower_inclusive,
        upper_inclusive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dont_care_always_matches() {
        let tests = parse_unary_tests("-").unwrap();
        assert!(matches(&tests, &FeelValue::Number(42.0)));
    }

    #[test]
    fn literal_equality() {
        let tests = parse_unary_tests("\"gold\"").unwrap();
        assert!(matches(&tests, &FeelValue::String("gold".to_string())));
        assert!(!matches(&tests, &FeelValue::String("silver".to_string())));
    }

    #[test]
    fn comparison_entry() {
        let tests = parse_unary_tests(">= 18").unwrap();
        assert!(matches(&tests, &FeelValue::Number(18.0)));
        assert!(!matches(&tests, &FeelValue::Number(17.0)));
    }

    #[test]
    fn half_open_range_is_exclusive_on_bracket_side() {
        let tests = parse_unary_tests("]0..1[").unwrap();
        assert!(!matches(&tests, &FeelValue::Number(0.0)));
        assert!(matches(&tests, &FeelValue::Number(0.5)));
        assert!(!matches(&tests, &FeelValue::Number(1.0)));
    }

    #[test]
    fn closed_range_is_inclusive() {
        let tests = parse_unary_tests("[0..100]").unwrap();
        assert!(matches(&tests, &FeelValue::Number(0.0)));
        assert!(matches(&tests, &FeelValue::Number(100.0)));
    }

    #[test]
    fn disjunction_across_commas() {
        let tests = parse_unary_tests("<0,>100").unwrap();
        assert!(matches(&tests, &FeelValue::Number(-5.0)));
        assert!(matches(&tests, &FeelValue::Number(200.0)));
        assert!(!matches(&tests, &FeelValue::Number(50.0)));
    }
}
