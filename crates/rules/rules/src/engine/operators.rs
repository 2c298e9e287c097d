use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::{Number, Value};

use crate::ir::condition::Operator;

/// Apply `op` to a resolved value and the leaf's expected value.
///
/// Total: type mismatches, unparseable timestamps, invalid patterns and
/// unknown operators all yield `false`. `None` stands for an absent value.
pub fn apply(op: Operator, actual: Option<&Value>, expected: Option<&Value>) -> bool {
    match op {
        Operator::Exists => actual.is_some_and(|v| !v.is_null()),
        Operator::Equals => equals(actual, expected),
        Operator::NotEquals => !equals(actual, expected),
        Operator::Contains => contains(actual, expected),
        Operator::In => match (actual, expected) {
            (Some(needle), Some(Value::Array(items))) => items.iter().any(|v| strict_eq(v, needle)),
            _ => false,
        },
        Operator::Gt => compare(actual, expected).is_some_and(Ordering::is_gt),
        Operator::Gte => compare(actual, expected).is_some_and(Ordering::is_ge),
        Operator::Lt => compare(actual, expected).is_some_and(Ordering::is_lt),
        Operator::Lte => compare(actual, expected).is_some_and(Ordering::is_le),
        Operator::MatchesRegex => matches_regex(actual, expected),
        Operator::Unknown => false,
    }
}

/// Identity-style equality: primitives compare by value, arrays and
/// objects never compare equal.
fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        _ => false,
    }
}

#[allow(clippy::float_cmp)]
fn numbers_equal(x: &Number, y: &Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn equals(actual: Option<&Value>, expected: Option<&Value>) -> bool {
    match (actual, expected) {
        (Some(Value::Array(a)), Some(Value::Array(e))) => {
            a.len() == e.len() && a.iter().zip(e).all(|(x, y)| strict_eq(x, y))
        }
        (Some(a), Some(e)) => strict_eq(a, e),
        (None, None) => true,
        _ => false,
    }
}

fn contains(actual: Option<&Value>, expected: Option<&Value>) -> bool {
    match actual {
        Some(Value::String(haystack)) => {
            primitive_string(expected).is_some_and(|needle| haystack.contains(needle.as_str()))
        }
        Some(Value::Array(items)) => match expected {
            Some(Value::Array(wanted)) => wanted
                .iter()
                .all(|w| items.iter().any(|item| strict_eq(item, w))),
            Some(needle) => items.iter().any(|item| strict_eq(item, needle)),
            None => false,
        },
        _ => false,
    }
}

/// String form of a non-null primitive, rendered the way a JavaScript
/// `String()` conversion would (`1.0` becomes `"1"`).
fn primitive_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(number_string(n)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn number_string(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn compare(actual: Option<&Value>, expected: Option<&Value>) -> Option<Ordering> {
    match (actual?, expected?) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
                return Some(x.cmp(&y));
            }
            a.as_f64()?.partial_cmp(&b.as_f64()?)
        }
        (Value::String(a), Value::String(b)) => Some(parse_timestamp(a)?.cmp(&parse_timestamp(b)?)),
        _ => None,
    }
}

/// Accepts RFC 3339, a bare `YYYY-MM-DDTHH:MM:SS[.fff]` (taken as UTC), or
/// a bare `YYYY-MM-DD` (midnight UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn matches_regex(actual: Option<&Value>, expected: Option<&Value>) -> bool {
    let (Some(Value::String(text)), Some(Value::String(pattern))) = (actual, expected) else {
        return false;
    };
    Regex::new(pattern).is_ok_and(|re| re.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(op: Operator, actual: Value, expected: Value) -> bool {
        apply(op, Some(&actual), Some(&expected))
    }

    #[test]
    fn exists_distinguishes_null_and_absent() {
        assert!(apply(Operator::Exists, Some(&json!(0)), None));
        assert!(apply(Operator::Exists, Some(&json!("")), None));
        assert!(!apply(Operator::Exists, Some(&Value::Null), None));
        assert!(!apply(Operator::Exists, None, None));
    }

    #[test]
    fn equals_primitives_strictly() {
        assert!(check(Operator::Equals, json!("main"), json!("main")));
        assert!(check(Operator::Equals, json!(1), json!(1.0)));
        assert!(!check(Operator::Equals, json!(1), json!("1")));
        assert!(!check(Operator::Equals, json!(true), json!("true")));
        assert!(check(Operator::Equals, Value::Null, Value::Null));
    }

    #[test]
    fn equals_absent_and_null() {
        assert!(apply(Operator::Equals, None, None));
        assert!(!apply(Operator::Equals, None, Some(&Value::Null)));
        assert!(apply(Operator::NotEquals, None, Some(&Value::Null)));
    }

    #[test]
    fn equals_arrays_elementwise() {
        assert!(check(Operator::Equals, json!(["a", "b"]), json!(["a", "b"])));
        assert!(!check(Operator::Equals, json!(["a", "b"]), json!(["b", "a"])));
        assert!(!check(Operator::Equals, json!(["a"]), json!(["a", "b"])));
        assert!(check(Operator::NotEquals, json!(["a"]), json!(["a", "b"])));
    }

    #[test]
    fn objects_never_equal() {
        assert!(!check(Operator::Equals, json!({"a": 1}), json!({"a": 1})));
        assert!(check(Operator::NotEquals, json!({"a": 1}), json!({"a": 1})));
    }

    #[test]
    fn contains_on_strings() {
        assert!(check(Operator::Contains, json!("[WIP] fix"), json!("[WIP]")));
        assert!(check(Operator::Contains, json!("v1"), json!(1)));
        assert!(check(Operator::Contains, json!("v1"), json!(1.0)));
        assert!(check(Operator::Contains, json!("is true"), json!(true)));
        assert!(!check(Operator::Contains, json!("null"), Value::Null));
        assert!(!check(Operator::Contains, json!("ab"), json!(["a"])));
    }

    #[test]
    fn contains_on_arrays() {
        assert!(check(Operator::Contains, json!(["bug", "ui"]), json!("bug")));
        assert!(check(Operator::Contains, json!(["bug", "ui"]), json!(["ui", "bug"])));
        assert!(!check(Operator::Contains, json!(["bug"]), json!(["bug", "ui"])));
        assert!(check(Operator::Contains, json!(["bug"]), json!([])));
        assert!(!apply(Operator::Contains, Some(&json!(["bug"])), None));
    }

    #[test]
    fn contains_on_other_types_is_false() {
        assert!(!check(Operator::Contains, json!(42), json!(4)));
        assert!(!check(Operator::Contains, json!({"bug": true}), json!("bug")));
        assert!(!apply(Operator::Contains, None, Some(&json!("x"))));
    }

    #[test]
    fn in_requires_array_expected() {
        assert!(check(Operator::In, json!("main"), json!(["main", "develop"])));
        assert!(!check(Operator::In, json!("feature"), json!(["main", "develop"])));
        assert!(!check(Operator::In, json!("main"), json!("main")));
        assert!(!apply(Operator::In, None, Some(&json!(["main"]))));
    }

    #[test]
    fn numeric_comparisons() {
        assert!(check(Operator::Gt, json!(5), json!(3)));
        assert!(check(Operator::Gte, json!(3), json!(3)));
        assert!(check(Operator::Lt, json!(2.5), json!(3)));
        assert!(check(Operator::Lte, json!(-1), json!(-1)));
        assert!(!check(Operator::Gt, json!(3), json!(3)));
    }

    #[test]
    fn timestamp_comparisons() {
        assert!(check(
            Operator::Gt,
            json!("2025-01-02T00:00:00Z"),
            json!("2025-01-01T23:59:59+00:00")
        ));
        assert!(check(Operator::Lt, json!("2024-12-31"), json!("2025-01-01T00:00:00Z")));
        assert!(check(
            Operator::Gte,
            json!("2025-01-01T00:00:00"),
            json!("2025-01-01")
        ));
    }

    #[test]
    fn mixed_or_unparseable_comparisons_are_false() {
        assert!(!check(Operator::Gt, json!("10"), json!(5)));
        assert!(!check(Operator::Gt, json!("abc"), json!("abd")));
        assert!(!check(Operator::Lt, json!(true), json!(false)));
        assert!(!apply(Operator::Gt, Some(&json!(1)), None));
        assert!(!apply(Operator::Lt, None, Some(&json!(1))));
    }

    #[test]
    fn regex_matching() {
        assert!(check(Operator::MatchesRegex, json!("release/1.2"), json!(r"^release/\d+")));
        assert!(!check(Operator::MatchesRegex, json!("main"), json!(r"^release/")));
        assert!(!check(Operator::MatchesRegex, json!("main"), json!("(unclosed")));
        assert!(!check(Operator::MatchesRegex, json!(12), json!(r"\d+")));
    }

    #[test]
    fn unknown_operator_fails_closed() {
        assert!(!check(Operator::Unknown, json!("a"), json!("a")));
        assert!(!apply(Operator::Unknown, None, None));
    }
}
