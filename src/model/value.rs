//! Value semantics shared by the interpreter and the function library

use std::cmp::Ordering;

use serde_json::{Number, Value};

/// Returns true for the falsy set: `""`, `[]`, `{}`, `null` and `false`.
///
/// Numbers are never falsy, including zero.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) => false,
    }
}

/// Whether a filter predicate result selects its element.
///
/// Stricter than [`is_falsy`]: numeric zero (`0`, `0.0`) also rejects.
pub fn is_filter_match(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        other => !is_falsy(other),
    }
}

/// Type-aware deep equality.
///
/// Values of different kinds are never equal, so `true` is not `1` and `false`
/// is not `0`. Numbers compare by numeric value (`1 == 1.0`), objects compare
/// key-wise regardless of key order.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => false,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Ordering between two values, if they are mutually comparable.
///
/// Numbers order numerically and strings lexicographically. Any other pairing,
/// including a number against a string, is not comparable.
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

/// Build a JSON number, keeping integral results as integers.
///
/// Non-finite results have no JSON representation and become `null`.
pub fn number_from_f64(n: f64) -> Value {
    // `i64::MAX as f64` and `u64::MAX as f64` round up, so the upper bounds are strict
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        return Value::from(n as i64);
    }
    if n.fract() == 0.0 && n > 0.0 && n < u64::MAX as f64 {
        return Value::from(n as u64);
    }
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_falsy_set() {
        for value in [json!(""), json!([]), json!({}), json!(null), json!(false)] {
            assert!(is_falsy(&value), "{value} should be falsy");
        }
        for value in [json!(0), json!(0.0), json!(" "), json!([0]), json!(true)] {
            assert!(!is_falsy(&value), "{value} should not be falsy");
        }
    }

    #[test]
    fn test_filter_match_rejects_numeric_zero() {
        for value in [json!(0), json!(0.0), json!(-0.0), json!(""), json!(null), json!(false)] {
            assert!(!is_filter_match(&value), "{value} should not match");
        }
        for value in [json!(1), json!(-0.5), json!(" "), json!([0]), json!({"a": 0}), json!(true)] {
            assert!(is_filter_match(&value), "{value} should match");
        }
    }

    #[test]
    fn test_booleans_never_equal_numbers() {
        assert!(!values_equal(&json!(true), &json!(1)));
        assert!(!values_equal(&json!(false), &json!(0)));
        assert!(!values_equal(&json!(0), &json!(false)));
        assert!(!values_equal(&json!([true]), &json!([1])));
    }

    #[test]
    fn test_numeric_equality() {
        assert!(values_equal(&json!(1), &json!(1)));
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(!values_equal(&json!(1), &json!(2)));
    }

    #[test]
    fn test_object_equality_ignores_key_order() {
        assert!(values_equal(
            &json!({"a": 1, "b": [1, 2]}),
            &json!({"b": [1, 2.0], "a": 1})
        ));
        assert!(!values_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    }

    #[test]
    fn test_compare_values() {
        assert_eq!(compare_values(&json!(1), &json!(2.5)), Some(Ordering::Less));
        assert_eq!(compare_values(&json!("b"), &json!("a")), Some(Ordering::Greater));
        assert_eq!(compare_values(&json!(1), &json!("1")), None);
        assert_eq!(compare_values(&json!(true), &json!(false)), None);
        assert_eq!(compare_values(&json!(null), &json!(null)), None);
    }

    #[test]
    fn test_number_from_f64() {
        assert_eq!(number_from_f64(3.0), json!(3));
        assert_eq!(number_from_f64(2.5), json!(2.5));
        assert_eq!(number_from_f64(f64::NAN), json!(null));
        assert_eq!(number_from_f64(9_223_372_036_854_775_808.0), json!(1u64 << 63));
        assert_eq!(number_from_f64(18_446_744_073_709_551_616.0), json!(1.8446744073709552e19));
        assert_eq!(number_from_f64(-9_223_372_036_854_775_808.0), json!(i64::MIN));
    }
}
