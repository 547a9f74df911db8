//! Structural equality between value trees.

use crate::value::Value;

/// Compare two trees structurally.
///
/// - Kinds must match first; `1` never equals `"1"`.
/// - Numbers compare by value, not text (`1.0 == 1`, `1e2 == 100`), preferring
///   exact integer and decimal comparison over floats.
/// - Objects compare by key set and per-key value; key order is ignored.
/// - Arrays must have the same length. With `order_sensitive_arrays` they
///   compare position by position; otherwise every element of `a` must claim
///   a distinct, equal element of `b`.
///
/// # Examples
///
/// ```
/// use jsondoc_core::{semantic_equals, Value};
///
/// let a: Value = r#"{"a":1,"b":2}"#.parse().unwrap();
/// let b: Value = r#"{"b":2,"a":1}"#.parse().unwrap();
/// assert!(semantic_equals(&a, &b, false));
///
/// let x: Value = "[1,2]".parse().unwrap();
/// let y: Value = "[2,1]".parse().unwrap();
/// assert!(semantic_equals(&x, &y, false));
/// assert!(!semantic_equals(&x, &y, true));
/// ```
pub fn semantic_equals(a: &Value, b: &Value, order_sensitive_arrays: bool) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Object(x), Value::Object(y)) => {
            if std::sync::Arc::ptr_eq(x, y) {
                return true;
            }
            x.len() == y.len()
                && x.iter().all(|(key, left)| {
                    y.get(key.as_ref())
                        .is_some_and(|right| semantic_equals(left, right, order_sensitive_arrays))
                })
        }
        (Value::Array(x), Value::Array(y)) => {
            if std::sync::Arc::ptr_eq(x, y) {
                return true;
            }
            if x.len() != y.len() {
                return false;
            }
            if order_sensitive_arrays {
                x.iter()
                    .zip(y.iter())
                    .all(|(left, right)| semantic_equals(left, right, true))
            } else {
                unordered_equals(x, y)
            }
        }
        _ => false,
    }
}

/// Greedy bipartite match: each left element takes the first unused equal right element.
fn unordered_equals(left: &[Value], right: &[Value]) -> bool {
    let mut used = vec![false; right.len()];
    left.iter().all(|item| {
        let found = right
            .iter()
            .enumerate()
            .position(|(i, candidate)| !used[i] && semantic_equals(item, candidate, false));
        match found {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}
