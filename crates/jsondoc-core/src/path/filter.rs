//! Filter predicate evaluation against a single array item.

use std::cmp::Ordering;

use super::token::{CompareOp, FilterLiteral, FilterPredicate};
use crate::value::Value;

/// Whether `item` satisfies the predicate.
///
/// A missing field, or a field whose kind cannot be compared with the
/// literal, never matches; that includes `!=`.
pub(crate) fn matches(predicate: &FilterPredicate, item: &Value) -> bool {
    let Some(field) = resolve_field(&predicate.field, item) else {
        return false;
    };

    match compare(field, &predicate.literal) {
        Some(Comparison::Ordered(ordering)) => match predicate.op {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Ge => ordering != Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Lt => ordering == Ordering::Less,
        },
        Some(Comparison::EqualityOnly(equal)) => match predicate.op {
            CompareOp::Eq => equal,
            CompareOp::Ne => !equal,
            _ => false,
        },
        None => false,
    }
}

enum Comparison {
    Ordered(Ordering),
    /// Booleans and null have no ordering.
    EqualityOnly(bool),
}

fn resolve_field<'a>(field: &[String], item: &'a Value) -> Option<&'a Value> {
    field
        .iter()
        .try_fold(item, |current, name| current.try_get_property(name))
}

fn compare(value: &Value, literal: &FilterLiteral) -> Option<Comparison> {
    match (value, literal) {
        (Value::Number(n), FilterLiteral::Number(lit)) => {
            // Equality follows the numeric equality ladder; ordering is exact.
            if n == lit {
                Some(Comparison::Ordered(Ordering::Equal))
            } else {
                match n.cmp_exact(lit) {
                    Ordering::Equal => Some(Comparison::EqualityOnly(false)),
                    ordering => Some(Comparison::Ordered(ordering)),
                }
            }
        }
        (Value::String(s), FilterLiteral::String(lit)) => {
            Some(Comparison::Ordered(s.as_ref().cmp(lit.as_str())))
        }
        (Value::Bool(b), FilterLiteral::Bool(lit)) => Some(Comparison::EqualityOnly(b == lit)),
        (Value::Null, FilterLiteral::Null) => Some(Comparison::EqualityOnly(true)),
        _ => None,
    }
}
