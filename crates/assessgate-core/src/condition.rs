//! Condition evaluation and the emptiness predicates.
//!
//! Everything here is total: missing or wrongly shaped operands coerce
//! instead of failing.

use crate::model::Condition;
use crate::response::{to_number, to_text, ResponseValue};

/// Evaluate `condition` against the dependency's actual value.
///
/// `equals` compares shapes and values strictly: `7` never equals `"7"`,
/// and a missing response only equals a rule with no expected value.
/// Ordering conditions coerce both sides with [`to_number`]; when either
/// side is not numeric the comparison is false, so `greater_than` and
/// `less_equal` can both be false for the same input.
pub fn evaluate(
    condition: Condition,
    actual: Option<&ResponseValue>,
    expected: Option<&ResponseValue>,
) -> bool {
    match condition {
        Condition::Equals => actual == expected,
        Condition::NotEquals => actual != expected,
        Condition::Contains => contains(actual, expected),
        Condition::NotContains => !contains(actual, expected),
        Condition::GreaterThan => to_number(actual) > to_number(expected),
        Condition::LessThan => to_number(actual) < to_number(expected),
        Condition::GreaterEqual => to_number(actual) >= to_number(expected),
        Condition::LessEqual => to_number(actual) <= to_number(expected),
        Condition::IsEmpty => is_empty_value(actual),
        Condition::IsNotEmpty => !is_empty_value(actual),
    }
}

fn contains(actual: Option<&ResponseValue>, expected: Option<&ResponseValue>) -> bool {
    to_text(actual)
        .to_lowercase()
        .contains(&to_text(expected).to_lowercase())
}

/// Emptiness as seen by `is_empty` rules and the required check.
///
/// Missing and null values are empty, text is empty when blank after
/// trimming, objects are empty without properties and files without a name.
/// Lists are never empty here: an empty multi-choice selection is caught by
/// the required check through its length instead.
pub fn is_empty_value(value: Option<&ResponseValue>) -> bool {
    match value {
        None | Some(ResponseValue::Null) => true,
        Some(ResponseValue::Text(s)) => s.trim().is_empty(),
        Some(ResponseValue::Object(map)) => map.is_empty(),
        Some(ResponseValue::File(file)) => file.name.trim().is_empty(),
        Some(ResponseValue::List(_))
        | Some(ResponseValue::Bool(_))
        | Some(ResponseValue::Number(_)) => false,
    }
}

/// Whether a response counts toward progress.
///
/// Unlike [`is_empty_value`], whitespace-only text counts as answered and an
/// empty list does not.
pub fn is_answered(value: Option<&ResponseValue>) -> bool {
    match value {
        None | Some(ResponseValue::Null) => false,
        Some(ResponseValue::Text(s)) => !s.is_empty(),
        Some(ResponseValue::List(items)) => !items.is_empty(),
        Some(_) => true,
    }
}
