//! Condition evaluation — the per-operator dispatch applied after coercion.

use segment_core::types::parse_number;
use segment_core::{Operator, Value};

use crate::coercion::{coerce, Comparable};

/// Evaluate one coerced comparison. Every input has a defined answer;
/// operators that do not apply to the value type yield `false`.
pub fn evaluate(comparable: &Comparable<'_>, operator: Operator) -> bool {
    match comparable {
        Comparable::Number { user, rule } => compare_ordered(user, operator, rule),
        Comparable::Date { user, rule } => compare_ordered(user, operator, rule),
        Comparable::Bool { user, rule } => match operator {
            Operator::GreaterThan => u8::from(*user) > u8::from(*rule),
            Operator::LessThan => u8::from(*user) < u8::from(*rule),
            Operator::Equals => user == rule,
            Operator::NotEquals => user != rule,
            Operator::Contains | Operator::NotContains => false,
        },
        Comparable::Text { user, rule } => compare_text(*user, operator, rule),
    }
}

/// Coerce and evaluate in one step. A failed coercion is a non-match.
pub fn compare_values(actual: Option<&Value>, operator: Operator, expected: &Value) -> bool {
    coerce(actual, operator, expected).map_or(false, |c| evaluate(&c, operator))
}

fn compare_ordered<T: PartialOrd>(user: &T, operator: Operator, rule: &T) -> bool {
    match operator {
        Operator::GreaterThan => user > rule,
        Operator::LessThan => user < rule,
        Operator::Equals => user == rule,
        Operator::NotEquals => user != rule,
        Operator::Contains | Operator::NotContains => false,
    }
}

fn compare_text(user: Option<&str>, operator: Operator, rule: &str) -> bool {
    match operator {
        Operator::GreaterThan => text_number(user) > text_number(Some(rule)),
        Operator::LessThan => text_number(user) < text_number(Some(rule)),
        Operator::Equals => user == Some(rule),
        // A missing field is unequal to every rule value.
        Operator::NotEquals => user != Some(rule),
        Operator::Contains => user.map_or(false, |u| contains_folded(u, rule)),
        // Not the negation of `contains`: a missing field matches neither.
        Operator::NotContains => user.map_or(false, |u| !contains_folded(u, rule)),
    }
}

/// Numeric reading of text for `>`/`<`; unreadable or missing is NaN,
/// which compares false against everything.
fn text_number(text: Option<&str>) -> f64 {
    text.and_then(parse_number).unwrap_or(f64::NAN)
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
