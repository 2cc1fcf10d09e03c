//! Value coercion — turns a rule's raw value into something comparable with
//! the user's value, picking the comparison type from the user's value tag.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use segment_core::types::parse_number;
use segment_core::{Operator, Value};

/// Both sides of a (user, rule) comparison after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparable<'a> {
    Number { user: f64, rule: f64 },
    Bool { user: bool, rule: bool },
    /// Unix timestamps in milliseconds.
    Date { user: i64, rule: i64 },
    /// `user` is `None` when the field is missing from the record.
    Text { user: Option<&'a str>, rule: String },
}

/// Coerce `rule_value` toward the type of `user_value`.
///
/// Returns `None` when the user value is numeric and the rule value cannot
/// be read as a number; the rule then fails for this user.
pub fn coerce<'a>(
    user_value: Option<&'a Value>,
    operator: Operator,
    rule_value: &Value,
) -> Option<Comparable<'a>> {
    match user_value {
        Some(Value::Number(user)) => Some(Comparable::Number {
            user: *user,
            rule: rule_number(rule_value)?,
        }),
        Some(Value::Bool(user)) => Some(Comparable::Bool {
            user: *user,
            rule: rule_bool(rule_value),
        }),
        Some(Value::Text(user)) => {
            let rule = rule_value.to_string();
            if operator.is_comparison() {
                if let (Some(user_ts), Some(rule_ts)) = (parse_date(user), parse_date(&rule)) {
                    return Some(Comparable::Date {
                        user: user_ts,
                        rule: rule_ts,
                    });
                }
            }
            Some(Comparable::Text {
                user: Some(user.as_str()),
                rule,
            })
        }
        None => Some(Comparable::Text {
            user: None,
            rule: rule_value.to_string(),
        }),
    }
}

/// Numeric reading of a rule value: text goes through [`parse_number`],
/// booleans count as 1 and 0.
pub fn rule_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Text(s) => parse_number(s),
    }
}

/// Boolean reading of a rule value. Only a case-insensitive `"true"` is
/// true; every other text, and every number, is false.
pub fn rule_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Text(s) => s.eq_ignore_ascii_case("true"),
        Value::Number(_) => false,
    }
}

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a date-like string into a millisecond Unix timestamp.
///
/// Offset-less forms are read as UTC. Bare numbers are not dates.
pub fn parse_date(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.timestamp_millis());
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis());
        }
    }
    None
}
