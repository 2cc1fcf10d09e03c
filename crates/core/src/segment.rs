use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::types::Value;

/// Comparison operators a rule may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Operator {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "not contains")]
    NotContains,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::Equals,
        Operator::NotEquals,
        Operator::Contains,
        Operator::NotContains,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
            Operator::Contains => "contains",
            Operator::NotContains => "not contains",
        }
    }

    /// Ordering and equality operators; the only ones dates apply to.
    pub fn is_comparison(&self) -> bool {
        !matches!(self, Operator::Contains | Operator::NotContains)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operator '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperator {}

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

/// Rule forms submit operators as free strings. Anything blank or
/// unrecognized lands as `None` so the rule is simply non-matching.
fn lenient_operator<'de, D>(deserializer: D) -> Result<Option<Operator>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// One field/operator/value condition of a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Rule {
    #[serde(default)]
    pub id: String,
    /// Empty means the rule has not been filled in yet.
    #[serde(default)]
    pub field: String,
    #[serde(default, deserialize_with = "lenient_operator")]
    pub operator: Option<Operator>,
    #[serde(default)]
    pub value: Value,
}

impl Rule {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            field: field.into(),
            operator: Some(operator),
            value: value.into(),
        }
    }

    /// A rule missing its field or operator never matches anyone.
    pub fn is_complete(&self) -> bool {
        !self.field.is_empty() && self.operator.is_some()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.operator.map(|o| o.as_str()).unwrap_or("?");
        write!(f, "{} {} {}", self.field, op, self.value)
    }
}

/// A named, rule-defined subset of the user collection. Members are the
/// users satisfying every rule; a segment without rules has no members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Segment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Segment {
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            rules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_wire_names() {
        for op in Operator::ALL {
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{}\"", op.as_str()));
            assert_eq!(op.as_str().parse::<Operator>().unwrap(), op);
        }
        assert!("like".parse::<Operator>().is_err());
    }

    #[test]
    fn test_rule_from_form_json() {
        let rule: Rule = serde_json::from_str(
            r#"{"id": "rule1", "field": "postCount", "operator": ">", "value": "30"}"#,
        )
        .unwrap();
        assert_eq!(rule.operator, Some(Operator::GreaterThan));
        assert_eq!(rule.value, Value::Text("30".into()));
        assert!(rule.is_complete());
    }

    #[test]
    fn test_partial_rule_deserializes_as_incomplete() {
        let rule: Rule =
            serde_json::from_str(r#"{"id": "r", "field": "", "operator": "", "value": ""}"#)
                .unwrap();
        assert!(rule.operator.is_none());
        assert!(!rule.is_complete());

        let rule: Rule =
            serde_json::from_str(r#"{"field": "age", "operator": ">="}"#).unwrap();
        assert!(rule.operator.is_none());
        assert_eq!(rule.value, Value::Text(String::new()));
    }

    #[test]
    fn test_typed_rule_values() {
        let seg: Segment = serde_json::from_str(
            r#"{"id": "1", "name": "Power Users", "rules": [
                {"id": "rule1", "field": "postCount", "operator": ">", "value": 30},
                {"id": "rule2", "field": "isPro", "operator": "=", "value": true}
            ]}"#,
        )
        .unwrap();
        assert_eq!(seg.rules[0].value, Value::Number(30.0));
        assert_eq!(seg.rules[1].value, Value::Bool(true));
        assert_eq!(seg.rules[0].to_string(), "postCount > 30");
    }
}
