//! Segment builder — fluent API for constructing segment rules.

use segment_core::{Operator, Rule, Segment, Value};
use uuid::Uuid;

pub struct SegmentBuilder {
    id: Option<String>,
    name: String,
    rules: Vec<Rule>,
}

impl SegmentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Use a fixed id instead of a generated one.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn rule(mut self, field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        self.rules.push(Rule::new(field, operator, value));
        self
    }

    pub fn greater_than(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.rule(field, Operator::GreaterThan, value)
    }

    pub fn less_than(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.rule(field, Operator::LessThan, value)
    }

    pub fn equals(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.rule(field, Operator::Equals, value)
    }

    pub fn not_equals(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.rule(field, Operator::NotEquals, value)
    }

    pub fn contains(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.rule(field, Operator::Contains, value)
    }

    pub fn not_contains(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.rule(field, Operator::NotContains, value)
    }

    pub fn build(self) -> Segment {
        Segment {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: self.name,
            rules: self.rules,
        }
    }
}
