//! Import-time field type table.
//!
//! CSV cells arrive as text. The schema names the few fields that should be
//! typed on load; everything else stays text and the evaluator infers types
//! from the value tags at query time.

use segment_core::config::ImportConfig;
use segment_core::types::parse_number;
use segment_core::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Number,
    Bool,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSchema {
    fields: HashMap<String, FieldKind>,
}

impl ImportSchema {
    /// A schema that types nothing.
    pub fn empty() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    pub fn from_config(config: &ImportConfig) -> Self {
        let mut schema = Self::empty();
        for field in &config.number_fields {
            schema = schema.field(field.clone(), FieldKind::Number);
        }
        for field in &config.bool_fields {
            schema = schema.field(field.clone(), FieldKind::Bool);
        }
        schema
    }

    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    pub fn kind_of(&self, field: &str) -> FieldKind {
        self.fields.get(field).copied().unwrap_or(FieldKind::Text)
    }

    /// Convert a raw cell for `field`. A number field whose cell does not
    /// read as a number keeps the text.
    pub fn coerce_cell(&self, field: &str, raw: &str) -> Value {
        match self.kind_of(field) {
            FieldKind::Number => match parse_number(raw) {
                Some(n) => Value::Number(n),
                None => {
                    warn!(field, value = raw, "Non-numeric cell in number field, keeping text");
                    Value::Text(raw.to_string())
                }
            },
            FieldKind::Bool => Value::Bool(raw.eq_ignore_ascii_case("true")),
            FieldKind::Text => Value::Text(raw.to_string()),
        }
    }
}

impl Default for ImportSchema {
    /// `id` and `postCount` as numbers, `isPro` as a boolean.
    fn default() -> Self {
        Self::from_config(&ImportConfig::default())
    }
}
