//! Document filters evaluated by storage backends

use serde_json::Value;

/// A single condition on a top-level document field
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// String field equals the value
    Equals { field: String, value: String },
    /// Array field contains the string value
    Contains { field: String, value: String },
    /// Array field has exactly `len` elements
    ArrayLen { field: String, len: usize },
}

impl Condition {
    pub fn field(&self) -> &str {
        match self {
            Self::Equals { field, .. } | Self::Contains { field, .. } | Self::ArrayLen { field, .. } => {
                field
            }
        }
    }

    /// Evaluate the condition against a serialized document
    pub fn matches(&self, document: &Value) -> bool {
        let Some(field) = document.get(self.field()) else {
            return false;
        };

        match self {
            Self::Equals { value, .. } => field.as_str() == Some(value.as_str()),
            Self::Contains { value, .. } => field
                .as_array()
                .is_some_and(|items| items.iter().any(|item| item.as_str() == Some(value.as_str()))),
            Self::ArrayLen { len, .. } => field.as_array().is_some_and(|items| items.len() == *len),
        }
    }
}

/// Conjunction of conditions; an empty filter matches every document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFilter {
    conditions: Vec<Condition>,
}

impl DocumentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equals(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push(Condition::Equals {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn contains(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push(Condition::Contains {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn array_len(mut self, field: impl Into<String>, len: usize) -> Self {
        self.conditions.push(Condition::ArrayLen {
            field: field.into(),
            len,
        });
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn matches(&self, document: &Value) -> bool {
        self.conditions.iter().all(|c| c.matches(document))
    }
}
