//! The top-level document: named LTL definitions plus pass-through assertions.

use serde::Serialize;
use serde_json::Value;

use crate::ast::Expression;

/// One named formula definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LtlDefinition {
    pub name: String,
    pub expression: Expression,
}

impl LtlDefinition {
    pub fn new(name: impl Into<String>, expression: Expression) -> Self {
        Self {
            name: name.into(),
            expression,
        }
    }
}

/// A deserialized property-specification document.
///
/// Assertion definitions are opaque to this crate and kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Root {
    pub definitions: Vec<LtlDefinition>,
    pub assertion_definitions: Vec<Value>,
}

impl Root {
    pub fn new(definitions: Vec<LtlDefinition>) -> Self {
        Self {
            definitions,
            assertion_definitions: Vec::new(),
        }
    }

    /// Look up a definition by name. The first match wins if names repeat.
    pub fn definition(&self, name: &str) -> Option<&LtlDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn definition_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.name.as_str())
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Total expression nodes across all definitions.
    pub fn node_count(&self) -> usize {
        self.definitions
            .iter()
            .map(|d| d.expression.node_count())
            .sum()
    }
}
