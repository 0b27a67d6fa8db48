//! Source positions reported by the modeling tool.

use std::fmt;

use serde::Serialize;

/// A nullable line/column pair attached to statements, annotations, and types.
///
/// Either coordinate may be missing in synthetic nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            line: Some(line),
            column: Some(column),
        }
    }

    /// A position with neither coordinate known.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_known(&self) -> bool {
        self.line.is_some()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, "{line}:{column}"),
            (Some(line), None) => write!(f, "line {line}"),
            _ => write!(f, "unknown position"),
        }
    }
}
