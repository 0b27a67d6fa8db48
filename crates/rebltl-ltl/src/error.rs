//! Error types for LTL conversion.

use rebltl_core::Position;

/// Why a definition could not be converted.
///
/// Every variant names the definition being converted and the position of
/// the offending node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("malformed expression in definition `{definition}` at {position}: {detail}")]
    MalformedExpression {
        definition: String,
        position: Position,
        detail: String,
    },

    #[error("unsupported operator `{operator}` in definition `{definition}` at {position}")]
    UnsupportedOperator {
        definition: String,
        operator: String,
        position: Position,
    },

    #[error("unsupported node `{node}` in definition `{definition}` at {position}")]
    UnsupportedNode {
        definition: String,
        node: &'static str,
        position: Position,
    },
}

impl ConvertError {
    pub fn definition(&self) -> &str {
        match self {
            ConvertError::MalformedExpression { definition, .. }
            | ConvertError::UnsupportedOperator { definition, .. }
            | ConvertError::UnsupportedNode { definition, .. } => definition,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            ConvertError::MalformedExpression { position, .. }
            | ConvertError::UnsupportedOperator { position, .. }
            | ConvertError::UnsupportedNode { position, .. } => *position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ConvertError::UnsupportedOperator {
            definition: "safety".into(),
            operator: "Z".into(),
            position: Position::new(4, 2),
        };
        assert_eq!(
            err.to_string(),
            "unsupported operator `Z` in definition `safety` at 4:2"
        );
        assert_eq!(err.definition(), "safety");
        assert_eq!(err.position(), Position::new(4, 2));
    }

    #[test]
    fn unknown_positions_still_render() {
        let err = ConvertError::UnsupportedNode {
            definition: "d".into(),
            node: "DotPrimary",
            position: Position::unknown(),
        };
        assert!(err.to_string().ends_with("at unknown position"));
    }
}
