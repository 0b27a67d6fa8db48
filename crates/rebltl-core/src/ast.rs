//! Expression syntax tree of the property-specification language.
//!
//! The modeling tool emits a tree of statements. Every node that can appear in
//! an LTL definition is an [`Expression`]: common metadata (position,
//! annotations, resolved type) wrapped around exactly one [`ExpressionKind`].
//! The tree is owned and boxed, so it is acyclic by construction.

use std::fmt;

use serde::Serialize;

use crate::position::Position;
use crate::types::Type;

/// A `@identifier(value)` style annotation attached to a statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub identifier: String,
    pub value: Option<Expression>,
    pub position: Position,
}

/// Names an atomic proposition or reference target.
///
/// Nameless labels never reach this type; they are represented as an absent
/// `Option<Label>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Label {
    pub name: String,
}

impl Label {
    /// Build a label, treating an empty name as "no label".
    pub fn named(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.is_empty() {
            None
        } else {
            Some(Label { name })
        }
    }
}

/// Argument list of a call-shaped term, e.g. the `(a, b)` in `f(a, b)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParentSuffixPrimary {
    pub arguments: Vec<Expression>,
    pub position: Position,
}

/// A named reference, possibly labelled, invoked, or indexed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermPrimary {
    pub name: String,
    pub label: Option<Label>,
    pub parent_suffix: Option<ParentSuffixPrimary>,
    pub indices: Vec<Expression>,
}

impl TermPrimary {
    /// The atomic-proposition identity of this term: the label when present,
    /// otherwise the plain name.
    pub fn proposition_name(&self) -> &str {
        match &self.label {
            Some(label) => &label.name,
            None => &self.name,
        }
    }
}

/// An operator application with one required and one optional operand.
///
/// Unary temporal operators (`G`, `F`, `X`) are emitted in this shape with
/// `right` absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryExpression {
    pub left: Box<Expression>,
    pub right: Option<Box<Expression>>,
    pub operator: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryExpression {
    pub operand: Box<Expression>,
    pub operator: String,
}

/// Member access `left.right`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DotPrimary {
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

/// The closed set of expression variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExpressionKind {
    Term(TermPrimary),
    Binary(BinaryExpression),
    Unary(UnaryExpression),
    Dot(DotPrimary),
}

impl ExpressionKind {
    /// The discriminator this variant is serialized under.
    pub fn tag(&self) -> &'static str {
        match self {
            ExpressionKind::Term(_) => "TermPrimary",
            ExpressionKind::Binary(_) => "BinaryExpression",
            ExpressionKind::Unary(_) => "UnaryExpression",
            ExpressionKind::Dot(_) => "DotPrimary",
        }
    }
}

/// A typed expression node with its statement metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub ty: Option<Type>,
    pub position: Position,
    pub annotations: Vec<Annotation>,
}

impl Expression {
    /// Wrap a variant with empty metadata.
    pub fn new(kind: ExpressionKind) -> Self {
        Self {
            kind,
            ty: None,
            position: Position::unknown(),
            annotations: Vec::new(),
        }
    }

    /// A bare named term.
    pub fn term(name: impl Into<String>) -> Self {
        Self::new(ExpressionKind::Term(TermPrimary {
            name: name.into(),
            label: None,
            parent_suffix: None,
            indices: Vec::new(),
        }))
    }

    /// A term whose proposition identity comes from `label`.
    pub fn labelled_term(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(ExpressionKind::Term(TermPrimary {
            name: name.into(),
            label: Label::named(label),
            parent_suffix: None,
            indices: Vec::new(),
        }))
    }

    /// `left <operator> right`.
    pub fn binary(operator: impl Into<String>, left: Expression, right: Expression) -> Self {
        Self::new(ExpressionKind::Binary(BinaryExpression {
            left: Box::new(left),
            right: Some(Box::new(right)),
            operator: operator.into(),
        }))
    }

    /// A binary-shaped node with no right operand, e.g. `G p`.
    pub fn prefix(operator: impl Into<String>, left: Expression) -> Self {
        Self::new(ExpressionKind::Binary(BinaryExpression {
            left: Box::new(left),
            right: None,
            operator: operator.into(),
        }))
    }

    pub fn unary(operator: impl Into<String>, operand: Expression) -> Self {
        Self::new(ExpressionKind::Unary(UnaryExpression {
            operand: Box::new(operand),
            operator: operator.into(),
        }))
    }

    pub fn dot(left: Expression, right: Expression) -> Self {
        Self::new(ExpressionKind::Dot(DotPrimary {
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_type(mut self, ty: Type) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Direct sub-expressions in source order (operands, indices, arguments).
    ///
    /// Annotation values are metadata and are not included.
    pub fn children(&self) -> Vec<&Expression> {
        match &self.kind {
            ExpressionKind::Term(term) => {
                let mut out: Vec<&Expression> = term.indices.iter().collect();
                if let Some(suffix) = &term.parent_suffix {
                    out.extend(suffix.arguments.iter());
                }
                out
            }
            ExpressionKind::Binary(bin) => {
                let mut out = vec![bin.left.as_ref()];
                if let Some(right) = &bin.right {
                    out.push(right.as_ref());
                }
                out
            }
            ExpressionKind::Unary(un) => vec![un.operand.as_ref()],
            ExpressionKind::Dot(dot) => vec![dot.left.as_ref(), dot.right.as_ref()],
        }
    }

    /// Number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Expression::node_count)
            .sum::<usize>()
    }
}

/// Arity an operator expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Unary,
    Binary,
}

/// The fixed operator vocabulary of LTL definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Operator {
    /// `&&`
    And,
    /// `||`
    Or,
    /// `G`
    Globally,
    /// `F`
    Eventually,
    /// `X`
    Next,
    /// `U`
    Until,
    /// `R`
    Release,
    /// `W`
    WeakUntil,
    /// `M`
    StrongRelease,
}

impl Operator {
    pub const ALL: [Operator; 9] = [
        Operator::And,
        Operator::Or,
        Operator::Globally,
        Operator::Eventually,
        Operator::Next,
        Operator::Until,
        Operator::Release,
        Operator::WeakUntil,
        Operator::StrongRelease,
    ];

    /// Look up an operator by its source symbol.
    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol {
            "&&" => Some(Operator::And),
            "||" => Some(Operator::Or),
            "G" => Some(Operator::Globally),
            "F" => Some(Operator::Eventually),
            "X" => Some(Operator::Next),
            "U" => Some(Operator::Until),
            "R" => Some(Operator::Release),
            "W" => Some(Operator::WeakUntil),
            "M" => Some(Operator::StrongRelease),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Globally => "G",
            Operator::Eventually => "F",
            Operator::Next => "X",
            Operator::Until => "U",
            Operator::Release => "R",
            Operator::WeakUntil => "W",
            Operator::StrongRelease => "M",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Operator::Globally | Operator::Eventually | Operator::Next => Arity::Unary,
            Operator::And
            | Operator::Or
            | Operator::Until
            | Operator::Release
            | Operator::WeakUntil
            | Operator::StrongRelease => Arity::Binary,
        }
    }

    pub fn is_temporal(&self) -> bool {
        !matches!(self, Operator::And | Operator::Or)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn operator_table_round_trips_symbols() {
        for op in Operator::ALL {
            assert_eq!(Operator::parse(op.symbol()), Some(op));
        }
    }

    #[test]
    fn operator_symbols_are_distinct() {
        let symbols: HashSet<&str> = Operator::ALL.iter().map(|op| op.symbol()).collect();
        assert_eq!(symbols.len(), Operator::ALL.len());
    }

    #[test]
    fn operator_arity() {
        assert_eq!(Operator::Globally.arity(), Arity::Unary);
        assert_eq!(Operator::Next.arity(), Arity::Unary);
        assert_eq!(Operator::Until.arity(), Arity::Binary);
        assert_eq!(Operator::And.arity(), Arity::Binary);
        assert!(!Operator::Or.is_temporal());
        assert!(Operator::StrongRelease.is_temporal());
    }

    #[test]
    fn unknown_operator_symbols() {
        assert_eq!(Operator::parse("Z"), None);
        assert_eq!(Operator::parse("&"), None);
        assert_eq!(Operator::parse("g"), None);
        assert_eq!(Operator::parse(""), None);
    }

    #[test]
    fn label_overrides_name_for_identity() {
        let expr = Expression::labelled_term("sensor", "p0");
        match &expr.kind {
            ExpressionKind::Term(term) => assert_eq!(term.proposition_name(), "p0"),
            _ => panic!("expected Term"),
        }
    }

    #[test]
    fn empty_label_is_absent() {
        assert!(Label::named("").is_none());
        let expr = Expression::labelled_term("sensor", "");
        match &expr.kind {
            ExpressionKind::Term(term) => {
                assert!(term.label.is_none());
                assert_eq!(term.proposition_name(), "sensor");
            }
            _ => panic!("expected Term"),
        }
    }

    #[test]
    fn children_and_node_count() {
        let expr = Expression::binary(
            "&&",
            Expression::prefix("G", Expression::term("p0")),
            Expression::prefix("G", Expression::term("p1")),
        );
        assert_eq!(expr.children().len(), 2);
        assert_eq!(expr.node_count(), 5);
        assert_eq!(expr.kind.tag(), "BinaryExpression");
    }

    #[test]
    fn term_children_include_indices_and_arguments() {
        let expr = Expression::new(ExpressionKind::Term(TermPrimary {
            name: "f".into(),
            label: None,
            parent_suffix: Some(ParentSuffixPrimary {
                arguments: vec![Expression::term("a"), Expression::term("b")],
                position: Position::unknown(),
            }),
            indices: vec![Expression::term("i")],
        }));
        let names: Vec<&str> = expr
            .children()
            .into_iter()
            .map(|c| match &c.kind {
                ExpressionKind::Term(t) => t.name.as_str(),
                _ => "?",
            })
            .collect();
        assert_eq!(names, vec!["i", "a", "b"]);
    }

    #[test]
    fn builders_attach_metadata() {
        let expr = Expression::term("p")
            .with_position(Position::new(2, 5))
            .with_type(Type::primitive("boolean"))
            .with_annotation(Annotation {
                identifier: "priority".into(),
                value: None,
                position: Position::unknown(),
            });
        assert_eq!(expr.position, Position::new(2, 5));
        assert_eq!(expr.ty, Some(Type::primitive("boolean")));
        assert_eq!(expr.annotations.len(), 1);
    }
}
