//! Conversion of definition expressions into labelled LTL formulas.
//!
//! Conversion is a structural recursion over the expression tree. Terms
//! become atomic propositions, numbered per definition in order of first
//! occurrence (left operand before right). Operators are looked up in the
//! fixed vocabulary and checked against their arity. Nothing is shared
//! between definitions, so every definition's propositions start at index 0.

use std::collections::HashMap;

use log::{debug, trace};
use rebltl_core::{
    Arity, BinaryExpression, Expression, ExpressionKind, LtlDefinition, Operator, Position, Root,
    TermPrimary, UnaryExpression,
};

use crate::error::ConvertError;
use crate::formula::{Formula, LabelledFormula, NamedFormula};

type Result<T> = std::result::Result<T, ConvertError>;

/// Converts definitions to formulas. Holds no state between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Converter;

impl Converter {
    pub fn new() -> Self {
        Self
    }

    /// Convert one definition into a formula and its proposition list.
    pub fn convert_definition(&self, definition: &LtlDefinition) -> Result<LabelledFormula> {
        let mut conversion = Conversion {
            definition: &definition.name,
            propositions: Propositions::default(),
        };
        let formula = conversion.expression(&definition.expression)?;
        let atomic_propositions = conversion.propositions.into_names();
        debug!(
            "converted definition `{}`: {} proposition(s), {} node(s)",
            definition.name,
            atomic_propositions.len(),
            formula.size()
        );
        Ok(LabelledFormula::new(formula, atomic_propositions))
    }

    /// Convert every definition in document order, stopping at the first
    /// failure.
    pub fn convert_document(&self, root: &Root) -> Result<Vec<NamedFormula>> {
        root.definitions
            .iter()
            .map(|d| {
                Ok(NamedFormula {
                    name: d.name.clone(),
                    formula: self.convert_definition(d)?,
                })
            })
            .collect()
    }

    /// Convert every definition in document order, keeping failures next to
    /// the definition they belong to.
    pub fn convert_each(&self, root: &Root) -> Vec<(String, Result<LabelledFormula>)> {
        root.definitions
            .iter()
            .map(|d| (d.name.clone(), self.convert_definition(d)))
            .collect()
    }
}

/// Proposition names in first-occurrence order, plus a reverse lookup.
#[derive(Default)]
struct Propositions {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Propositions {
    fn intern(&mut self, name: &str) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        let i = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), i);
        i
    }

    fn into_names(self) -> Vec<String> {
        self.names
    }
}

/// State of one definition's conversion.
struct Conversion<'a> {
    definition: &'a str,
    propositions: Propositions,
}

impl Conversion<'_> {
    fn expression(&mut self, expr: &Expression) -> Result<Formula> {
        match &expr.kind {
            ExpressionKind::Term(term) => Ok(self.term(term)),
            ExpressionKind::Binary(binary) => self.binary(binary, expr.position),
            ExpressionKind::Unary(unary) => self.unary(unary, expr.position),
            ExpressionKind::Dot(_) => Err(ConvertError::UnsupportedNode {
                definition: self.definition.to_string(),
                node: expr.kind.tag(),
                position: expr.position,
            }),
        }
    }

    fn term(&mut self, term: &TermPrimary) -> Formula {
        let name = term.proposition_name();
        let known = self.propositions.names.len();
        let index = self.propositions.intern(name);
        if index == known {
            trace!("definition `{}`: proposition {index} is `{name}`", self.definition);
        }
        Formula::atom(index)
    }

    fn binary(&mut self, binary: &BinaryExpression, position: Position) -> Result<Formula> {
        let op = self.operator(&binary.operator, position)?;
        match (op.arity(), &binary.right) {
            (Arity::Unary, None) => {
                let operand = self.expression(&binary.left)?;
                self.unary_formula(op, operand, position)
            }
            (Arity::Unary, Some(_)) => Err(self.malformed(
                position,
                format!("unary operator `{op}` must not have a right operand"),
            )),
            (Arity::Binary, Some(right)) => {
                let left = self.expression(&binary.left)?;
                let right = self.expression(right)?;
                self.binary_formula(op, left, right, position)
            }
            (Arity::Binary, None) => Err(self.malformed(
                position,
                format!("binary operator `{op}` is missing its right operand"),
            )),
        }
    }

    fn unary(&mut self, unary: &UnaryExpression, position: Position) -> Result<Formula> {
        let op = self.operator(&unary.operator, position)?;
        match op.arity() {
            Arity::Unary => {
                let operand = self.expression(&unary.operand)?;
                self.unary_formula(op, operand, position)
            }
            Arity::Binary => Err(self.malformed(
                position,
                format!("binary operator `{op}` applied to a single operand"),
            )),
        }
    }

    fn unary_formula(&self, op: Operator, operand: Formula, position: Position) -> Result<Formula> {
        match op {
            Operator::Globally => Ok(Formula::globally(operand)),
            Operator::Eventually => Ok(Formula::eventually(operand)),
            Operator::Next => Ok(Formula::next(operand)),
            Operator::And
            | Operator::Or
            | Operator::Until
            | Operator::Release
            | Operator::WeakUntil
            | Operator::StrongRelease => {
                Err(self.malformed(position, format!("operator `{op}` is not unary")))
            }
        }
    }

    fn binary_formula(
        &self,
        op: Operator,
        left: Formula,
        right: Formula,
        position: Position,
    ) -> Result<Formula> {
        match op {
            Operator::And => Ok(Formula::and(left, right)),
            Operator::Or => Ok(Formula::or(left, right)),
            Operator::Until => Ok(Formula::until(left, right)),
            Operator::Release => Ok(Formula::release(left, right)),
            Operator::WeakUntil => Ok(Formula::weak_until(left, right)),
            Operator::StrongRelease => Ok(Formula::strong_release(left, right)),
            Operator::Globally | Operator::Eventually | Operator::Next => {
                Err(self.malformed(position, format!("operator `{op}` is not binary")))
            }
        }
    }

    fn operator(&self, symbol: &str, position: Position) -> Result<Operator> {
        Operator::parse(symbol).ok_or_else(|| ConvertError::UnsupportedOperator {
            definition: self.definition.to_string(),
            operator: symbol.to_string(),
            position,
        })
    }

    fn malformed(&self, position: Position, detail: String) -> ConvertError {
        ConvertError::MalformedExpression {
            definition: self.definition.to_string(),
            position,
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(name: &str) -> Expression {
        Expression::term(name)
    }

    fn def(name: &str, expression: Expression) -> LtlDefinition {
        LtlDefinition::new(name, expression)
    }

    fn convert(expression: Expression) -> Result<LabelledFormula> {
        Converter::new().convert_definition(&def("d", expression))
    }

    #[test]
    fn globally_of_a_term() {
        let lf = convert(Expression::prefix("G", term("p"))).unwrap();
        assert_eq!(lf.atomic_propositions, vec!["p"]);
        assert_eq!(lf.formula, Formula::globally(Formula::atom(0)));
    }

    #[test]
    fn conjunction_of_globals() {
        let expr = Expression::binary(
            "&&",
            Expression::prefix("G", term("p0")),
            Expression::prefix("G", term("p1")),
        );
        let lf = convert(expr).unwrap();
        assert_eq!(lf.atomic_propositions, vec!["p0", "p1"]);
        assert_eq!(
            lf.formula,
            Formula::and(
                Formula::globally(Formula::atom(0)),
                Formula::globally(Formula::atom(1))
            )
        );
    }

    #[test]
    fn until_of_two_terms() {
        let lf = convert(Expression::binary("U", term("p0"), term("p1"))).unwrap();
        assert_eq!(lf.atomic_propositions, vec!["p0", "p1"]);
        assert_eq!(lf.formula, Formula::until(Formula::atom(0), Formula::atom(1)));
    }

    #[test]
    fn every_binary_operator_maps() {
        let cases = [
            ("||", Formula::or(Formula::atom(0), Formula::atom(1))),
            ("R", Formula::release(Formula::atom(0), Formula::atom(1))),
            ("W", Formula::weak_until(Formula::atom(0), Formula::atom(1))),
            ("M", Formula::strong_release(Formula::atom(0), Formula::atom(1))),
        ];
        for (op, expected) in cases {
            let lf = convert(Expression::binary(op, term("a"), term("b"))).unwrap();
            assert_eq!(lf.formula, expected, "operator {op}");
        }
    }

    #[test]
    fn unknown_operator_is_unsupported() {
        let err = convert(Expression::binary("Z", term("a"), term("b"))).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnsupportedOperator { ref operator, ref definition, .. }
                if operator == "Z" && definition == "d"
        ));
    }

    #[test]
    fn definitions_number_propositions_independently() {
        let root = Root::new(vec![
            def("first", Expression::binary("U", term("q"), term("p0"))),
            def("second", Expression::prefix("F", term("p0"))),
        ]);
        let formulas = Converter::new().convert_document(&root).unwrap();
        assert_eq!(formulas[0].formula.atomic_propositions, vec!["q", "p0"]);
        assert_eq!(formulas[1].formula.atomic_propositions, vec!["p0"]);
        assert_eq!(formulas[1].formula.formula, Formula::eventually(Formula::atom(0)));
    }

    #[test]
    fn repeated_names_share_an_index() {
        let expr = Expression::binary(
            "||",
            Expression::prefix("X", term("p")),
            Expression::binary("&&", term("q"), term("p")),
        );
        let lf = convert(expr).unwrap();
        assert_eq!(lf.atomic_propositions, vec!["p", "q"]);
        assert_eq!(
            lf.formula,
            Formula::or(
                Formula::next(Formula::atom(0)),
                Formula::and(Formula::atom(1), Formula::atom(0))
            )
        );
    }

    #[test]
    fn labels_decide_proposition_identity() {
        let expr = Expression::binary(
            "&&",
            Expression::labelled_term("sensor", "hot"),
            Expression::labelled_term("other", "hot"),
        );
        let lf = convert(expr).unwrap();
        assert_eq!(lf.atomic_propositions, vec!["hot"]);
        assert_eq!(lf.formula, Formula::and(Formula::atom(0), Formula::atom(0)));
    }

    #[test]
    fn unary_operator_with_right_operand_is_malformed() {
        for op in ["G", "F", "X"] {
            let err = convert(Expression::binary(op, term("a"), term("b"))).unwrap_err();
            assert!(
                matches!(err, ConvertError::MalformedExpression { .. }),
                "operator {op}: {err}"
            );
        }
    }

    #[test]
    fn binary_operator_without_right_operand_is_malformed() {
        for op in ["&&", "||", "U", "R", "W", "M"] {
            let err = convert(Expression::prefix(op, term("a"))).unwrap_err();
            assert!(matches!(err, ConvertError::MalformedExpression { .. }), "operator {op}");
        }
    }

    #[test]
    fn unary_expressions_use_the_unary_table() {
        let lf = convert(Expression::unary("F", term("done"))).unwrap();
        assert_eq!(lf.formula, Formula::eventually(Formula::atom(0)));

        let err = convert(Expression::unary("U", term("done"))).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedExpression { .. }));

        let err = convert(Expression::unary("!", term("done"))).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedOperator { .. }));
    }

    #[test]
    fn dot_primary_is_unsupported() {
        let expr = Expression::prefix(
            "G",
            Expression::dot(term("actor"), term("field")).with_position(Position::new(9, 3)),
        );
        let err = convert(expr).unwrap_err();
        assert_eq!(
            err,
            ConvertError::UnsupportedNode {
                definition: "d".into(),
                node: "DotPrimary",
                position: Position::new(9, 3),
            }
        );
    }

    #[test]
    fn errors_carry_the_node_position() {
        let expr = Expression::prefix(
            "G",
            Expression::binary("?", term("a"), term("b")).with_position(Position::new(2, 8)),
        );
        let err = convert(expr).unwrap_err();
        assert_eq!(err.position(), Position::new(2, 8));
    }

    #[test]
    fn document_conversion_fails_fast() {
        let root = Root::new(vec![
            def("ok", Expression::prefix("G", term("p"))),
            def("bad", Expression::binary("Z", term("a"), term("b"))),
            def("later", Expression::prefix("F", term("q"))),
        ]);
        let err = Converter::new().convert_document(&root).unwrap_err();
        assert_eq!(err.definition(), "bad");
    }

    #[test]
    fn convert_each_isolates_failures() {
        let root = Root::new(vec![
            def("ok", Expression::prefix("G", term("p"))),
            def("bad", Expression::binary("Z", term("a"), term("b"))),
            def("later", Expression::prefix("F", term("q"))),
        ]);
        let results = Converter::new().convert_each(&root);
        let names: Vec<_> = results.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["ok", "bad", "later"]);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
        assert_eq!(
            results[2].1.as_ref().unwrap().formula,
            Formula::eventually(Formula::atom(0))
        );
    }

    #[test]
    fn operator_tables_match_arity() {
        let conversion = Conversion {
            definition: "d",
            propositions: Propositions::default(),
        };
        let at = Position::new(1, 1);
        for op in Operator::ALL {
            let unary = conversion.unary_formula(op, Formula::atom(0), at);
            let binary = conversion.binary_formula(op, Formula::atom(0), Formula::atom(1), at);
            match op.arity() {
                Arity::Unary => {
                    assert!(unary.is_ok(), "{op}");
                    assert!(
                        matches!(binary, Err(ConvertError::MalformedExpression { ref detail, .. })
                            if detail.contains("is not binary")),
                        "{op}"
                    );
                }
                Arity::Binary => {
                    assert!(binary.is_ok(), "{op}");
                    assert!(
                        matches!(unary, Err(ConvertError::MalformedExpression { ref detail, .. })
                            if detail.contains("is not unary")),
                        "{op}"
                    );
                }
            }
        }
    }
}
