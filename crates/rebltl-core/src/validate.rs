//! Static type validation of LTL definitions before conversion.
//!
//! Validation only compares already-declared types; nodes without a resolved
//! type are skipped. It never fails and never mutates the tree, it collects
//! issues for the caller to report.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use crate::ast::{Expression, ExpressionKind, TermPrimary};
use crate::document::{LtlDefinition, Root};
use crate::position::Position;
use crate::types::{ComparatorPolicy, ExactComparator, Type, TypeComparator};

/// Name of the primitive type atomic propositions are expected to carry.
pub const DEFAULT_PROPOSITION_TYPE: &str = "boolean";

/// Name of the primitive type array subscripts are expected to carry.
pub const INDEX_TYPE: &str = "int";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A problem found in one definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub definition: String,
    pub severity: Severity,
    pub position: Position,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: definition `{}` at {}: {}",
            self.severity, self.definition, self.position, self.message
        )
    }
}

/// All issues found in a document, in definition order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for issue in &self.issues {
            writeln!(f, "{issue}")?;
        }
        write!(
            f,
            "{} error(s), {} warning(s)",
            self.error_count(),
            self.warning_count()
        )
    }
}

/// Checks declared types against what LTL conversion expects.
///
/// Per definition:
/// 1. a proposition term with a resolved type must be compatible with the
///    expected proposition type under the selected comparator (error),
/// 2. repeated occurrences of one proposition must carry exactly compatible
///    types (warning),
/// 3. typed subscripts must be `int` (warning).
#[derive(Debug, Clone)]
pub struct Validator {
    policy: ComparatorPolicy,
    proposition_type: Type,
}

impl Validator {
    pub fn new(policy: ComparatorPolicy) -> Self {
        Self {
            policy,
            proposition_type: Type::primitive(DEFAULT_PROPOSITION_TYPE),
        }
    }

    pub fn with_proposition_type(mut self, ty: Type) -> Self {
        self.proposition_type = ty;
        self
    }

    pub fn policy(&self) -> ComparatorPolicy {
        self.policy
    }

    pub fn validate(&self, root: &Root) -> ValidationReport {
        let issues: Vec<ValidationIssue> = root
            .definitions
            .iter()
            .flat_map(|d| self.validate_definition(d))
            .collect();
        debug!(
            "validated {} definition(s) with {} comparator: {} issue(s)",
            root.definitions.len(),
            self.policy.name(),
            issues.len()
        );
        ValidationReport { issues }
    }

    pub fn validate_definition(&self, definition: &LtlDefinition) -> Vec<ValidationIssue> {
        let mut pass = Pass {
            validator: self,
            definition: &definition.name,
            seen: BTreeMap::new(),
            issues: Vec::new(),
        };
        pass.visit(&definition.expression, true);
        pass.issues
    }
}

/// State of one definition's walk.
struct Pass<'a> {
    validator: &'a Validator,
    definition: &'a str,
    /// First declared type of each proposition, with where it was declared.
    seen: BTreeMap<&'a str, (&'a Type, Position)>,
    issues: Vec<ValidationIssue>,
}

impl<'a> Pass<'a> {
    /// `logical` is true where the converter would treat a term as a proposition.
    fn visit(&mut self, expr: &'a Expression, logical: bool) {
        match &expr.kind {
            ExpressionKind::Term(term) => {
                if logical {
                    self.check_proposition(term, expr);
                }
                self.check_indices(term);
                for child in expr.children() {
                    self.visit(child, false);
                }
            }
            ExpressionKind::Binary(_) | ExpressionKind::Unary(_) => {
                for child in expr.children() {
                    self.visit(child, logical);
                }
            }
            ExpressionKind::Dot(_) => {
                for child in expr.children() {
                    self.visit(child, false);
                }
            }
        }
    }

    fn check_proposition(&mut self, term: &'a TermPrimary, expr: &'a Expression) {
        let Some(ty) = &expr.ty else {
            return;
        };
        let name = term.proposition_name();
        let validator = self.validator;
        let expected = &validator.proposition_type;

        if !validator.policy.compare(ty, expected).is_compatible() {
            self.push(
                Severity::Error,
                expr.position,
                format!(
                    "proposition `{name}` has type {ty}, not compatible with {expected} ({} comparison)",
                    validator.policy.name()
                ),
            );
        }

        match self.seen.get(name) {
            Some((first, first_at)) => {
                if !ExactComparator.compare(first, ty).is_compatible() {
                    let (first, first_at) = (*first, *first_at);
                    self.push(
                        Severity::Warning,
                        expr.position,
                        format!(
                            "proposition `{name}` has type {ty} here but {first} at {first_at}"
                        ),
                    );
                }
            }
            None => {
                self.seen.insert(name, (ty, expr.position));
            }
        }
    }

    fn check_indices(&mut self, term: &'a TermPrimary) {
        let int = Type::primitive(INDEX_TYPE);
        for index in &term.indices {
            if let Some(ty) = &index.ty {
                if !ExactComparator.compare(ty, &int).is_compatible() {
                    self.push(
                        Severity::Warning,
                        index.position,
                        format!("subscript of `{}` has type {ty}, expected {int}", term.name),
                    );
                }
            }
        }
    }

    fn push(&mut self, severity: Severity, position: Position, message: String) {
        self.issues.push(ValidationIssue {
            definition: self.definition.to_string(),
            severity,
            position,
            message,
        });
    }
}
