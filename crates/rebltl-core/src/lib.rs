//! Property-specification documents for actor models.
//!
//! A modeling tool emits its LTL property definitions as a JSON tree of typed
//! statements. This crate reads that tree into owned Rust values and checks
//! the declared types before conversion.
//!
//! ## Modules
//!
//! - [`ast`]: expression tree and operator vocabulary
//! - [`types`]: nominal type model with castable and exact comparators
//! - [`document`]: named definitions grouped in a [`Root`]
//! - [`deserialize`]: stateless JSON reader
//! - [`validate`]: static type checks over definitions
//! - [`position`]: source line/column pairs

pub mod ast;
pub mod deserialize;
pub mod document;
pub mod error;
pub mod position;
pub mod types;
pub mod validate;

pub use ast::{
    Annotation, Arity, BinaryExpression, DotPrimary, Expression, ExpressionKind, Label, Operator,
    ParentSuffixPrimary, TermPrimary, UnaryExpression,
};
pub use deserialize::DocumentReader;
pub use document::{LtlDefinition, Root};
pub use error::DocumentError;
pub use position::Position;
pub use types::{
    ArrayType, CastableComparator, ComparatorPolicy, Compatibility, ExactComparator,
    OrdinaryPrimitiveType, Type, TypeComparator,
};
pub use validate::{Severity, ValidationIssue, ValidationReport, Validator};
