//! LTL formulas from property-specification definitions.
//!
//! Converts the expression tree of each [`rebltl_core::LtlDefinition`] into a
//! [`LabelledFormula`]: a formula over indexed atomic propositions plus the
//! ordered list of proposition names.

pub mod convert;
pub mod error;
pub mod formula;
pub mod printer;

pub use convert::Converter;
pub use error::ConvertError;
pub use formula::{Formula, LabelledFormula, NamedFormula};
