//! Reading property-specification documents from tagged JSON.
//!
//! The modeling tool serializes every polymorphic value with a `"type"`
//! discriminator. The wire types below mirror that layout with serde's
//! internally tagged enums and are then lowered into the closed AST. The
//! per-variant nullable field rules are:
//!
//! - container fields (`indices`, `dimensions`, `arguments`, `annotations`,
//!   `definitions`, `assertionDefinitions`) default to empty when absent or null,
//! - a label that is null, tagged `"null"`, or has no name is absent,
//! - a resolved type that is null or tagged `"null"` is absent.
//!
//! Any violation aborts the whole read. Errors carry a JSON path such as
//! `$.definitions[0].expression`; inside a tagged node the path stops at the
//! node and the message names the offending field.
//!
//! A top-level object with an `expression` field and no `definitions` field is
//! read as a single-definition document.

use log::{debug, trace};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::ast::{
    Annotation, BinaryExpression, DotPrimary, Expression, ExpressionKind, Label,
    ParentSuffixPrimary, TermPrimary, UnaryExpression,
};
use crate::document::{LtlDefinition, Root};
use crate::error::DocumentError;
use crate::position::Position;
use crate::types::{ArrayType, OrdinaryPrimitiveType, Type};

type Result<T> = std::result::Result<T, DocumentError>;

/// A stateless reader from tagged JSON to [`Root`].
///
/// Holds no configuration; create one per call or share freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentReader;

impl DocumentReader {
    pub fn new() -> Self {
        Self
    }

    /// Read a document from JSON text.
    pub fn read_str(&self, json: &str) -> Result<Root> {
        self.read_slice(json.as_bytes())
    }

    /// Read a document from JSON bytes.
    pub fn read_slice(&self, json: &[u8]) -> Result<Root> {
        let mut de = serde_json::Deserializer::from_slice(json);
        let document: WireDocument = serde_path_to_error::deserialize(&mut de)?;
        de.end()?;
        document.lower()
    }

    /// Read a document from an already parsed JSON value.
    pub fn read_value(&self, value: &Value) -> Result<Root> {
        let document: WireDocument = serde_path_to_error::deserialize(value)?;
        document.lower()
    }
}

/// Treat an explicit `null` like an absent field.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDocument {
    #[serde(default)]
    definitions: Option<Vec<WireDefinition>>,
    #[serde(default, deserialize_with = "nullable")]
    assertion_definitions: Vec<Value>,
    // Single-definition form.
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    expression: Option<WireExpression>,
}

impl WireDocument {
    fn lower(self) -> Result<Root> {
        let definitions = match (self.definitions, self.expression) {
            (None, Some(expression)) => {
                debug!("reading single-definition document");
                let name = self.name.ok_or(DocumentError::MissingField {
                    field: "name",
                    path: "$".to_string(),
                })?;
                vec![LtlDefinition::from(WireDefinition { name, expression })]
            }
            (definitions, _) => definitions
                .unwrap_or_default()
                .into_iter()
                .map(LtlDefinition::from)
                .collect(),
        };
        debug!(
            "read document: {} definition(s), {} assertion definition(s)",
            definitions.len(),
            self.assertion_definitions.len()
        );
        Ok(Root {
            definitions,
            assertion_definitions: self.assertion_definitions,
        })
    }
}

#[derive(Deserialize)]
struct WireDefinition {
    name: String,
    expression: WireExpression,
}

impl From<WireDefinition> for LtlDefinition {
    fn from(wire: WireDefinition) -> Self {
        trace!("read definition `{}`", wire.name);
        LtlDefinition {
            name: wire.name,
            expression: wire.expression.into(),
        }
    }
}

#[derive(Deserialize)]
struct WirePosition {
    #[serde(default, rename = "lineNumber", alias = "line")]
    line: Option<u32>,
    #[serde(default, rename = "character", alias = "column")]
    column: Option<u32>,
}

impl From<WirePosition> for Position {
    fn from(wire: WirePosition) -> Self {
        Position {
            line: wire.line,
            column: wire.column,
        }
    }
}

/// Statement metadata shared by every expression variant.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMeta {
    #[serde(default)]
    type_info: Option<WireType>,
    #[serde(default, deserialize_with = "nullable")]
    annotations: Vec<WireAnnotation>,
    #[serde(flatten)]
    position: WirePosition,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum WireExpression {
    TermPrimary(WireTerm),
    BinaryExpression(WireBinary),
    UnaryExpression(WireUnary),
    DotPrimary(WireDot),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTerm {
    name: String,
    #[serde(default, deserialize_with = "label")]
    label: Option<Label>,
    #[serde(default)]
    parent_suffix_primary: Option<WireParentSuffix>,
    #[serde(default, deserialize_with = "nullable")]
    indices: Vec<WireExpression>,
    #[serde(flatten)]
    meta: WireMeta,
}

#[derive(Deserialize)]
struct WireBinary {
    left: Box<WireExpression>,
    #[serde(default)]
    right: Option<Box<WireExpression>>,
    operator: String,
    #[serde(flatten)]
    meta: WireMeta,
}

#[derive(Deserialize)]
struct WireUnary {
    operand: Box<WireExpression>,
    operator: String,
    #[serde(flatten)]
    meta: WireMeta,
}

#[derive(Deserialize)]
struct WireDot {
    left: Box<WireExpression>,
    right: Box<WireExpression>,
    #[serde(flatten)]
    meta: WireMeta,
}

#[derive(Deserialize)]
struct WireParentSuffix {
    #[serde(default, deserialize_with = "nullable")]
    arguments: Vec<WireExpression>,
    #[serde(flatten)]
    position: WirePosition,
}

#[derive(Deserialize)]
struct WireAnnotation {
    identifier: String,
    #[serde(default)]
    value: Option<WireExpression>,
    #[serde(flatten)]
    position: WirePosition,
}

impl From<WireExpression> for Expression {
    fn from(wire: WireExpression) -> Self {
        let (kind, meta) = match wire {
            WireExpression::TermPrimary(term) => (
                ExpressionKind::Term(TermPrimary {
                    name: term.name,
                    label: term.label,
                    parent_suffix: term.parent_suffix_primary.map(|suffix| ParentSuffixPrimary {
                        arguments: lower_all(suffix.arguments),
                        position: suffix.position.into(),
                    }),
                    indices: lower_all(term.indices),
                }),
                term.meta,
            ),
            WireExpression::BinaryExpression(binary) => (
                ExpressionKind::Binary(BinaryExpression {
                    left: Box::new((*binary.left).into()),
                    right: binary.right.map(|right| Box::new((*right).into())),
                    operator: binary.operator,
                }),
                binary.meta,
            ),
            WireExpression::UnaryExpression(unary) => (
                ExpressionKind::Unary(UnaryExpression {
                    operand: Box::new((*unary.operand).into()),
                    operator: unary.operator,
                }),
                unary.meta,
            ),
            WireExpression::DotPrimary(dot) => (
                ExpressionKind::Dot(DotPrimary {
                    left: Box::new((*dot.left).into()),
                    right: Box::new((*dot.right).into()),
                }),
                dot.meta,
            ),
        };
        Expression {
            kind,
            ty: meta.type_info.and_then(WireType::lower),
            position: meta.position.into(),
            annotations: meta
                .annotations
                .into_iter()
                .map(|annotation| Annotation {
                    identifier: annotation.identifier,
                    value: annotation.value.map(Expression::from),
                    position: annotation.position.into(),
                })
                .collect(),
        }
    }
}

fn lower_all(wire: Vec<WireExpression>) -> Vec<Expression> {
    wire.into_iter().map(Expression::from).collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireLabel {
    Name(String),
    Object {
        #[serde(default, rename = "type")]
        tag: Option<LabelTag>,
        #[serde(default)]
        name: Option<String>,
    },
}

#[derive(Deserialize)]
enum LabelTag {
    Label,
    #[serde(rename = "null")]
    Null,
}

/// A label may be null, a bare name, or a `Label` object; a `"null"` tag or an
/// empty name means no label.
fn label<'de, D>(deserializer: D) -> std::result::Result<Option<Label>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<WireLabel>::deserialize(deserializer)? {
        None => None,
        Some(WireLabel::Name(name)) => Label::named(name),
        Some(WireLabel::Object {
            tag: Some(LabelTag::Null),
            ..
        }) => None,
        Some(WireLabel::Object { name, .. }) => name.and_then(Label::named),
    })
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum WireType {
    #[serde(rename = "null")]
    Null,
    OrdinaryPrimitiveType(WirePrimitive),
    ArrayType(WireArray),
}

impl WireType {
    fn lower(self) -> Option<Type> {
        match self {
            WireType::Null => None,
            WireType::OrdinaryPrimitiveType(primitive) => Some(Type::Primitive(primitive.into())),
            WireType::ArrayType(array) => Some(Type::Array(ArrayType {
                dimensions: array.dimensions,
                element: array.ordinary_primitive_type.into(),
                position: array.position.into(),
            })),
        }
    }
}

#[derive(Deserialize)]
struct WirePrimitive {
    name: String,
    #[serde(flatten)]
    position: WirePosition,
}

/// Array element: an `OrdinaryPrimitiveType` whose tag may be omitted.
#[derive(Deserialize)]
struct WireElement {
    #[serde(default, rename = "type")]
    _tag: Option<ElementTag>,
    name: String,
    #[serde(flatten)]
    position: WirePosition,
}

#[derive(Deserialize)]
enum ElementTag {
    OrdinaryPrimitiveType,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArray {
    #[serde(default, deserialize_with = "nullable")]
    dimensions: Vec<u32>,
    #[serde(alias = "element")]
    ordinary_primitive_type: WireElement,
    #[serde(flatten)]
    position: WirePosition,
}

impl From<WirePrimitive> for OrdinaryPrimitiveType {
    fn from(wire: WirePrimitive) -> Self {
        OrdinaryPrimitiveType {
            name: wire.name,
            position: wire.position.into(),
        }
    }
}

impl From<WireElement> for OrdinaryPrimitiveType {
    fn from(wire: WireElement) -> Self {
        OrdinaryPrimitiveType {
            name: wire.name,
            position: wire.position.into(),
        }
    }
}
