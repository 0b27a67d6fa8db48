//! The nominal type model of the property language.
//!
//! Types are declared by the modeling tool and attached to expressions; this
//! crate never infers them. Two types are related only through the directional
//! upcast relation and the two comparator policies built on top of it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::position::Position;

/// A named scalar type such as `int` or `boolean`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OrdinaryPrimitiveType {
    pub name: String,
    pub position: Position,
}

impl OrdinaryPrimitiveType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Position::unknown(),
        }
    }

    /// Whether both types denote the same named type. Positions are ignored.
    pub fn same_named_type(&self, other: &OrdinaryPrimitiveType) -> bool {
        self.name == other.name
    }
}

/// A possibly multi-dimensional array of a primitive element type.
///
/// A dimension of `0` is unbound (dynamically sized); any other value is a
/// fixed bound. Dimensions are listed outer to inner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ArrayType {
    pub dimensions: Vec<u32>,
    pub element: OrdinaryPrimitiveType,
    pub position: Position,
}

impl ArrayType {
    pub fn new(element: OrdinaryPrimitiveType, dimensions: Vec<u32>) -> Self {
        Self {
            dimensions,
            element,
            position: Position::unknown(),
        }
    }

    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    /// Same rank, and every target dimension is unbound or equal to ours.
    fn dimensions_fit(&self, target: &ArrayType) -> bool {
        self.rank() == target.rank()
            && self
                .dimensions
                .iter()
                .zip(&target.dimensions)
                .all(|(ours, theirs)| *theirs == 0 || ours == theirs)
    }
}

/// A resolved type attached to an expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Type {
    Primitive(OrdinaryPrimitiveType),
    Array(ArrayType),
}

impl Type {
    pub fn primitive(name: impl Into<String>) -> Self {
        Type::Primitive(OrdinaryPrimitiveType::new(name))
    }

    pub fn array(element: impl Into<String>, dimensions: Vec<u32>) -> Self {
        Type::Array(ArrayType::new(OrdinaryPrimitiveType::new(element), dimensions))
    }

    pub fn position(&self) -> Position {
        match self {
            Type::Primitive(p) => p.position,
            Type::Array(a) => a.position,
        }
    }

    /// The human-readable type name, e.g. `int` or `byte[3][]`.
    pub fn type_name(&self) -> String {
        match self {
            Type::Primitive(p) => p.name.clone(),
            Type::Array(a) => {
                let mut name = a.element.name.clone();
                for dim in &a.dimensions {
                    if *dim == 0 {
                        name.push_str("[]");
                    } else {
                        name.push_str(&format!("[{dim}]"));
                    }
                }
                name
            }
        }
    }

    /// Whether a value of this type may be used where `target` is expected.
    ///
    /// Primitives never upcast; their identity is decided by
    /// [`ExactComparator`]. An array upcasts to an array of the same rank whose
    /// dimensions are each unbound or equal, over the same element type.
    pub fn can_upcast_to(&self, target: &Type) -> bool {
        match (self, target) {
            (Type::Primitive(_), _) => false,
            (Type::Array(base), Type::Array(target)) => {
                base.dimensions_fit(target) && base.element.same_named_type(&target.element)
            }
            (Type::Array(_), Type::Primitive(_)) => false,
        }
    }

    /// Mirror of [`Type::can_upcast_to`].
    pub fn can_downcast_to(&self, target: &Type) -> bool {
        target.can_upcast_to(self)
    }

    pub fn can_cast_to(&self, target: &Type) -> bool {
        self.can_upcast_to(target) || self.can_downcast_to(target)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Outcome of comparing two types under a comparator policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Compatibility {
    Compatible,
    Incompatible,
}

impl Compatibility {
    pub fn is_compatible(self) -> bool {
        self == Compatibility::Compatible
    }

    fn from_bool(ok: bool) -> Self {
        if ok {
            Compatibility::Compatible
        } else {
            Compatibility::Incompatible
        }
    }
}

/// A compatibility classification between a base type and a target type.
///
/// Comparators are total and side-effect free. They are binary filters, not
/// orderings, and must not be used for sorting.
pub trait TypeComparator {
    fn compare(&self, base: &Type, target: &Type) -> Compatibility;
}

/// Compatible iff the base upcasts to the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct CastableComparator;

impl TypeComparator for CastableComparator {
    fn compare(&self, base: &Type, target: &Type) -> Compatibility {
        Compatibility::from_bool(base.can_upcast_to(target))
    }
}

/// Compatible iff both sides denote the same named primitive, or both are
/// arrays related by upcast over the same named element type.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactComparator;

impl TypeComparator for ExactComparator {
    fn compare(&self, base: &Type, target: &Type) -> Compatibility {
        let ok = match (base, target) {
            (Type::Primitive(b), Type::Primitive(t)) => b.same_named_type(t),
            (Type::Array(b), Type::Array(t)) => {
                base.can_upcast_to(target) && b.element.same_named_type(&t.element)
            }
            _ => false,
        };
        Compatibility::from_bool(ok)
    }
}

/// Selects one of the two comparators by name (used by configuration).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparatorPolicy {
    Castable,
    #[default]
    Exact,
}

impl ComparatorPolicy {
    /// Parse a policy name, accepting `exact` and `castable`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "exact" => Some(ComparatorPolicy::Exact),
            "castable" | "cast" => Some(ComparatorPolicy::Castable),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ComparatorPolicy::Castable => "castable",
            ComparatorPolicy::Exact => "exact",
        }
    }
}

impl TypeComparator for ComparatorPolicy {
    fn compare(&self, base: &Type, target: &Type) -> Compatibility {
        match self {
            ComparatorPolicy::Castable => CastableComparator.compare(base, target),
            ComparatorPolicy::Exact => ExactComparator.compare(base, target),
        }
    }
}
