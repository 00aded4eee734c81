//! Type reference model.
//!
//! This module defines the recursive type-shape tree extracted from contract
//! schemas. The model is schema-library-agnostic and can be consumed by any
//! code-generation target.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationRules;

/// Closed set of tags classifying a [`TypeReference`]'s shape.
///
/// Every type reference carries exactly one kind. Target handler tables and
/// capability declarations are keyed by this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// Object with named properties
    Object,
    /// Homogeneous list
    Array,
    /// One of several branch types
    Union,
    /// Scalar value (string, number, ...)
    Primitive,
    /// Value that may be explicitly null
    Nullable,
    /// Value that may be absent
    Optional,
    /// Closed set of string/number values
    Enum,
    /// Exact literal value
    Literal,
    /// Map with uniform key and value types
    Record,
    /// Fixed-length heterogeneous list
    Tuple,
    /// First-class date value
    Date,
}

impl TypeKind {
    /// All kinds, in the canonical order used for completeness checks.
    pub const ALL: [TypeKind; 11] = [
        TypeKind::Object,
        TypeKind::Array,
        TypeKind::Union,
        TypeKind::Primitive,
        TypeKind::Nullable,
        TypeKind::Optional,
        TypeKind::Enum,
        TypeKind::Literal,
        TypeKind::Record,
        TypeKind::Tuple,
        TypeKind::Date,
    ];

    /// The lowercase tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Object => "object",
            TypeKind::Array => "array",
            TypeKind::Union => "union",
            TypeKind::Primitive => "primitive",
            TypeKind::Nullable => "nullable",
            TypeKind::Optional => "optional",
            TypeKind::Enum => "enum",
            TypeKind::Literal => "literal",
            TypeKind::Record => "record",
            TypeKind::Tuple => "tuple",
            TypeKind::Date => "date",
        }
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar base-type tag carried by primitive references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    /// UTF-8 string
    String,
    /// Floating point number
    Number,
    /// Whole number
    Integer,
    /// True/false
    Boolean,
    /// Timestamp serialized as an ISO datetime string
    DateTime,
    /// UUID string
    Uuid,
    /// Email address string
    Email,
}

impl PrimitiveType {
    /// The lowercase tag for this primitive.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::DateTime => "datetime",
            PrimitiveType::Uuid => "uuid",
            PrimitiveType::Email => "email",
        }
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal value captured verbatim from a literal schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    /// String literal
    String(String),
    /// Numeric literal
    Number(f64),
    /// Boolean literal
    Boolean(bool),
}

/// A single member of an enum schema's value set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    /// String member
    String(String),
    /// Numeric member
    Number(f64),
}

/// Shape of a type reference, carrying exactly the data relevant to its kind.
///
/// Only kind-relevant data can be populated; each variant owns its own
/// payload, so the invariant holds by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TypeShape {
    /// Scalar with a base-type tag
    Primitive(PrimitiveType),
    /// Named properties in declaration order
    Object(Vec<Property>),
    /// Homogeneous element type
    Array(Box<TypeReference>),
    /// Branch types in declaration order
    Union(Vec<TypeReference>),
    /// Positional element types
    Tuple(Vec<TypeReference>),
    /// Uniform key/value map
    Record {
        /// Key type (usually a string primitive)
        key: Box<TypeReference>,
        /// Value type
        value: Box<TypeReference>,
    },
    /// Closed value set, captured verbatim
    Enum(Vec<EnumValue>),
    /// Exact literal value
    Literal(LiteralValue),
    /// Wrapped type that may be absent
    Optional(Box<TypeReference>),
    /// Wrapped type that may be explicitly null
    Nullable(Box<TypeReference>),
    /// First-class date value
    Date,
}

impl TypeShape {
    /// The flat kind tag for this shape.
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeShape::Primitive(_) => TypeKind::Primitive,
            TypeShape::Object(_) => TypeKind::Object,
            TypeShape::Array(_) => TypeKind::Array,
            TypeShape::Union(_) => TypeKind::Union,
            TypeShape::Tuple(_) => TypeKind::Tuple,
            TypeShape::Record { .. } => TypeKind::Record,
            TypeShape::Enum(_) => TypeKind::Enum,
            TypeShape::Literal(_) => TypeKind::Literal,
            TypeShape::Optional(_) => TypeKind::Optional,
            TypeShape::Nullable(_) => TypeKind::Nullable,
            TypeShape::Date => TypeKind::Date,
        }
    }
}

/// A node in the recursive type-shape tree extracted from a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeReference {
    /// Declared or synthesized type name, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The shape of this reference
    pub shape: TypeShape,

    /// Constraints attached at this node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
}

impl TypeReference {
    /// Create an unnamed reference with the given shape.
    pub fn new(shape: TypeShape) -> Self {
        Self {
            name: None,
            shape,
            validation: None,
        }
    }

    /// Create a primitive reference.
    pub fn primitive(base: PrimitiveType) -> Self {
        Self::new(TypeShape::Primitive(base))
    }

    /// Create an object reference with the given properties.
    pub fn object(properties: Vec<Property>) -> Self {
        Self::new(TypeShape::Object(properties))
    }

    /// Create an array reference.
    pub fn array(element: TypeReference) -> Self {
        Self::new(TypeShape::Array(Box::new(element)))
    }

    /// Create a union reference.
    pub fn union(branches: Vec<TypeReference>) -> Self {
        Self::new(TypeShape::Union(branches))
    }

    /// Create a tuple reference.
    pub fn tuple(elements: Vec<TypeReference>) -> Self {
        Self::new(TypeShape::Tuple(elements))
    }

    /// Create a record reference.
    pub fn record(key: TypeReference, value: TypeReference) -> Self {
        Self::new(TypeShape::Record {
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    /// Create an enum reference with the given value set.
    pub fn enumeration(values: Vec<EnumValue>) -> Self {
        Self::new(TypeShape::Enum(values))
    }

    /// Create a literal reference.
    pub fn literal(value: LiteralValue) -> Self {
        Self::new(TypeShape::Literal(value))
    }

    /// Wrap a reference as optional.
    pub fn optional(inner: TypeReference) -> Self {
        Self::new(TypeShape::Optional(Box::new(inner)))
    }

    /// Wrap a reference as nullable.
    pub fn nullable(inner: TypeReference) -> Self {
        Self::new(TypeShape::Nullable(Box::new(inner)))
    }

    /// Create a first-class date reference.
    pub fn date() -> Self {
        Self::new(TypeShape::Date)
    }

    /// Set the type name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach validation rules; empty rule sets are dropped.
    pub fn with_validation(mut self, validation: ValidationRules) -> Self {
        self.validation = if validation.is_empty() {
            None
        } else {
            Some(validation)
        };
        self
    }

    /// The flat kind tag for this reference.
    pub fn kind(&self) -> TypeKind {
        self.shape.kind()
    }

    /// Check if this reference is an optional or nullable wrapper.
    pub fn is_wrapper(&self) -> bool {
        matches!(self.shape, TypeShape::Optional(_) | TypeShape::Nullable(_))
    }

    /// The wrapped inner reference, if this is a wrapper.
    pub fn wrapped(&self) -> Option<&TypeReference> {
        match &self.shape {
            TypeShape::Optional(inner) | TypeShape::Nullable(inner) => Some(inner),
            _ => None,
        }
    }
}

/// A named field belonging to exactly one containing object reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Field name as declared in the schema
    pub name: String,

    /// Field type
    #[serde(rename = "type")]
    pub ty: TypeReference,

    /// Whether the field must be present
    pub required: bool,

    /// Constraints declared directly on the field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
}

impl Property {
    /// Create a required property.
    pub fn new(name: impl Into<String>, ty: TypeReference) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            validation: None,
        }
    }

    /// Set whether the field is required.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Attach field-level validation rules; empty rule sets are dropped.
    pub fn with_validation(mut self, validation: ValidationRules) -> Self {
        self.validation = if validation.is_empty() {
            None
        } else {
            Some(validation)
        };
        self
    }
}
