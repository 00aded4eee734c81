//! Schema introspection boundary.
//!
//! The extractor never talks to a schema library directly; it sees schemas
//! through the narrow [`SchemaSource`] capability interface. This keeps the
//! extraction algorithm independent of which library backs it and makes it
//! testable against hand-built schema values.

mod json;

pub use json::JsonSchema;

use contract_ir::{EnumValue, LiteralValue, PrimitiveType, ValidationRules};

/// A schema object the extractor can introspect.
///
/// Implementations expose three capabilities: classification into one of
/// the supported shapes, structured validation constraints, and an optional
/// declared type name.
pub trait SchemaSource: Sized {
    /// Classify this schema into one of the supported shapes.
    ///
    /// Returns `None` when the schema cannot be classified; the extractor
    /// turns that into a fail-fast
    /// [`crate::ExtractError::UnclassifiableSchema`].
    fn classify(&self) -> Option<SchemaShape<Self>>;

    /// Structured validation constraints declared on this schema node.
    fn constraints(&self) -> Option<ValidationRules>;

    /// The declared type name, if the schema is a named type.
    fn type_name(&self) -> Option<String>;
}

/// The classified shape of a schema node, with child schemas of the same
/// source type.
#[derive(Debug, Clone)]
pub enum SchemaShape<S> {
    /// Scalar with a base-type tag
    Primitive(PrimitiveType),
    /// Object with an ordered list of named fields
    Object(Vec<FieldSchema<S>>),
    /// Homogeneous list
    Array(S),
    /// One of several branch schemas
    Union(Vec<S>),
    /// Fixed-length heterogeneous list
    Tuple(Vec<S>),
    /// Uniform key/value map; a missing key schema means string keys
    Record {
        /// Key schema, when declared
        key: Option<S>,
        /// Value schema
        value: S,
    },
    /// Closed value set, captured verbatim
    Enum(Vec<EnumValue>),
    /// Exact literal value
    Literal(LiteralValue),
    /// Wrapped schema that may be absent
    Optional(S),
    /// Wrapped schema that may be explicitly null
    Nullable(S),
    /// First-class date value
    Date,
}

/// A named child schema of an object, with per-field optionality.
#[derive(Debug, Clone)]
pub struct FieldSchema<S> {
    /// Field name
    pub name: String,
    /// Field schema
    pub schema: S,
    /// Whether the field must be present
    pub required: bool,
}

impl<S> FieldSchema<S> {
    /// Create a required field.
    pub fn new(name: impl Into<String>, schema: S) -> Self {
        Self {
            name: name.into(),
            schema,
            required: true,
        }
    }

    /// Set whether the field is required.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}
