//! # contract-ir
//!
//! Normalized intermediate representation for schema-first API contracts.
//!
//! A contract is a set of endpoint groups of typed query/mutation
//! operations, each with an input and an output schema. This crate defines
//! the serializable tree those schemas are extracted into (type
//! references, validation rules, endpoints, and diagnostics) together
//! with the shared traversal every consumer uses to visit it.
//!
//! The IR is deliberately behavior-free: extraction lives in
//! `contract-codegen`, and code-generation targets consume the
//! [`ContractDefinition`] produced there read-only. One definition can be
//! shared across any number of concurrent target generators without
//! coordination.
//!
//! ```rust
//! use contract_ir::{PrimitiveType, Property, TypeKind, TypeReference, walk};
//!
//! let user = TypeReference::object(vec![
//!     Property::new("id", TypeReference::primitive(PrimitiveType::Uuid)),
//!     Property::new("name", TypeReference::primitive(PrimitiveType::String)),
//! ])
//! .with_name("User");
//!
//! assert_eq!(user.kind(), TypeKind::Object);
//!
//! let mut paths = Vec::new();
//! walk(&user, "User", &mut |path, _, _| paths.push(path.to_string()));
//! assert_eq!(paths, ["User", "User.id", "User.name"]);
//! ```

mod contract;
mod diagnostic;
mod traverse;
mod types;
mod validation;

pub use contract::{
    ContractDefinition, Endpoint, MiddlewareDefinition, OperationKind, Router, TypeDefinition,
};
pub use diagnostic::{Diagnostic, Severity};
pub use traverse::walk;
pub use types::{
    EnumValue, LiteralValue, PrimitiveType, Property, TypeKind, TypeReference, TypeShape,
};
pub use validation::{ValidationKind, ValidationRules};
