//! Contract definition model.
//!
//! A [`ContractDefinition`] is the normalized output of contract extraction:
//! a flat list of named types plus the endpoints whose input/output trees
//! reference them. It is created once per generation run and shared
//! read-only by every target afterwards.

use serde::{Deserialize, Serialize};

use crate::types::TypeReference;

/// Kind of operation an endpoint performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Read-only operation
    Query,
    /// Write operation
    Mutation,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Mutation => write!(f, "mutation"),
        }
    }
}

/// A single typed operation exposed by the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Operation name within its group
    pub name: String,

    /// Query or mutation
    #[serde(rename = "type")]
    pub kind: OperationKind,

    /// Fully expanded input type
    pub input: TypeReference,

    /// Fully expanded output type
    pub output: TypeReference,

    /// `<group>.<name>`, globally unique within the contract.
    ///
    /// Used as the diagnostic-path root for endpoint-level issues and as
    /// the wire-level method identifier.
    pub full_name: String,
}

/// An endpoint group and the operations it contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Router {
    /// Group name
    pub name: String,

    /// Full names of the group's endpoints, in definition order
    pub endpoints: Vec<String>,
}

/// A named type extracted from the contract's schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Declared or synthesized name
    pub name: String,

    /// The type's full reference tree
    #[serde(rename = "type")]
    pub ty: TypeReference,
}

/// Middleware attached to the contract, recorded as an explicit IR field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiddlewareDefinition {
    /// Middleware name
    pub name: String,

    /// Group names the middleware applies to; empty means all groups
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applies_to: Vec<String>,
}

/// The normalized, serializable representation of a full contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractDefinition {
    /// Endpoint groups in definition order
    pub routers: Vec<Router>,

    /// All named types, in first-registration order
    pub types: Vec<TypeDefinition>,

    /// All endpoints, in definition order
    pub endpoints: Vec<Endpoint>,

    /// Middleware declarations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub middleware: Vec<MiddlewareDefinition>,
}

impl ContractDefinition {
    /// Look up a named type.
    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Look up an endpoint by its full name.
    pub fn endpoint(&self, full_name: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.full_name == full_name)
    }
}
