//! Error types for extraction and type mapping.
//!
//! Structural and programmer errors are returned as `Err` and abort the
//! run. Contract-vs-capability mismatches are never errors; they are
//! collected as [`contract_ir::Diagnostic`]s so one pass can report every
//! mismatch in a contract.

use contract_ir::TypeKind;
use thiserror::Error;

/// Result type alias for extraction.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Fatal failure while extracting a contract definition.
///
/// Extraction fails fast: no partial [`contract_ir::ContractDefinition`]
/// is ever produced.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// No router or endpoint groups could be found in the loaded module.
    #[error("No router found in the loaded contract module")]
    RouterNotFound,

    /// An operation lacks a recognized query/mutation tag.
    #[error("Operation '{endpoint}' has no recognized operation type")]
    MissingOperationType {
        /// Full name of the offending operation
        endpoint: String,
    },

    /// A schema node's shape could not be classified into any supported
    /// kind.
    #[error("Schema at '{path}' cannot be classified into a supported type kind")]
    UnclassifiableSchema {
        /// Canonical path of the offending node
        path: String,
    },

    /// The module value is not structured as endpoint groups of
    /// operations.
    #[error("Malformed contract module: {detail}")]
    MalformedModule {
        /// What was wrong
        detail: String,
    },
}

/// Programmer error in a target's type-mapper handler table.
///
/// Should be unreachable for any target that passed
/// [`crate::TypeMapper::verify_completeness`].
#[derive(Debug, Clone, Error)]
pub enum MapperError {
    /// The handler table lacks an entry for a kind in use.
    #[error("No handler registered for type kind '{kind}'")]
    MissingHandler {
        /// The unhandled kind
        kind: TypeKind,
    },

    /// The handler table does not cover the full kind set.
    #[error("Type mapping is incomplete; missing handlers for: {}", format_kinds(.missing))]
    IncompleteMapping {
        /// Every absent kind, in canonical order
        missing: Vec<TypeKind>,
    },
}

fn format_kinds(kinds: &[TypeKind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Top-level error for a full generation run.
#[derive(Debug, Clone, Error)]
pub enum CodegenError {
    /// Contract extraction failed.
    #[error("Failed to extract contract: {0}")]
    Extract(#[from] ExtractError),

    /// Type mapping failed.
    #[error("Failed to map types: {0}")]
    Mapper(#[from] MapperError),
}
