//! # contract-codegen
//!
//! Contract extraction and the capability-aware code-generation framework
//! that sits between a schema-first API contract and its generated target
//! sources.
//!
//! The pipeline per generation request:
//!
//! 1. [`extract`] walks a loaded router module (endpoint groups of typed
//!    query/mutation operations) and produces one immutable
//!    [`contract_ir::ContractDefinition`].
//! 2. A target builds its [`TypeMapper`] (one handler per
//!    [`contract_ir::TypeKind`], checked by
//!    [`TypeMapper::verify_completeness`]) and renders every type and
//!    endpoint, with handler-declared utilities deduplicated by the
//!    [`UtilityCollector`].
//! 3. Independently, [`validate_support`] checks the contract's actual
//!    usage against the target's [`TargetSupport`] declaration and emits
//!    located [`contract_ir::Diagnostic`]s: errors for unsupported
//!    shapes, warnings for declared degradations.
//!
//! The core is synchronous and I/O-free: loading the contract module from
//! disk is the caller's concern, and a single extracted definition can be
//! shared read-only across any number of concurrent targets, each with its
//! own mapper and collector.
//!
//! ```rust
//! use contract_codegen::{extract_from_value, validate_support, TargetSupport};
//! use serde_json::json;
//!
//! let module = json!({
//!     "router": {
//!         "users": {
//!             "get": {
//!                 "type": "query",
//!                 "input": { "type": "object", "properties": {
//!                     "id": { "type": "string", "format": "uuid" }
//!                 }, "required": ["id"] },
//!                 "output": { "type": "object", "properties": {
//!                     "name": { "type": "string" }
//!                 }, "required": ["name"] }
//!             }
//!         }
//!     }
//! });
//!
//! let contract = extract_from_value(&module).expect("extraction");
//! assert_eq!(contract.endpoints[0].full_name, "users.get");
//!
//! let support = TargetSupport::new().with_all_types().with_all_validations();
//! assert!(validate_support(&contract, &support, Some("typescript")).is_empty());
//! ```

mod collector;
mod error;
mod extract;
mod mapper;
mod schema;
mod support;
mod target;

pub use collector::{GeneratedUtility, UtilityCollector};
pub use error::{CodegenError, ExtractError, ExtractResult, MapperError};
pub use extract::{
    extract, extract_from_value, EndpointGroup, MiddlewareDecl, Operation, RouterModule,
};
pub use mapper::{MapContext, MapHandler, TypeMapper, TypeMapperBuilder};
pub use schema::{FieldSchema, JsonSchema, SchemaShape, SchemaSource};
pub use support::{
    collect_usage, validate_support, ContractUsage, TargetSupport, UnsupportedType,
    UnsupportedValidation,
};
pub use target::{GeneratedFile, GenerationOutput, Target};
