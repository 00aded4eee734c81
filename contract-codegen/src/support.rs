//! Capability declarations and contract-vs-target validation.
//!
//! A target declares which type kinds and validation kinds it can render,
//! which it supports partially (with a stated fallback), and which it
//! cannot express at all. The validator computes the contract's full usage
//! and turns every mismatch into a located diagnostic, independently of
//! whether the target's handlers work, so a broken handler can never mask
//! an unsupported-type report.

use contract_ir::{
    walk, ContractDefinition, Diagnostic, TypeKind, ValidationKind,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Maximum number of example paths recorded per kind.
const MAX_EXAMPLE_PATHS: usize = 3;

/// A type kind a target supports only partially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsupportedType {
    /// The affected kind
    pub kind: TypeKind,
    /// Why the target cannot fully render it
    pub reason: String,
    /// Representation the target degrades to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl UnsupportedType {
    /// Declare a partially supported or unsupported kind.
    pub fn new(kind: TypeKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
            fallback: None,
        }
    }

    /// Declare the fallback representation.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }
}

/// A validation kind a target supports only partially.
///
/// Validations degrade to "unchecked" rather than to an alternate
/// representation, so no fallback is declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsupportedValidation {
    /// The affected kind
    pub kind: ValidationKind,
    /// Why the target cannot enforce it
    pub reason: String,
}

impl UnsupportedValidation {
    /// Declare a partially supported or unsupported validation.
    pub fn new(kind: ValidationKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

/// A target's declaration of what it can render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetSupport {
    /// Kinds the target renders fully
    pub supported_types: Vec<TypeKind>,

    /// Validations the target enforces fully
    pub supported_validations: Vec<ValidationKind>,

    /// Kinds the target renders with a degraded representation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unsupported_types: Vec<UnsupportedType>,

    /// Validations the target knowingly leaves unchecked
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unsupported_validations: Vec<UnsupportedValidation>,
}

impl TargetSupport {
    /// Create an empty declaration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare fully supported type kinds.
    pub fn with_supported_types(mut self, kinds: impl IntoIterator<Item = TypeKind>) -> Self {
        self.supported_types.extend(kinds);
        self
    }

    /// Declare every type kind fully supported.
    pub fn with_all_types(mut self) -> Self {
        self.supported_types.extend(TypeKind::ALL);
        self
    }

    /// Declare fully supported validation kinds.
    pub fn with_supported_validations(
        mut self,
        kinds: impl IntoIterator<Item = ValidationKind>,
    ) -> Self {
        self.supported_validations.extend(kinds);
        self
    }

    /// Declare every validation kind fully supported.
    pub fn with_all_validations(mut self) -> Self {
        self.supported_validations.extend(ValidationKind::ALL);
        self
    }

    /// Declare a partially supported type kind.
    pub fn with_unsupported_type(mut self, declaration: UnsupportedType) -> Self {
        self.unsupported_types.push(declaration);
        self
    }

    /// Declare a partially supported validation kind.
    pub fn with_unsupported_validation(mut self, declaration: UnsupportedValidation) -> Self {
        self.unsupported_validations.push(declaration);
        self
    }

    fn type_declaration(&self, kind: TypeKind) -> Option<&UnsupportedType> {
        self.unsupported_types.iter().find(|d| d.kind == kind)
    }

    fn validation_declaration(&self, kind: ValidationKind) -> Option<&UnsupportedValidation> {
        self.unsupported_validations.iter().find(|d| d.kind == kind)
    }
}

/// Everything a contract actually uses, with example locations.
///
/// Entries are kept in first-seen order so downstream diagnostics are
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractUsage {
    types: Vec<(TypeKind, Vec<String>)>,
    validations: Vec<(ValidationKind, Vec<String>)>,
}

impl ContractUsage {
    /// Used type kinds with up to 3 example paths each, first-seen order.
    pub fn types(&self) -> &[(TypeKind, Vec<String>)] {
        &self.types
    }

    /// Used validation kinds with up to 3 example paths each, first-seen
    /// order.
    pub fn validations(&self) -> &[(ValidationKind, Vec<String>)] {
        &self.validations
    }

    fn record_type(&mut self, kind: TypeKind, path: &str) {
        record(&mut self.types, kind, path);
    }

    fn record_validation(&mut self, kind: ValidationKind, path: &str) {
        record(&mut self.validations, kind, path);
    }
}

fn record<K: PartialEq>(entries: &mut Vec<(K, Vec<String>)>, kind: K, path: &str) {
    match entries.iter_mut().find(|(k, _)| *k == kind) {
        Some((_, paths)) => {
            if paths.len() < MAX_EXAMPLE_PATHS && !paths.iter().any(|p| p == path) {
                paths.push(path.to_string());
            }
        }
        None => entries.push((kind, vec![path.to_string()])),
    }
}

/// Compute the full usage of a contract: every type kind and validation
/// kind present anywhere in its named types and endpoint inputs/outputs.
pub fn collect_usage(contract: &ContractDefinition) -> ContractUsage {
    let mut usage = ContractUsage::default();

    let mut visit = |path: &str,
                     ty: &contract_ir::TypeReference,
                     property: Option<&contract_ir::Property>| {
        usage.record_type(ty.kind(), path);
        if let Some(rules) = property.and_then(|p| p.validation.as_ref()) {
            for kind in rules.kinds() {
                usage.record_validation(kind, path);
            }
        }
        if let Some(rules) = ty.validation.as_ref() {
            for kind in rules.kinds() {
                usage.record_validation(kind, path);
            }
        }
    };

    for definition in &contract.types {
        walk(&definition.ty, &definition.name, &mut visit);
    }
    for endpoint in &contract.endpoints {
        walk(&endpoint.input, &format!("{}.input", endpoint.full_name), &mut visit);
        walk(
            &endpoint.output,
            &format!("{}.output", endpoint.full_name),
            &mut visit,
        );
    }

    usage
}

/// Validate a contract against a target's capability declaration.
///
/// Returns all type diagnostics before all validation diagnostics, each
/// group in first-seen usage order. Mismatches are collected, never
/// thrown, so one pass reports every problem in the contract.
pub fn validate_support(
    contract: &ContractDefinition,
    support: &TargetSupport,
    target_name: Option<&str>,
) -> Vec<Diagnostic> {
    let usage = collect_usage(contract);
    let target = match target_name {
        Some(name) => format!("target '{name}'"),
        None => "this target".to_string(),
    };

    let mut diagnostics = Vec::new();

    for (kind, paths) in usage.types() {
        if support.supported_types.contains(kind) {
            continue;
        }
        let first_path = &paths[0];
        match support.type_declaration(*kind) {
            Some(declaration) => {
                let mut diagnostic = Diagnostic::warning(format!(
                    "Type '{kind}' is partially supported by {target}: {}",
                    declaration.reason
                ))
                .with_path(first_path.as_str());
                if let Some(fallback) = &declaration.fallback {
                    diagnostic = diagnostic.with_hint(format!("Will fall back to: {fallback}"));
                }
                diagnostics.push(diagnostic);
            }
            None => {
                diagnostics.push(
                    Diagnostic::error(format!("Type '{kind}' is not supported by {target}"))
                        .with_path(first_path.as_str()),
                );
            }
        }
    }

    for (kind, paths) in usage.validations() {
        if support.supported_validations.contains(kind) {
            continue;
        }
        let first_path = &paths[0];
        match support.validation_declaration(*kind) {
            Some(declaration) => {
                diagnostics.push(
                    Diagnostic::warning(format!(
                        "Validation '{kind}' is partially supported by {target}: {}",
                        declaration.reason
                    ))
                    .with_path(first_path.as_str()),
                );
            }
            None => {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "Validation '{kind}' is not supported by {target}"
                    ))
                    .with_path(first_path.as_str()),
                );
            }
        }
    }

    debug!(
        diagnostics = diagnostics.len(),
        errors = diagnostics.iter().filter(|d| d.is_error()).count(),
        "validated contract against {target}"
    );
    diagnostics
}
