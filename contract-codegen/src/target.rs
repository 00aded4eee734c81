//! Code-generation target contract.
//!
//! A target is one output language/platform. It declares its capabilities,
//! renders a contract into files, and packages the capability diagnostics
//! alongside the generated sources so callers can decide whether to trust
//! the output.

use contract_ir::{ContractDefinition, Diagnostic};
use serde::{Deserialize, Serialize};

use crate::error::CodegenError;
use crate::support::{validate_support, TargetSupport};

/// A single generated source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Output path, relative to the target's output directory
    pub path: String,
    /// File contents
    pub content: String,
}

impl GeneratedFile {
    /// Create a generated file.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Everything a generation run produces.
///
/// Callers are expected to treat any error-severity diagnostic as "do not
/// ship this output"; generation itself still proceeds best-effort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutput {
    /// Generated files
    pub files: Vec<GeneratedFile>,
    /// Capability diagnostics for this (contract, target) pair
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationOutput {
    /// Check whether any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// A code-generation backend for one output language/platform.
pub trait Target {
    /// Short lowercase identifier (e.g. "typescript", "swift").
    fn name(&self) -> &'static str;

    /// File extension of generated sources (e.g. "ts", "swift").
    fn file_extension(&self) -> &'static str;

    /// The target's capability declaration.
    fn support(&self) -> TargetSupport;

    /// Render the contract into files, packaging diagnostics alongside.
    fn generate(&self, contract: &ContractDefinition) -> Result<GenerationOutput, CodegenError>;

    /// Run the capability validator with this target's own declaration.
    ///
    /// Usable before any code generation is attempted; a broken handler
    /// table cannot mask the diagnostics produced here.
    fn check(&self, contract: &ContractDefinition) -> Vec<Diagnostic> {
        validate_support(contract, &self.support(), Some(self.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contract_ir::Severity;

    #[test]
    fn test_has_errors() {
        let mut output = GenerationOutput::default();
        assert!(!output.has_errors());

        output
            .diagnostics
            .push(Diagnostic::warning("degraded"));
        assert!(!output.has_errors());

        output.diagnostics.push(Diagnostic::error("unsupported"));
        assert!(output.has_errors());
        assert_eq!(output.diagnostics[1].severity, Severity::Error);
    }
}
