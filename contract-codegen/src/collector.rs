//! Deduplicating registry for generation-time helper artifacts.
//!
//! Type-mapper handlers may declare helper code ("utilities") they need
//! emitted alongside the generated types. The collector guarantees each
//! helper appears at most once per generation run regardless of how many
//! times it is requested.

use std::collections::HashSet;

/// A named helper artifact plus the imports it requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUtility {
    /// Unique key; later additions under the same name are ignored
    pub name: String,
    /// The helper's source code
    pub code: String,
    /// Import lines the helper needs
    pub imports: Vec<String>,
}

impl GeneratedUtility {
    /// Create a utility with no imports.
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            imports: Vec::new(),
        }
    }

    /// Add a required import.
    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.imports.push(import.into());
        self
    }
}

/// Accumulates utilities during a single generation pass.
#[derive(Debug, Default)]
pub struct UtilityCollector {
    utilities: Vec<GeneratedUtility>,
    seen: HashSet<String>,
}

impl UtilityCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a utility by name; the first insertion wins.
    ///
    /// Returns `true` when the utility was newly registered.
    pub fn add(&mut self, utility: GeneratedUtility) -> bool {
        if !self.seen.insert(utility.name.clone()) {
            return false;
        }
        self.utilities.push(utility);
        true
    }

    /// All registered utilities, in first-insertion order.
    pub fn get_all(&self) -> &[GeneratedUtility] {
        &self.utilities
    }

    /// The deduplicated union of all utilities' imports, in first-seen
    /// order.
    pub fn imports(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut imports = Vec::new();
        for utility in &self.utilities {
            for import in &utility.imports {
                if seen.insert(import.as_str()) {
                    imports.push(import.clone());
                }
            }
        }
        imports
    }

    /// Number of registered utilities.
    pub fn len(&self) -> usize {
        self.utilities.len()
    }

    /// Check if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.utilities.is_empty()
    }

    /// Discard everything, ready for an independent generation run.
    pub fn reset(&mut self) {
        self.utilities.clear();
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent_by_name() {
        let mut collector = UtilityCollector::new();
        assert!(collector.add(GeneratedUtility::new("dateReviver", "const a = 1;")));
        assert!(!collector.add(GeneratedUtility::new("dateReviver", "const b = 2;")));

        assert_eq!(collector.len(), 1);
        assert_eq!(collector.get_all()[0].code, "const a = 1;");
    }

    #[test]
    fn test_first_insertion_order() {
        let mut collector = UtilityCollector::new();
        collector.add(GeneratedUtility::new("b", ""));
        collector.add(GeneratedUtility::new("a", ""));
        collector.add(GeneratedUtility::new("c", ""));
        let names: Vec<_> = collector.get_all().iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn test_imports_are_deduplicated_in_first_seen_order() {
        let mut collector = UtilityCollector::new();
        collector.add(
            GeneratedUtility::new("a", "")
                .with_import("import { z } from 'zod';")
                .with_import("import dayjs from 'dayjs';"),
        );
        collector.add(
            GeneratedUtility::new("b", "")
                .with_import("import dayjs from 'dayjs';")
                .with_import("import { v4 } from 'uuid';"),
        );

        assert_eq!(
            collector.imports(),
            [
                "import { z } from 'zod';",
                "import dayjs from 'dayjs';",
                "import { v4 } from 'uuid';",
            ]
        );
    }

    #[test]
    fn test_reset() {
        let mut collector = UtilityCollector::new();
        collector.add(GeneratedUtility::new("a", ""));
        collector.reset();
        assert!(collector.is_empty());
        // The same name can register again after a reset.
        assert!(collector.add(GeneratedUtility::new("a", "")));
    }
}
