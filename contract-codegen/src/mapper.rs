//! Type-directed mapping dispatcher.
//!
//! A target supplies one handler per [`TypeKind`] and the mapper drives
//! them: dispatch on a reference's kind, recursive resolution of nested
//! members, and automatic routing of handler-declared utilities into the
//! [`UtilityCollector`]. [`TypeMapper::verify_completeness`] is the target
//! author's construction-time guarantee that no kind silently falls
//! through at generation time.

use std::collections::HashMap;

use contract_ir::{TypeKind, TypeReference};
use convert_case::{Case, Casing};

use crate::collector::{GeneratedUtility, UtilityCollector};
use crate::error::MapperError;

/// A target-supplied handler mapping one kind of type reference.
pub type MapHandler<R> =
    Box<dyn Fn(&TypeReference, &mut MapContext<'_, R>) -> Result<R, MapperError> + Send + Sync>;

/// Maps type references to a target-specific representation `R`.
///
/// Each independent generation run should use its own mapper instance (or
/// call [`TypeMapper::reset`] between runs); a single contract definition
/// can then be shared by any number of concurrent mappers.
pub struct TypeMapper<R = String> {
    handlers: HashMap<TypeKind, MapHandler<R>>,
    utilities: UtilityCollector,
}

impl<R> TypeMapper<R> {
    /// Start building a mapper from an empty handler table.
    pub fn builder() -> TypeMapperBuilder<R> {
        TypeMapperBuilder {
            handlers: HashMap::new(),
        }
    }

    /// Check that the handler table covers every [`TypeKind`].
    ///
    /// Fails with [`MapperError::IncompleteMapping`] naming every missing
    /// kind.
    pub fn verify_completeness(&self) -> Result<(), MapperError> {
        let missing: Vec<TypeKind> = TypeKind::ALL
            .iter()
            .copied()
            .filter(|kind| !self.handlers.contains_key(kind))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MapperError::IncompleteMapping { missing })
        }
    }

    /// Map a type reference at recursion depth 0.
    pub fn map(&mut self, ty: &TypeReference) -> Result<R, MapperError> {
        dispatch(&self.handlers, &mut self.utilities, ty, 0, None, None)
    }

    /// Map a type reference with parent-type/field-name naming hints.
    pub fn map_with_hints(
        &mut self,
        ty: &TypeReference,
        parent_type: Option<&str>,
        field_name: Option<&str>,
    ) -> Result<R, MapperError> {
        dispatch(
            &self.handlers,
            &mut self.utilities,
            ty,
            0,
            parent_type.map(str::to_string),
            field_name.map(str::to_string),
        )
    }

    /// Utilities collected so far, in first-insertion order.
    pub fn utilities(&self) -> &[GeneratedUtility] {
        self.utilities.get_all()
    }

    /// Deduplicated imports of all collected utilities.
    pub fn imports(&self) -> Vec<String> {
        self.utilities.imports()
    }

    /// Clear accumulated utilities between independent generation runs.
    pub fn reset(&mut self) {
        self.utilities.reset();
    }
}

/// Builder for a [`TypeMapper`]'s handler table.
pub struct TypeMapperBuilder<R = String> {
    handlers: HashMap<TypeKind, MapHandler<R>>,
}

impl<R> TypeMapperBuilder<R> {
    /// Register the handler for one kind.
    pub fn handler<F>(mut self, kind: TypeKind, handler: F) -> Self
    where
        F: Fn(&TypeReference, &mut MapContext<'_, R>) -> Result<R, MapperError>
            + Send
            + Sync
            + 'static,
    {
        self.handlers.insert(kind, Box::new(handler));
        self
    }

    /// Finish building.
    ///
    /// Completeness is not checked here; call
    /// [`TypeMapper::verify_completeness`] before generating.
    pub fn build(self) -> TypeMapper<R> {
        TypeMapper {
            handlers: self.handlers,
            utilities: UtilityCollector::new(),
        }
    }
}

/// Context passed to every handler invocation.
pub struct MapContext<'a, R> {
    handlers: &'a HashMap<TypeKind, MapHandler<R>>,
    utilities: &'a mut UtilityCollector,
    depth: usize,
    display_name: String,
    parent_type: Option<String>,
    field_name: Option<String>,
}

impl<R> MapContext<'_, R> {
    /// Recursion depth: 0 at the root, incremented for nested members.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Resolved display name for the current reference: its declared name,
    /// a parent/field-derived name, or the kind tag.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Name of the enclosing type, when known.
    pub fn parent_type(&self) -> Option<&str> {
        self.parent_type.as_deref()
    }

    /// Name of the field owning the current reference, when known.
    pub fn field_name(&self) -> Option<&str> {
        self.field_name.as_deref()
    }

    /// Resolve a nested member at depth + 1.
    pub fn resolve(&mut self, ty: &TypeReference) -> Result<R, MapperError> {
        dispatch(
            self.handlers,
            &mut *self.utilities,
            ty,
            self.depth + 1,
            Some(self.display_name.clone()),
            None,
        )
    }

    /// Resolve a nested field's type at depth + 1, carrying the field name
    /// as a naming hint.
    pub fn resolve_field(&mut self, ty: &TypeReference, field: &str) -> Result<R, MapperError> {
        dispatch(
            self.handlers,
            &mut *self.utilities,
            ty,
            self.depth + 1,
            Some(self.display_name.clone()),
            Some(field.to_string()),
        )
    }

    /// Declare a utility this handler needs emitted.
    ///
    /// Duplicate names are merged; the first declaration wins.
    pub fn require_utility(&mut self, utility: GeneratedUtility) {
        self.utilities.add(utility);
    }
}

fn dispatch<R>(
    handlers: &HashMap<TypeKind, MapHandler<R>>,
    utilities: &mut UtilityCollector,
    ty: &TypeReference,
    depth: usize,
    parent_type: Option<String>,
    field_name: Option<String>,
) -> Result<R, MapperError> {
    let kind = ty.kind();
    let handler = handlers
        .get(&kind)
        .ok_or(MapperError::MissingHandler { kind })?;

    let display_name = match (&ty.name, &parent_type, &field_name) {
        (Some(name), _, _) => name.clone(),
        (None, Some(parent), Some(field)) => {
            format!("{parent}{}", field.to_case(Case::Pascal))
        }
        _ => kind.to_string(),
    };

    let mut ctx = MapContext {
        handlers,
        utilities,
        depth,
        display_name,
        parent_type,
        field_name,
    };
    handler(ty, &mut ctx)
}
