//! Contract extraction.
//!
//! Walks a loaded router module (endpoint groups of typed query/mutation
//! operations) and produces a [`ContractDefinition`]: a flat list of named
//! types plus every endpoint's input/output fully expanded into a
//! [`TypeReference`] tree with attached validation rules.
//!
//! Extraction fails fast: a module without a router, an operation without a
//! recognized type tag, or a schema that cannot be classified aborts the
//! run with no partial definition.

use std::collections::HashSet;

use contract_ir::{
    ContractDefinition, Endpoint, MiddlewareDefinition, OperationKind, PrimitiveType, Property,
    Router, TypeDefinition, TypeReference, TypeShape,
};
use convert_case::{Case, Casing};
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{ExtractError, ExtractResult};
use crate::schema::{FieldSchema, JsonSchema, SchemaShape, SchemaSource};

/// Module export keys probed when resolving the router value.
const ROUTER_KEYS: [&str; 3] = ["router", "appRouter", "contract"];

/// A single operation of an endpoint group.
#[derive(Debug, Clone)]
pub struct Operation<S> {
    /// Operation name within its group
    pub name: String,
    /// Parsed operation tag; `None` when the tag is missing or
    /// unrecognized, which fails extraction
    pub kind: Option<OperationKind>,
    /// Input schema
    pub input: S,
    /// Output schema
    pub output: S,
}

/// An endpoint group and its operations, in definition order.
#[derive(Debug, Clone)]
pub struct EndpointGroup<S> {
    /// Group name
    pub name: String,
    /// Operations in definition order
    pub operations: Vec<Operation<S>>,
}

/// Middleware declared alongside the router.
#[derive(Debug, Clone)]
pub struct MiddlewareDecl {
    /// Middleware name
    pub name: String,
    /// Group names it applies to; empty means all groups
    pub applies_to: Vec<String>,
}

/// An in-memory router module ready for extraction.
#[derive(Debug, Clone)]
pub struct RouterModule<S> {
    /// Endpoint groups in definition order
    pub groups: Vec<EndpointGroup<S>>,
    /// Middleware declarations
    pub middleware: Vec<MiddlewareDecl>,
}

impl<'a> RouterModule<JsonSchema<'a>> {
    /// Resolve the router inside a loaded module value.
    ///
    /// The router is looked up under the common export keys (`router`,
    /// `appRouter`, `contract`); a module that is itself shaped as endpoint
    /// groups is accepted directly.
    pub fn from_value(module: &'a Value) -> ExtractResult<Self> {
        let root = module.as_object().ok_or(ExtractError::RouterNotFound)?;

        let router_value = ROUTER_KEYS
            .iter()
            .filter_map(|key| root.get(*key))
            .find(|v| v.is_object());

        let groups = match router_value {
            Some(router) => parse_groups(router)?,
            // Without an explicit export key, anything that does not parse
            // as endpoint groups means there is no router here.
            None => parse_groups(module).map_err(|_| ExtractError::RouterNotFound)?,
        };
        if groups.is_empty() {
            return Err(ExtractError::RouterNotFound);
        }

        let middleware = root
            .get("middleware")
            .and_then(Value::as_array)
            .map(|m| parse_middleware(m))
            .unwrap_or_default();

        Ok(Self { groups, middleware })
    }
}

fn parse_groups(router: &Value) -> ExtractResult<Vec<EndpointGroup<JsonSchema<'_>>>> {
    let router_obj = router.as_object().ok_or(ExtractError::RouterNotFound)?;

    let mut groups = Vec::new();
    for (group_name, group_value) in router_obj {
        if group_name == "middleware" {
            continue;
        }
        let operations_obj =
            group_value
                .as_object()
                .ok_or_else(|| ExtractError::MalformedModule {
                    detail: format!("endpoint group '{group_name}' is not an object"),
                })?;

        let mut operations = Vec::new();
        for (op_name, op_value) in operations_obj {
            let op_obj = op_value
                .as_object()
                .ok_or_else(|| ExtractError::MalformedModule {
                    detail: format!("operation '{group_name}.{op_name}' is not an object"),
                })?;
            let input = op_obj
                .get("input")
                .ok_or_else(|| ExtractError::MalformedModule {
                    detail: format!("operation '{group_name}.{op_name}' has no input schema"),
                })?;
            let output = op_obj
                .get("output")
                .ok_or_else(|| ExtractError::MalformedModule {
                    detail: format!("operation '{group_name}.{op_name}' has no output schema"),
                })?;
            let kind = match op_obj.get("type").and_then(Value::as_str) {
                Some("query") => Some(OperationKind::Query),
                Some("mutation") => Some(OperationKind::Mutation),
                _ => None,
            };
            operations.push(Operation {
                name: op_name.clone(),
                kind,
                input: JsonSchema::new(input),
                output: JsonSchema::new(output),
            });
        }
        groups.push(EndpointGroup {
            name: group_name.clone(),
            operations,
        });
    }
    Ok(groups)
}

fn parse_middleware(entries: &[Value]) -> Vec<MiddlewareDecl> {
    entries
        .iter()
        .filter_map(|entry| {
            let name = entry.get("name")?.as_str()?.to_string();
            let applies_to = entry
                .get("appliesTo")
                .and_then(Value::as_array)
                .map(|groups| {
                    groups
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            Some(MiddlewareDecl { name, applies_to })
        })
        .collect()
}

/// Extract a [`ContractDefinition`] from a JSON module value.
///
/// Convenience for [`RouterModule::from_value`] followed by [`extract`].
pub fn extract_from_value(module: &Value) -> ExtractResult<ContractDefinition> {
    let router = RouterModule::from_value(module)?;
    extract(&router)
}

/// Extract a [`ContractDefinition`] from a router module.
pub fn extract<S: SchemaSource>(module: &RouterModule<S>) -> ExtractResult<ContractDefinition> {
    if module.groups.is_empty() {
        return Err(ExtractError::RouterNotFound);
    }

    let mut registry = TypeRegistry::default();
    let mut routers = Vec::with_capacity(module.groups.len());
    let mut endpoints = Vec::new();

    for group in &module.groups {
        let mut router = Router {
            name: group.name.clone(),
            endpoints: Vec::with_capacity(group.operations.len()),
        };
        for operation in &group.operations {
            let full_name = format!("{}.{}", group.name, operation.name);
            let kind = operation
                .kind
                .ok_or_else(|| ExtractError::MissingOperationType {
                    endpoint: full_name.clone(),
                })?;

            let base = format!(
                "{}{}",
                group.name.to_case(Case::Pascal),
                operation.name.to_case(Case::Pascal)
            );
            let input = registry.convert(
                &operation.input,
                &format!("{full_name}.input"),
                &format!("{base}Input"),
            )?;
            let output = registry.convert(
                &operation.output,
                &format!("{full_name}.output"),
                &format!("{base}Output"),
            )?;

            router.endpoints.push(full_name.clone());
            endpoints.push(Endpoint {
                name: operation.name.clone(),
                kind,
                input,
                output,
                full_name,
            });
        }
        routers.push(router);
    }

    let middleware = module
        .middleware
        .iter()
        .map(|decl| MiddlewareDefinition {
            name: decl.name.clone(),
            applies_to: decl.applies_to.clone(),
        })
        .collect();

    let contract = ContractDefinition {
        routers,
        types: registry.types,
        endpoints,
        middleware,
    };
    debug!(
        endpoints = contract.endpoints.len(),
        types = contract.types.len(),
        routers = contract.routers.len(),
        "extracted contract definition"
    );
    Ok(contract)
}

/// Naming state for the types collected during one extraction run.
#[derive(Default)]
struct TypeRegistry {
    types: Vec<TypeDefinition>,
    used_names: HashSet<String>,
}

impl TypeRegistry {
    /// Recursively convert a schema into a type reference, registering
    /// every object type it contains.
    ///
    /// `path` is the canonical diagnostic path of the node; `hint` is the
    /// PascalCase naming context used when an inline object needs a
    /// synthesized name.
    fn convert<S: SchemaSource>(
        &mut self,
        schema: &S,
        path: &str,
        hint: &str,
    ) -> ExtractResult<TypeReference> {
        let shape = schema
            .classify()
            .ok_or_else(|| ExtractError::UnclassifiableSchema {
                path: path.to_string(),
            })?;

        let ty = match shape {
            SchemaShape::Primitive(base) => TypeReference::primitive(base),
            SchemaShape::Date => TypeReference::date(),
            SchemaShape::Enum(values) => TypeReference::enumeration(values),
            SchemaShape::Literal(value) => TypeReference::literal(value),
            SchemaShape::Array(element) => {
                let element_path = format!("{path}[]");
                let element_hint = format!("{hint}Item");
                TypeReference::array(self.convert(&element, &element_path, &element_hint)?)
            }
            SchemaShape::Union(branches) => {
                let mut converted = Vec::with_capacity(branches.len());
                for (i, branch) in branches.iter().enumerate() {
                    let branch_path = format!("{path}[{i}]");
                    let branch_hint = format!("{hint}Variant{i}");
                    converted.push(self.convert(branch, &branch_path, &branch_hint)?);
                }
                TypeReference::union(converted)
            }
            SchemaShape::Tuple(elements) => {
                let mut converted = Vec::with_capacity(elements.len());
                for (i, element) in elements.iter().enumerate() {
                    let element_path = format!("{path}[{i}]");
                    let element_hint = format!("{hint}Element{i}");
                    converted.push(self.convert(element, &element_path, &element_hint)?);
                }
                TypeReference::tuple(converted)
            }
            SchemaShape::Record { key, value } => {
                let key_ty = match &key {
                    Some(key) => {
                        self.convert(key, &format!("{path}.key"), &format!("{hint}Key"))?
                    }
                    None => TypeReference::primitive(PrimitiveType::String),
                };
                let value_ty =
                    self.convert(&value, &format!("{path}.value"), &format!("{hint}Value"))?;
                TypeReference::record(key_ty, value_ty)
            }
            SchemaShape::Optional(inner) => {
                TypeReference::optional(self.convert(&inner, path, hint)?)
            }
            SchemaShape::Nullable(inner) => {
                TypeReference::nullable(self.convert(&inner, path, hint)?)
            }
            SchemaShape::Object(fields) => self.convert_object(schema, fields, path, hint)?,
        };

        Ok(match schema.constraints() {
            Some(rules) => ty.with_validation(rules),
            None => ty,
        })
    }

    fn convert_object<S: SchemaSource>(
        &mut self,
        schema: &S,
        fields: Vec<FieldSchema<S>>,
        path: &str,
        hint: &str,
    ) -> ExtractResult<TypeReference> {
        // A declared name is reused as-is on repeat encounters; inline
        // objects get a deterministic, collision-free synthesized name.
        let (name, fresh) = match schema.type_name() {
            Some(declared) => {
                let fresh = self.used_names.insert(declared.clone());
                (declared, fresh)
            }
            None => (self.claim_synthesized(hint), true),
        };

        let mut properties = Vec::with_capacity(fields.len());
        for field in fields {
            let field_path = format!("{path}.{}", field.name);
            let field_hint = format!("{name}{}", field.name.to_case(Case::Pascal));

            // An optional-wrapped field schema becomes a non-required
            // property of the inner type; the wrapper is not kept.
            let (field_ty, required) = match field.schema.classify() {
                Some(SchemaShape::Optional(inner)) => {
                    (self.convert(&inner, &field_path, &field_hint)?, false)
                }
                _ => (
                    self.convert(&field.schema, &field_path, &field_hint)?,
                    field.required,
                ),
            };

            let mut property = Property::new(field.name, field_ty).with_required(required);
            // Rules declared directly on the field move to the property;
            // object types keep theirs so the registered definition stays
            // identical to the embedded tree.
            if !matches!(property.ty.shape, TypeShape::Object(_)) {
                if let Some(rules) = property.ty.validation.take() {
                    property.validation = Some(rules);
                }
            }
            properties.push(property);
        }

        let ty = TypeReference::object(properties).with_name(name.clone());
        if fresh {
            trace!(%name, %path, "registered object type");
            self.types.push(TypeDefinition {
                name,
                ty: ty.clone(),
            });
        }
        Ok(ty)
    }

    fn claim_synthesized(&mut self, hint: &str) -> String {
        if self.used_names.insert(hint.to_string()) {
            return hint.to_string();
        }
        let mut counter = 2;
        loop {
            let candidate = format!("{hint}{counter}");
            if self.used_names.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contract_ir::{TypeKind, ValidationRules};

    /// Hand-built schema objects exercising the extractor without any
    /// schema library behind it.
    #[derive(Debug, Clone)]
    enum FakeSchema {
        String(Option<ValidationRules>),
        Integer,
        Object {
            name: Option<&'static str>,
            fields: Vec<(&'static str, FakeSchema, bool)>,
        },
        Array(Box<FakeSchema>),
        Optional(Box<FakeSchema>),
        Nullable(Box<FakeSchema>),
        Broken,
    }

    impl SchemaSource for FakeSchema {
        fn classify(&self) -> Option<SchemaShape<Self>> {
            match self {
                FakeSchema::String(_) => {
                    Some(SchemaShape::Primitive(PrimitiveType::String))
                }
                FakeSchema::Integer => Some(SchemaShape::Primitive(PrimitiveType::Integer)),
                FakeSchema::Object { fields, .. } => Some(SchemaShape::Object(
                    fields
                        .iter()
                        .map(|(name, schema, required)| {
                            FieldSchema::new(*name, schema.clone()).with_required(*required)
                        })
                        .collect(),
                )),
                FakeSchema::Array(element) => {
                    Some(SchemaShape::Array(element.as_ref().clone()))
                }
                FakeSchema::Optional(inner) => {
                    Some(SchemaShape::Optional(inner.as_ref().clone()))
                }
                FakeSchema::Nullable(inner) => {
                    Some(SchemaShape::Nullable(inner.as_ref().clone()))
                }
                FakeSchema::Broken => None,
            }
        }

        fn constraints(&self) -> Option<ValidationRules> {
            match self {
                FakeSchema::String(rules) => rules.clone(),
                _ => None,
            }
        }

        fn type_name(&self) -> Option<String> {
            match self {
                FakeSchema::Object { name, .. } => name.map(str::to_string),
                _ => None,
            }
        }
    }

    fn single_op_module(input: FakeSchema, output: FakeSchema) -> RouterModule<FakeSchema> {
        RouterModule {
            groups: vec![EndpointGroup {
                name: "users".to_string(),
                operations: vec![Operation {
                    name: "create".to_string(),
                    kind: Some(OperationKind::Mutation),
                    input,
                    output,
                }],
            }],
            middleware: Vec::new(),
        }
    }

    fn empty_object() -> FakeSchema {
        FakeSchema::Object {
            name: None,
            fields: vec![],
        }
    }

    #[test]
    fn test_wrapper_chain_preserved_with_innermost_rules() {
        let input = FakeSchema::Optional(Box::new(FakeSchema::Nullable(Box::new(
            FakeSchema::String(Some(ValidationRules::new().with_min_length(5))),
        ))));
        let contract = extract(&single_op_module(input, empty_object())).expect("extract");

        let endpoint = &contract.endpoints[0];
        assert_eq!(endpoint.full_name, "users.create");
        assert_eq!(endpoint.input.kind(), TypeKind::Optional);

        let nullable = endpoint.input.wrapped().expect("optional inner");
        assert_eq!(nullable.kind(), TypeKind::Nullable);

        let primitive = nullable.wrapped().expect("nullable inner");
        assert_eq!(primitive.kind(), TypeKind::Primitive);
        let rules = primitive.validation.as_ref().expect("innermost rules");
        assert_eq!(rules.min_length, Some(5));

        // The wrappers carry no rules of their own.
        assert!(endpoint.input.validation.is_none());
        assert!(nullable.validation.is_none());
    }

    #[test]
    fn test_field_rules_move_to_property() {
        let input = FakeSchema::Object {
            name: None,
            fields: vec![(
                "nick",
                FakeSchema::String(Some(ValidationRules::new().with_min_length(1))),
                true,
            )],
        };
        let contract = extract(&single_op_module(input, empty_object())).expect("extract");

        let input_ty = &contract.endpoints[0].input;
        let props = match &input_ty.shape {
            TypeShape::Object(props) => props,
            other => panic!("expected object, got {other:?}"),
        };
        let rules = props[0].validation.as_ref().expect("property rules");
        assert_eq!(rules.min_length, Some(1));
        assert!(props[0].ty.validation.is_none());
    }

    #[test]
    fn test_optional_field_unwraps_to_non_required() {
        let input = FakeSchema::Object {
            name: None,
            fields: vec![
                ("id", FakeSchema::Integer, true),
                (
                    "bio",
                    FakeSchema::Optional(Box::new(FakeSchema::String(None))),
                    true,
                ),
            ],
        };
        let contract = extract(&single_op_module(input, empty_object())).expect("extract");

        let props = match &contract.endpoints[0].input.shape {
            TypeShape::Object(props) => props.clone(),
            other => panic!("expected object, got {other:?}"),
        };
        assert!(props[0].required);
        assert!(!props[1].required);
        assert_eq!(props[1].ty.kind(), TypeKind::Primitive);
    }

    #[test]
    fn test_synthesized_names() {
        let input = FakeSchema::Object {
            name: None,
            fields: vec![(
                "address",
                FakeSchema::Object {
                    name: None,
                    fields: vec![("street", FakeSchema::String(None), true)],
                },
                true,
            )],
        };
        let contract = extract(&single_op_module(input, empty_object())).expect("extract");

        // Nested types register before their parent, dependencies first.
        let names: Vec<_> = contract.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "UsersCreateInputAddress",
                "UsersCreateInput",
                "UsersCreateOutput"
            ]
        );
        assert_eq!(
            contract.endpoints[0].input.name.as_deref(),
            Some("UsersCreateInput")
        );
    }

    #[test]
    fn test_named_type_registered_once() {
        let user = FakeSchema::Object {
            name: Some("User"),
            fields: vec![("id", FakeSchema::Integer, true)],
        };
        let module = RouterModule {
            groups: vec![EndpointGroup {
                name: "users".to_string(),
                operations: vec![
                    Operation {
                        name: "get".to_string(),
                        kind: Some(OperationKind::Query),
                        input: empty_object(),
                        output: user.clone(),
                    },
                    Operation {
                        name: "save".to_string(),
                        kind: Some(OperationKind::Mutation),
                        input: user,
                        output: empty_object(),
                    },
                ],
            }],
            middleware: Vec::new(),
        };
        let contract = extract(&module).expect("extract");
        let user_defs = contract.types.iter().filter(|t| t.name == "User").count();
        assert_eq!(user_defs, 1);
    }

    #[test]
    fn test_array_element_paths_and_names() {
        let input = FakeSchema::Array(Box::new(FakeSchema::Object {
            name: None,
            fields: vec![("id", FakeSchema::Integer, true)],
        }));
        let contract = extract(&single_op_module(input, empty_object())).expect("extract");
        assert!(contract
            .types
            .iter()
            .any(|t| t.name == "UsersCreateInputItem"));
    }

    #[test]
    fn test_missing_operation_type_fails() {
        let module = RouterModule {
            groups: vec![EndpointGroup {
                name: "users".to_string(),
                operations: vec![Operation {
                    name: "create".to_string(),
                    kind: None,
                    input: empty_object(),
                    output: empty_object(),
                }],
            }],
            middleware: Vec::new(),
        };
        match extract(&module) {
            Err(ExtractError::MissingOperationType { endpoint }) => {
                assert_eq!(endpoint, "users.create");
            }
            other => panic!("expected missing operation type, got {other:?}"),
        }
    }

    #[test]
    fn test_unclassifiable_schema_fails_with_path() {
        let input = FakeSchema::Object {
            name: None,
            fields: vec![("broken", FakeSchema::Broken, true)],
        };
        match extract(&single_op_module(input, empty_object())) {
            Err(ExtractError::UnclassifiableSchema { path }) => {
                assert_eq!(path, "users.create.input.broken");
            }
            other => panic!("expected unclassifiable schema, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_module_fails() {
        let module: RouterModule<FakeSchema> = RouterModule {
            groups: Vec::new(),
            middleware: Vec::new(),
        };
        assert!(matches!(extract(&module), Err(ExtractError::RouterNotFound)));
    }
}
