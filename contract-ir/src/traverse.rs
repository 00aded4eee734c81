//! Shared recursive-descent traversal over type reference trees.
//!
//! Both the type mapper and the capability validator rely on this single
//! traversal contract: it visits every reachable [`TypeReference`] exactly
//! once per root call and defines the canonical path-naming scheme used in
//! diagnostics and nested-type synthesis. Keeping one implementation
//! guarantees that diagnostics and generated type names refer to the same
//! locations.
//!
//! # Path scheme
//!
//! | Position | Path |
//! |----------|------|
//! | Property `p` | `path.p` |
//! | Array element | `path[]` |
//! | Union/tuple member `i` | `path[i]` |
//! | Record key / value | `path.key` / `path.value` |
//! | Optional/nullable inner | `path` (pass-through) |

use crate::types::{Property, TypeReference, TypeShape};

/// Walk a type reference tree, invoking `visit` for every reachable node.
///
/// `visit` receives the node's canonical path, the node itself, and the
/// [`Property`] that owns it when the node is a field's direct type (so
/// consumers can see field-level validation). Wrapper inners are visited at
/// the same path as the wrapper.
pub fn walk<'a, F>(root: &'a TypeReference, root_path: &str, visit: &mut F)
where
    F: FnMut(&str, &'a TypeReference, Option<&'a Property>),
{
    walk_node(root, root_path, None, visit);
}

fn walk_node<'a, F>(
    ty: &'a TypeReference,
    path: &str,
    property: Option<&'a Property>,
    visit: &mut F,
) where
    F: FnMut(&str, &'a TypeReference, Option<&'a Property>),
{
    visit(path, ty, property);

    match &ty.shape {
        TypeShape::Object(properties) => {
            for prop in properties {
                let child_path = format!("{path}.{}", prop.name);
                walk_node(&prop.ty, &child_path, Some(prop), visit);
            }
        }
        TypeShape::Array(element) => {
            let child_path = format!("{path}[]");
            walk_node(element, &child_path, None, visit);
        }
        TypeShape::Union(branches) | TypeShape::Tuple(branches) => {
            for (i, branch) in branches.iter().enumerate() {
                let child_path = format!("{path}[{i}]");
                walk_node(branch, &child_path, None, visit);
            }
        }
        TypeShape::Record { key, value } => {
            let key_path = format!("{path}.key");
            walk_node(key, &key_path, None, visit);
            let value_path = format!("{path}.value");
            walk_node(value, &value_path, None, visit);
        }
        TypeShape::Optional(inner) | TypeShape::Nullable(inner) => {
            walk_node(inner, path, None, visit);
        }
        TypeShape::Primitive(_)
        | TypeShape::Enum(_)
        | TypeShape::Literal(_)
        | TypeShape::Date => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EnumValue, LiteralValue, PrimitiveType, Property, TypeReference};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn string() -> TypeReference {
        TypeReference::primitive(PrimitiveType::String)
    }

    fn number() -> TypeReference {
        TypeReference::primitive(PrimitiveType::Number)
    }

    /// Structural node count, implemented independently of `walk`.
    fn node_count(ty: &TypeReference) -> usize {
        1 + match &ty.shape {
            TypeShape::Object(props) => props.iter().map(|p| node_count(&p.ty)).sum(),
            TypeShape::Array(el) => node_count(el),
            TypeShape::Union(ts) | TypeShape::Tuple(ts) => ts.iter().map(node_count).sum(),
            TypeShape::Record { key, value } => node_count(key) + node_count(value),
            TypeShape::Optional(inner) | TypeShape::Nullable(inner) => node_count(inner),
            TypeShape::Primitive(_)
            | TypeShape::Enum(_)
            | TypeShape::Literal(_)
            | TypeShape::Date => 0,
        }
    }

    #[test]
    fn test_path_scheme() {
        let root = TypeReference::object(vec![
            Property::new("name", string()),
            Property::new("tags", TypeReference::array(string())),
            Property::new("choice", TypeReference::union(vec![string(), number()])),
            Property::new("meta", TypeReference::record(string(), number())),
            Property::new("pair", TypeReference::tuple(vec![string(), number()])),
            Property::new(
                "nick",
                TypeReference::optional(TypeReference::nullable(string())),
            ),
        ]);

        let mut paths = Vec::new();
        walk(&root, "User", &mut |path, _, _| paths.push(path.to_string()));

        assert_eq!(
            paths,
            vec![
                "User",
                "User.name",
                "User.tags",
                "User.tags[]",
                "User.choice",
                "User.choice[0]",
                "User.choice[1]",
                "User.meta",
                "User.meta.key",
                "User.meta.value",
                "User.pair",
                "User.pair[0]",
                "User.pair[1]",
                // wrappers pass through at the field's path
                "User.nick",
                "User.nick",
                "User.nick",
            ]
        );
    }

    #[test]
    fn test_property_association() {
        let root = TypeReference::object(vec![Property::new(
            "nick",
            TypeReference::optional(string()),
        )]);

        let mut seen = Vec::new();
        walk(&root, "User", &mut |path, ty, prop| {
            seen.push((path.to_string(), ty.kind(), prop.is_some()));
        });

        // Only the field's direct node carries the property; the wrapped
        // inner does not.
        assert_eq!(seen[1].2, true);
        assert_eq!(seen[2].2, false);
        assert_eq!(seen[1].0, seen[2].0);
    }

    #[test]
    fn test_visits_every_node_exactly_once() {
        let root = TypeReference::object(vec![
            Property::new(
                "items",
                TypeReference::array(TypeReference::object(vec![
                    Property::new("id", string()),
                    Property::new("when", TypeReference::date()),
                ])),
            ),
            Property::new(
                "status",
                TypeReference::enumeration(vec![EnumValue::String("ok".to_string())]),
            ),
            Property::new(
                "version",
                TypeReference::literal(LiteralValue::Number(1.0)),
            ),
        ]);

        let expected = node_count(&root);
        let mut visited: HashSet<*const TypeReference> = HashSet::new();
        let mut visits = 0usize;
        walk(&root, "Root", &mut |_, ty, _| {
            visits += 1;
            assert!(visited.insert(ty as *const _), "node visited twice");
        });
        assert_eq!(visits, expected);
        assert_eq!(visits, 8);
    }

    fn arb_type() -> impl Strategy<Value = TypeReference> {
        let leaf = prop_oneof![
            Just(TypeReference::date()),
            Just(TypeReference::primitive(PrimitiveType::String)),
            Just(TypeReference::primitive(PrimitiveType::Integer)),
            Just(TypeReference::enumeration(vec![EnumValue::String(
                "a".to_string()
            )])),
            Just(TypeReference::literal(LiteralValue::Boolean(true))),
        ];
        leaf.prop_recursive(4, 48, 4, |inner| {
            prop_oneof![
                inner.clone().prop_map(TypeReference::array),
                inner.clone().prop_map(TypeReference::optional),
                inner.clone().prop_map(TypeReference::nullable),
                prop::collection::vec(inner.clone(), 1..4).prop_map(TypeReference::union),
                prop::collection::vec(inner.clone(), 1..4).prop_map(TypeReference::tuple),
                (inner.clone(), inner.clone())
                    .prop_map(|(k, v)| TypeReference::record(k, v)),
                prop::collection::vec(inner, 0..4).prop_map(|types| {
                    TypeReference::object(
                        types
                            .into_iter()
                            .enumerate()
                            .map(|(i, ty)| Property::new(format!("f{i}"), ty))
                            .collect(),
                    )
                }),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_walk_visits_each_node_once(ty in arb_type()) {
            let expected = node_count(&ty);
            let mut visited: HashSet<*const TypeReference> = HashSet::new();
            let mut visits = 0usize;
            let mut duplicated = false;
            walk(&ty, "root", &mut |_, node, _| {
                visits += 1;
                if !visited.insert(node as *const _) {
                    duplicated = true;
                }
            });
            prop_assert!(!duplicated, "a node was visited more than once");
            prop_assert_eq!(visits, expected);
        }
    }
}
