//! JSON-value schema source.
//!
//! Backs the [`SchemaSource`] interface with a `serde_json::Value` dialect:
//! the JSON-schema-style vocabulary (`type`, `properties`, `required`,
//! `items`, `prefixItems`, `additionalProperties`, `propertyNames`, `enum`,
//! `const`, `format`, bound keywords) plus explicit `optional`/`nullable`/
//! `date` wrappers, a node-level `nullable` flag, and the `anyOf`-with-null
//! sugar many schema projections emit for nullable values.

use contract_ir::{EnumValue, LiteralValue, PrimitiveType, ValidationRules};
use serde_json::Value;

use super::{FieldSchema, SchemaShape, SchemaSource};

/// A borrowed view over a JSON schema value.
#[derive(Debug, Clone, Copy)]
pub struct JsonSchema<'a> {
    value: &'a Value,
    // Set while classifying the inner half of a node-level `nullable` flag,
    // so the flag is consumed exactly once.
    skip_nullable_flag: bool,
}

impl<'a> JsonSchema<'a> {
    /// Wrap a JSON value as a schema source.
    pub fn new(value: &'a Value) -> Self {
        Self {
            value,
            skip_nullable_flag: false,
        }
    }

    /// The underlying JSON value.
    pub fn value(&self) -> &'a Value {
        self.value
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.value.get(key)
    }

    fn type_tag(&self) -> Option<&'a str> {
        self.get("type").and_then(Value::as_str)
    }

    fn classify_object(&self) -> Option<SchemaShape<Self>> {
        if let Some(props) = self.get("properties").and_then(Value::as_object) {
            let required: Vec<&str> = self
                .get("required")
                .and_then(Value::as_array)
                .map(|names| names.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();

            let fields = props
                .iter()
                .map(|(name, schema)| {
                    FieldSchema::new(name.clone(), JsonSchema::new(schema))
                        .with_required(required.contains(&name.as_str()))
                })
                .collect();
            return Some(SchemaShape::Object(fields));
        }

        if let Some(value) = self.get("additionalProperties").filter(|v| v.is_object()) {
            let key = self
                .get("propertyNames")
                .filter(|v| v.is_object())
                .map(JsonSchema::new);
            return Some(SchemaShape::Record {
                key,
                value: JsonSchema::new(value),
            });
        }

        Some(SchemaShape::Object(Vec::new()))
    }

    fn classify_array(&self) -> Option<SchemaShape<Self>> {
        if let Some(elements) = self.tuple_elements() {
            return Some(SchemaShape::Tuple(elements));
        }
        let items = self.get("items").filter(|v| v.is_object())?;
        Some(SchemaShape::Array(JsonSchema::new(items)))
    }

    fn tuple_elements(&self) -> Option<Vec<Self>> {
        let elements = self
            .get("prefixItems")
            .and_then(Value::as_array)
            .or_else(|| self.get("items").and_then(Value::as_array))?;
        Some(elements.iter().map(JsonSchema::new).collect())
    }

    fn classify_branches(&self, branches: &'a [Value]) -> SchemaShape<Self> {
        if branches.len() == 2 {
            let null_pos = branches
                .iter()
                .position(|b| b.get("type").and_then(Value::as_str) == Some("null"));
            if let Some(pos) = null_pos {
                return SchemaShape::Nullable(JsonSchema::new(&branches[1 - pos]));
            }
        }
        SchemaShape::Union(branches.iter().map(JsonSchema::new).collect())
    }
}

impl SchemaSource for JsonSchema<'_> {
    fn classify(&self) -> Option<SchemaShape<Self>> {
        if !self.value.is_object() {
            return None;
        }

        if !self.skip_nullable_flag && self.get("nullable").and_then(Value::as_bool) == Some(true)
        {
            return Some(SchemaShape::Nullable(Self {
                value: self.value,
                skip_nullable_flag: true,
            }));
        }

        if let Some(values) = self.get("enum").and_then(Value::as_array) {
            let members: Option<Vec<EnumValue>> = values
                .iter()
                .map(|v| match v {
                    Value::String(s) => Some(EnumValue::String(s.clone())),
                    Value::Number(n) => n.as_f64().map(EnumValue::Number),
                    _ => None,
                })
                .collect();
            return members.map(SchemaShape::Enum);
        }

        if let Some(value) = self.get("const") {
            let literal = match value {
                Value::String(s) => Some(LiteralValue::String(s.clone())),
                Value::Number(n) => n.as_f64().map(LiteralValue::Number),
                Value::Bool(b) => Some(LiteralValue::Boolean(*b)),
                _ => None,
            };
            return literal.map(SchemaShape::Literal);
        }

        if let Some(branches) = self
            .get("anyOf")
            .or_else(|| self.get("oneOf"))
            .and_then(Value::as_array)
        {
            return Some(self.classify_branches(branches));
        }

        match self.type_tag()? {
            "object" => self.classify_object(),
            "array" => self.classify_array(),
            "tuple" => self.tuple_elements().map(SchemaShape::Tuple),
            "record" => {
                let value = self.get("value").filter(|v| v.is_object())?;
                let key = self.get("key").filter(|v| v.is_object()).map(JsonSchema::new);
                Some(SchemaShape::Record {
                    key,
                    value: JsonSchema::new(value),
                })
            }
            "optional" => {
                let inner = self.get("of").filter(|v| v.is_object())?;
                Some(SchemaShape::Optional(JsonSchema::new(inner)))
            }
            "nullable" => {
                let inner = self.get("of").filter(|v| v.is_object())?;
                Some(SchemaShape::Nullable(JsonSchema::new(inner)))
            }
            "string" => {
                let format = self.get("format").and_then(Value::as_str);
                if matches!(format, Some("date-time") | Some("datetime")) {
                    Some(SchemaShape::Primitive(PrimitiveType::DateTime))
                } else {
                    Some(SchemaShape::Primitive(PrimitiveType::String))
                }
            }
            "number" => Some(SchemaShape::Primitive(PrimitiveType::Number)),
            "integer" => Some(SchemaShape::Primitive(PrimitiveType::Integer)),
            "boolean" => Some(SchemaShape::Primitive(PrimitiveType::Boolean)),
            "uuid" => Some(SchemaShape::Primitive(PrimitiveType::Uuid)),
            "email" => Some(SchemaShape::Primitive(PrimitiveType::Email)),
            "datetime" => Some(SchemaShape::Primitive(PrimitiveType::DateTime)),
            "date" => Some(SchemaShape::Date),
            _ => None,
        }
    }

    fn constraints(&self) -> Option<ValidationRules> {
        let mut rules = ValidationRules::new();

        if let Some(n) = self.get("minLength").and_then(Value::as_u64) {
            rules.min_length = Some(n as usize);
        }
        if let Some(n) = self.get("maxLength").and_then(Value::as_u64) {
            rules.max_length = Some(n as usize);
        }
        if let Some(pattern) = self.get("pattern").and_then(Value::as_str) {
            rules.regex = Some(pattern.to_string());
        }
        if self.type_tag() == Some("string") {
            match self.get("format").and_then(Value::as_str) {
                Some("email") => rules.email = true,
                Some("uuid") => rules.uuid = true,
                Some("uri") | Some("url") => rules.url = true,
                _ => {}
            }
        }

        // Integer projections from some schema libraries drop declared
        // numeric bounds once an integer check is applied; bounds are read
        // only when present and never reconstructed.
        if let Some(n) = self.get("minimum").and_then(Value::as_f64) {
            rules.min = Some(n);
        }
        if let Some(n) = self.get("maximum").and_then(Value::as_f64) {
            rules.max = Some(n);
        }
        if let Some(n) = self.get("exclusiveMinimum").and_then(Value::as_f64) {
            if n == 0.0 {
                rules.positive = true;
            } else {
                rules.min = Some(n);
            }
        }
        if let Some(n) = self.get("exclusiveMaximum").and_then(Value::as_f64) {
            if n == 0.0 {
                rules.negative = true;
            } else {
                rules.max = Some(n);
            }
        }
        if self.type_tag() == Some("integer") {
            rules.int = true;
        }

        if let Some(n) = self.get("minItems").and_then(Value::as_u64) {
            rules.min_items = Some(n as usize);
        }
        if let Some(n) = self.get("maxItems").and_then(Value::as_u64) {
            rules.max_items = Some(n as usize);
        }

        if rules.is_empty() {
            None
        } else {
            Some(rules)
        }
    }

    fn type_name(&self) -> Option<String> {
        self.get("title")
            .or_else(|| self.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
