// src/schema/mod.rs

//! Structural schema contracts for message bodies
//!
//! Every message kind binds one schema contract that its body must satisfy
//! before the message may be handed to a transport. Contracts are trees of
//! typed nodes with required-property lists, nested object/array definitions,
//! reusable named sub-schemas (`#/definitions/...` references) and closed
//! enumerations: the expressive power of a draft-04 JSON schema subset.
//!
//! Schemas are plain immutable values. Newer versions of a message are
//! derived from older ones with [`extend_schema`], which is additive only:
//! existing required properties are never removed or redefined, so a
//! consumer built against the older shape keeps parsing the common fields.

use crate::error::{Error, Result};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Prefix used for definition references within a schema tree
const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// The primitive shape a schema node accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    Object,
    Array,
    String,
    Integer,
    Boolean,
}

impl SchemaType {
    /// The draft-04 name for this type
    pub fn name(&self) -> &'static str {
        match self {
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
        }
    }
}

/// One node of a schema contract
///
/// Constructed with the builder-style helpers ([`Schema::object`],
/// [`Schema::string`], [`Schema::property`], ...) and never mutated after
/// a message kind hands it out.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Stable identifier of the contract (root nodes only)
    pub id: Option<String>,
    /// Human-readable description of the value
    pub description: Option<String>,
    /// Primitive shape this node accepts
    pub kind: SchemaType,
    /// Whether `null` is also accepted (a `["null", type]` union)
    pub nullable: bool,
    /// Closed set of accepted values, for string nodes
    pub enum_values: Vec<String>,
    /// Optional format hint (e.g. "uri"), informational only
    pub format: Option<String>,
    /// Named child schemas, for object nodes
    pub properties: BTreeMap<String, Schema>,
    /// Property names that must be present, for object nodes
    pub required: Vec<String>,
    /// Element schema, for array nodes
    pub items: Option<Box<Schema>>,
    /// Reference to a reusable definition (`#/definitions/<name>`);
    /// when set, validation resolves against the root's definitions
    pub reference: Option<String>,
    /// Reusable named sub-schemas (root nodes only)
    pub definitions: BTreeMap<String, Schema>,
}

impl Schema {
    fn new(kind: SchemaType, description: &str) -> Self {
        Self {
            id: None,
            description: if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            },
            kind,
            nullable: false,
            enum_values: Vec::new(),
            format: None,
            properties: BTreeMap::new(),
            required: Vec::new(),
            items: None,
            reference: None,
            definitions: BTreeMap::new(),
        }
    }

    /// An object node
    pub fn object(description: &str) -> Self {
        Self::new(SchemaType::Object, description)
    }

    /// A string node
    pub fn string(description: &str) -> Self {
        Self::new(SchemaType::String, description)
    }

    /// An integer node
    pub fn integer(description: &str) -> Self {
        Self::new(SchemaType::Integer, description)
    }

    /// A boolean node
    pub fn boolean(description: &str) -> Self {
        Self::new(SchemaType::Boolean, description)
    }

    /// An array node whose elements satisfy `items`
    pub fn array(description: &str, items: Schema) -> Self {
        let mut schema = Self::new(SchemaType::Array, description);
        schema.items = Some(Box::new(items));
        schema
    }

    /// A reference to a named definition on the root schema
    pub fn reference(name: &str) -> Self {
        let mut schema = Self::new(SchemaType::Object, "");
        schema.reference = Some(format!("{}{}", DEFINITIONS_PREFIX, name));
        schema
    }

    /// Set the contract identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a named property
    pub fn property(mut self, name: &str, schema: Schema) -> Self {
        self.properties.insert(name.to_string(), schema);
        self
    }

    /// Mark property names as required
    pub fn require(mut self, names: &[&str]) -> Self {
        for name in names {
            self.required.push((*name).to_string());
        }
        self
    }

    /// Add a reusable named definition
    pub fn definition(mut self, name: &str, schema: Schema) -> Self {
        self.definitions.insert(name.to_string(), schema);
        self
    }

    /// Restrict accepted values to a closed set
    pub fn enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Also accept `null`
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Attach a format hint
    pub fn format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// Validate a value against this contract
    ///
    /// Walks the value structurally: required properties must be present,
    /// types must match, enumerations must be respected and array elements
    /// must satisfy the item schema. Extra properties are allowed. The
    /// first violation is reported with the JSON path where it occurred.
    pub fn validate(&self, value: &Value) -> Result<()> {
        self.validate_at(self, value, "$")
    }

    fn validate_at(&self, root: &Schema, value: &Value, path: &str) -> Result<()> {
        // References resolve against the root's definitions
        if let Some(reference) = &self.reference {
            let name = reference.strip_prefix(DEFINITIONS_PREFIX).ok_or_else(|| {
                Error::SchemaViolation {
                    path: path.to_string(),
                    reason: format!("unresolvable reference '{}'", reference),
                }
            })?;
            let target = root.definitions.get(name).ok_or_else(|| Error::SchemaViolation {
                path: path.to_string(),
                reason: format!("unknown definition '{}'", name),
            })?;
            return target.validate_at(root, value, path);
        }

        if value.is_null() {
            if self.nullable {
                return Ok(());
            }
            return Err(violation(path, format!("expected {}, found null", self.kind.name())));
        }

        match self.kind {
            SchemaType::Object => {
                let map = value
                    .as_object()
                    .ok_or_else(|| type_mismatch(path, self.kind, value))?;
                for name in &self.required {
                    if !map.contains_key(name) {
                        return Err(violation(
                            path,
                            format!("missing required property '{}'", name),
                        ));
                    }
                }
                for (name, sub) in &self.properties {
                    if let Some(child) = map.get(name) {
                        sub.validate_at(root, child, &format!("{}.{}", path, name))?;
                    }
                }
                Ok(())
            }
            SchemaType::Array => {
                let elements = value
                    .as_array()
                    .ok_or_else(|| type_mismatch(path, self.kind, value))?;
                if let Some(items) = &self.items {
                    for (index, element) in elements.iter().enumerate() {
                        items.validate_at(root, element, &format!("{}[{}]", path, index))?;
                    }
                }
                Ok(())
            }
            SchemaType::String => {
                let text = value
                    .as_str()
                    .ok_or_else(|| type_mismatch(path, self.kind, value))?;
                if !self.enum_values.is_empty()
                    && !self.enum_values.iter().any(|allowed| allowed == text)
                {
                    return Err(violation(
                        path,
                        format!("'{}' is not one of [{}]", text, self.enum_values.join(", ")),
                    ));
                }
                Ok(())
            }
            SchemaType::Integer => {
                if value.as_i64().is_none() && value.as_u64().is_none() {
                    return Err(type_mismatch(path, self.kind, value));
                }
                Ok(())
            }
            SchemaType::Boolean => {
                if !value.is_boolean() {
                    return Err(type_mismatch(path, self.kind, value));
                }
                Ok(())
            }
        }
    }

    /// Render this contract as a draft-04-like JSON object
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        if let Some(id) = &self.id {
            out.insert("id".to_string(), json!(id));
            out.insert(
                "$schema".to_string(),
                json!("http://json-schema.org/draft-04/schema#"),
            );
        }
        if let Some(reference) = &self.reference {
            out.insert("$ref".to_string(), json!(reference));
            return Value::Object(out);
        }
        if let Some(description) = &self.description {
            out.insert("description".to_string(), json!(description));
        }
        if self.nullable {
            out.insert("type".to_string(), json!(["null", self.kind.name()]));
        } else {
            out.insert("type".to_string(), json!(self.kind.name()));
        }
        if !self.enum_values.is_empty() {
            out.insert("enum".to_string(), json!(self.enum_values));
        }
        if let Some(format) = &self.format {
            out.insert("format".to_string(), json!(format));
        }
        if !self.properties.is_empty() {
            let properties: Map<String, Value> = self
                .properties
                .iter()
                .map(|(name, sub)| (name.clone(), sub.to_json()))
                .collect();
            out.insert("properties".to_string(), Value::Object(properties));
        }
        if !self.required.is_empty() {
            out.insert("required".to_string(), json!(self.required));
        }
        if let Some(items) = &self.items {
            out.insert("items".to_string(), items.to_json());
        }
        if !self.definitions.is_empty() {
            let definitions: Map<String, Value> = self
                .definitions
                .iter()
                .map(|(name, sub)| (name.clone(), sub.to_json()))
                .collect();
            out.insert("definitions".to_string(), Value::Object(definitions));
        }
        Value::Object(out)
    }
}

fn violation(path: &str, reason: String) -> Error {
    Error::SchemaViolation {
        path: path.to_string(),
        reason,
    }
}

fn type_mismatch(path: &str, expected: SchemaType, found: &Value) -> Error {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    violation(path, format!("expected {}, found {}", expected.name(), found))
}

/// Additions applied to a base schema by [`extend_schema`]
#[derive(Debug, Clone, Default)]
pub struct SchemaExtension {
    properties: Vec<(String, Schema)>,
    required: Vec<String>,
}

impl SchemaExtension {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property to the extended schema
    pub fn property(mut self, name: &str, schema: Schema) -> Self {
        self.properties.push((name.to_string(), schema));
        self
    }

    /// Mark property names as required in the extended schema
    pub fn require(mut self, names: &[&str]) -> Self {
        for name in names {
            self.required.push((*name).to_string());
        }
        self
    }
}

/// Derive a newer schema from `base` by adding properties and required names
///
/// Additive-only evolution: the result carries every property and required
/// name of `base` unchanged, so a consumer built against `base` keeps
/// parsing the common fields of payloads that satisfy the result. `base`
/// itself is never touched.
pub fn extend_schema(base: &Schema, extension: SchemaExtension) -> Schema {
    let mut schema = base.clone();
    for (name, sub) in extension.properties {
        debug_assert!(
            !schema.required.contains(&name),
            "extension must not redefine required property '{}'",
            name
        );
        schema.properties.insert(name, sub);
    }
    for name in extension.required {
        debug_assert!(
            schema.properties.contains_key(&name),
            "required name '{}' has no property",
            name
        );
        if !schema.required.contains(&name) {
            schema.required.push(name);
        }
    }
    schema
}

/// Return a copy of `base` with the definition `from` renamed to `to`
///
/// References inside the tree are not rewritten; callers re-point the
/// affected `$ref` nodes themselves.
pub fn rename_definition(base: &Schema, from: &str, to: &str) -> Schema {
    let mut schema = base.clone();
    if let Some(definition) = schema.definitions.remove(from) {
        schema.definitions.insert(to.to_string(), definition);
    }
    schema
}
