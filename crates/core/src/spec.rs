//! OpenAPI document structs for serde deserialization.
//!
//! Only the subset the lowering pass reads is modelled. Maps are
//! insertion-ordered so paths, schemas and properties are visited in the
//! order the document declares them.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::Result;

/// Root OpenAPI document.
#[derive(Debug, Default, Deserialize)]
pub struct OpenApiSpec {
    /// Path templates mapped to their operations.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Reusable components.
    pub components: Option<Components>,
}

/// Components section containing reusable schemas.
#[derive(Debug, Default, Deserialize)]
pub struct Components {
    /// Named component schemas.
    pub schemas: Option<IndexMap<String, Schema>>,
}

/// A path item containing operations for different HTTP methods.
#[derive(Debug, Default, Deserialize)]
pub struct PathItem {
    /// `GET` operation.
    pub get: Option<Operation>,
    /// `PUT` operation.
    pub put: Option<Operation>,
    /// `POST` operation.
    pub post: Option<Operation>,
    /// `DELETE` operation.
    pub delete: Option<Operation>,
    /// `OPTIONS` operation.
    pub options: Option<Operation>,
    /// `HEAD` operation.
    pub head: Option<Operation>,
    /// `PATCH` operation.
    pub patch: Option<Operation>,
    /// `TRACE` operation.
    pub trace: Option<Operation>,
    /// Path-level parameters shared by all operations.
    pub parameters: Option<Vec<Parameter>>,
}

/// An API operation (endpoint).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Declared `operationId`, normalized during lowering.
    pub operation_id: Option<String>,
    /// One-line summary.
    pub summary: Option<String>,
    /// Declared tags; empty or absent means the sentinel tag.
    pub tags: Option<Vec<String>>,
    /// Operation-level parameters.
    pub parameters: Option<Vec<Parameter>>,
    /// Request body.
    pub request_body: Option<RequestBody>,
    /// Responses keyed by status code.
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
    /// Deprecation flag.
    #[serde(default)]
    pub deprecated: bool,
}

/// A parameter (query, path, header or cookie).
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    /// Name as it appears on the wire.
    pub name: String,
    /// The `in` field.
    #[serde(rename = "in")]
    pub location: String,
    /// Whether the parameter must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Value schema.
    pub schema: Option<Schema>,
}

/// A request body definition.
#[derive(Debug, Default, Deserialize)]
pub struct RequestBody {
    /// Whether the body must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Content keyed by media type.
    pub content: Option<IndexMap<String, MediaType>>,
}

/// A response definition.
#[derive(Debug, Default, Deserialize)]
pub struct Response {
    /// Human readable description.
    pub description: Option<String>,
    /// Content keyed by media type.
    pub content: Option<IndexMap<String, MediaType>>,
}

/// Media type content (e.g., application/json).
#[derive(Debug, Default, Deserialize)]
pub struct MediaType {
    /// Payload schema.
    pub schema: Option<Schema>,
}

/// JSON Schema definition used in OpenAPI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// The type of the schema (string, number, integer, boolean, object, array).
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,

    /// Reference to another schema.
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    /// Properties for object types.
    pub properties: Option<IndexMap<String, Schema>>,

    /// Required property names for object types.
    pub required: Option<Vec<String>>,

    /// Item schema for array types.
    pub items: Option<Box<Schema>>,

    /// Enum values (strings, numbers, booleans or null).
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<serde_json::Value>>,

    /// Additional properties for object types (for Record/dict types).
    pub additional_properties: Option<AdditionalProperties>,

    /// Intersection (all of these schemas).
    pub all_of: Option<Vec<Schema>>,

    /// Union type (any of these schemas).
    pub any_of: Option<Vec<Schema>>,

    /// Union type (exactly one of these schemas).
    pub one_of: Option<Vec<Schema>>,

    /// Format hint (e.g., date-time, uuid).
    pub format: Option<String>,

    /// OpenAPI 3.0 nullable flag (3.1 uses type arrays instead).
    pub nullable: Option<bool>,
}

/// Schema type can be a single type or an array of types (for nullable).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    /// `"type": "string"`
    Single(String),
    /// `"type": ["string", "null"]`
    Multiple(Vec<String>),
}

/// Additional properties can be a boolean or a schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `true` allows any extra key, `false` forbids them.
    Bool(bool),
    /// Extra keys map to values of this schema.
    Schema(Box<Schema>),
}

impl OpenApiSpec {
    /// Parse an OpenAPI document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse an OpenAPI document from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a document, picking the format from its first non-blank character.
    pub fn parse(source: &str) -> Result<Self> {
        if source.trim_start().starts_with('{') {
            Self::from_json(source)
        } else {
            Self::from_yaml(source)
        }
    }

    /// Component schemas in declaration order (empty when absent).
    pub fn schemas(&self) -> impl Iterator<Item = (&String, &Schema)> {
        self.components
            .iter()
            .filter_map(|c| c.schemas.as_ref())
            .flat_map(|schemas| schemas.iter())
    }

    /// Component schema by name.
    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.components.as_ref()?.schemas.as_ref()?.get(name)
    }

    /// Follow `$ref` chains to the first schema that is not a reference.
    ///
    /// Returns `None` for dangling or cyclic references.
    pub fn resolve<'a>(&'a self, schema: &'a Schema) -> Option<&'a Schema> {
        let mut current = schema;
        let mut hops = 0;
        while let Some(ref_path) = current.ref_path.as_deref() {
            hops += 1;
            if hops > MAX_REF_HOPS {
                return None;
            }
            current = self.schema(ref_to_type_name(ref_path))?;
        }
        Some(current)
    }
}

/// Longest `$ref` chain followed before giving up on a cycle.
const MAX_REF_HOPS: usize = 32;

impl Schema {
    /// The first non-null type name, looking through nullable unions.
    pub fn primary_type(&self) -> Option<&str> {
        match &self.schema_type {
            Some(SchemaType::Single(t)) => Some(t.as_str()),
            Some(SchemaType::Multiple(types)) => {
                types.iter().map(String::as_str).find(|t| *t != "null")
            }
            None => self
                .any_of
                .iter()
                .chain(self.one_of.iter())
                .flatten()
                .find_map(|s| s.primary_type().filter(|t| *t != "null")),
        }
    }

    /// Check if this schema is nullable (contains null in anyOf, type array, or nullable flag).
    pub fn is_nullable(&self) -> bool {
        if self.nullable == Some(true) {
            return true;
        }

        if let Some(any_of) = &self.any_of
            && any_of
                .iter()
                .any(|s| matches!(&s.schema_type, Some(SchemaType::Single(t)) if t == "null"))
        {
            return true;
        }

        matches!(
            &self.schema_type,
            Some(SchemaType::Multiple(types)) if types.iter().any(|t| t == "null")
        )
    }

    /// Referenced component name, if this schema (or a single-member
    /// wrapper around it) is a `$ref`.
    pub fn ref_name(&self) -> Option<&str> {
        if let Some(ref_path) = &self.ref_path {
            return Some(ref_to_type_name(ref_path));
        }
        self.any_of
            .iter()
            .chain(self.one_of.iter())
            .chain(self.all_of.iter())
            .flatten()
            .find_map(|s| s.ref_name())
    }
}

/// Strip the `#/components/schemas/` prefix from a reference.
pub fn ref_to_type_name(ref_path: &str) -> &str {
    ref_path
        .strip_prefix("#/components/schemas/")
        .unwrap_or(ref_path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_keep_declaration_order() {
        let spec = OpenApiSpec::from_json(
            r#"{ "paths": { "/z": {}, "/a": {}, "/m": {} } }"#,
        )
        .unwrap();
        let paths: Vec<_> = spec.paths.keys().map(String::as_str).collect();
        assert_eq!(paths, ["/z", "/a", "/m"]);
    }

    #[test]
    fn test_parse_yaml() {
        let spec = OpenApiSpec::parse(
            "openapi: 3.0.0\npaths:\n  /orders:\n    get:\n      operationId: listOrders\n      tags: [Orders]\n",
        )
        .unwrap();
        let op = spec.paths["/orders"].get.as_ref().unwrap();
        assert_eq!(op.operation_id.as_deref(), Some("listOrders"));
        assert_eq!(op.tags.as_deref(), Some(&["Orders".to_string()][..]));
    }

    #[test]
    fn test_primary_type_looks_through_nullable() {
        let schema: Schema =
            serde_json::from_str(r#"{ "anyOf": [{ "type": "null" }, { "type": "integer" }] }"#)
                .unwrap();
        assert_eq!(schema.primary_type(), Some("integer"));
        assert!(schema.is_nullable());

        let schema: Schema = serde_json::from_str(r#"{ "type": ["string", "null"] }"#).unwrap();
        assert_eq!(schema.primary_type(), Some("string"));
        assert!(schema.is_nullable());
    }

    #[test]
    fn test_ref_name() {
        let schema: Schema =
            serde_json::from_str(r##"{ "$ref": "#/components/schemas/Course" }"##).unwrap();
        assert_eq!(schema.ref_name(), Some("Course"));
    }

    #[test]
    fn test_resolve_follows_ref_chains() {
        let spec = OpenApiSpec::from_json(
            r##"{ "components": { "schemas": {
                "ItemId": { "$ref": "#/components/schemas/RawId" },
                "RawId": { "type": "integer", "format": "int64" },
                "Loop": { "$ref": "#/components/schemas/Loop" }
            } } }"##,
        )
        .unwrap();
        let id: Schema =
            serde_json::from_str(r##"{ "$ref": "#/components/schemas/ItemId" }"##).unwrap();
        assert_eq!(spec.resolve(&id).and_then(Schema::primary_type), Some("integer"));

        let looped: Schema =
            serde_json::from_str(r##"{ "$ref": "#/components/schemas/Loop" }"##).unwrap();
        assert!(spec.resolve(&looped).is_none());

        let dangling: Schema =
            serde_json::from_str(r##"{ "$ref": "#/components/schemas/Missing" }"##).unwrap();
        assert!(spec.resolve(&dangling).is_none());
    }
}
