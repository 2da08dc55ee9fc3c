use http::Method;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::SpecError;

/// Reference prefix for schemas under `components`.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Media type key the mock server serves from.
pub const APPLICATION_JSON: &str = "application/json";

/// Root of a parsed OpenAPI 3 document.
///
/// Only the subset the mock server consumes is modeled: paths with their
/// per-method operations, response content with examples, and the
/// `components.schemas` table for `$ref` resolution. Everything else in the
/// document is ignored by serde.
///
/// `IndexMap` is used for every mapping whose order matters: named examples
/// are selected by position ("first named example is the default"), so the
/// model must preserve document insertion order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub info: Info,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    #[serde(default)]
    pub components: Components,
}

impl Document {
    /// Resolve a `#/components/schemas/<name>` reference.
    pub fn resolve_ref(&self, ref_path: &str) -> Result<&Schema, SpecError> {
        let key = ref_path.strip_prefix(SCHEMA_REF_PREFIX).unwrap_or(ref_path);
        self.components
            .schemas
            .get(key)
            .ok_or_else(|| SpecError::UnresolvedRef {
                ref_path: ref_path.to_string(),
            })
    }
}

/// The `info` object; only used for logging the served API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: String,
}

/// A path item: one optional operation per supported HTTP method.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    pub get: Option<Operation>,
    pub post: Option<Operation>,
    pub put: Option<Operation>,
    pub patch: Option<Operation>,
    pub delete: Option<Operation>,
}

impl PathItem {
    /// Iterate the declared operations in a fixed method order.
    pub fn operations(&self) -> impl Iterator<Item = (Method, &Operation)> {
        [
            (Method::GET, self.get.as_ref()),
            (Method::POST, self.post.as_ref()),
            (Method::PUT, self.put.as_ref()),
            (Method::PATCH, self.patch.as_ref()),
            (Method::DELETE, self.delete.as_ref()),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.map(|op| (method, op)))
    }
}

/// A single operation under a path item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Operation {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, rename = "requestBody")]
    pub request_body: Option<RequestBody>,
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
}

/// A declared parameter. `location` corresponds to the OpenAPI `in` field.
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub schema: Option<Schema>,
}

impl Parameter {
    pub fn is_query(&self) -> bool {
        self.location == "query"
    }
}

/// Request body: mapping from media type to its content description.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// A response keyed by stringified status code in [`Operation::responses`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// Media type content: a schema, a single example, and/or named examples.
///
/// Named examples keep document order; the first one doubles as the default
/// payload when no `X-Example` header is sent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<Schema>,
    #[serde(default)]
    pub example: Option<Value>,
    #[serde(default)]
    pub examples: IndexMap<String, NamedExample>,
}

/// A named example entry: `examples.<name>.value`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedExample {
    #[serde(default)]
    pub value: Option<Value>,
}

/// The JSON Schema subset that build-time checking walks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Schema {
    #[serde(default, rename = "$ref")]
    pub ref_path: Option<String>,
    #[serde(default, rename = "type")]
    pub schema_type: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub items: Option<Box<Schema>>,
    #[serde(default)]
    pub properties: IndexMap<String, Schema>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub example: Option<Value>,
}

/// Schema components available for `$ref` resolution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,
}
