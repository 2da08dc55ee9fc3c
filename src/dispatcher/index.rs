use http::Method;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashSet;

use crate::router::path;
use crate::spec::{check_schema, Document, MediaType, Operation, SpecError, APPLICATION_JSON};

/// One row of the route table: a response the server is prepared to return
/// for some (method, example-selector) combination under a template path.
#[derive(Debug, Clone)]
pub struct Variant {
    /// Template path the variant was declared under (or the concrete path,
    /// for variants materialized by parent-collection lookup).
    pub template: String,
    /// HTTP method of the operation.
    pub method: Method,
    /// Names of parameters the operation declared with `in: query`.
    pub query_params: HashSet<String>,
    /// Selector: `None` for the default variant, `Some(name)` for a variant
    /// selectable via the `X-Example` request header.
    pub example: Option<String>,
    /// Declared status code.
    pub status: u16,
    /// Opaque response payload. `Value::Null` stands for "no payload
    /// declared", which is what enables parent-collection lookup.
    pub payload: Value,
}

impl Variant {
    fn new(
        template: &str,
        method: Method,
        query_params: HashSet<String>,
        example: Option<String>,
        status: u16,
        payload: Value,
    ) -> Self {
        Self {
            template: template.to_string(),
            method,
            query_params,
            example,
            status,
            payload,
        }
    }
}

/// Test for the one payload shape the dispatch engine cares about: an
/// ordered sequence of string-keyed mappings.
///
/// Null elements are tolerated because a failed POST-append decode appends
/// one; the collection stays usable afterwards.
pub fn as_object_array(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) if items.iter().all(|v| v.is_object() || v.is_null()) => Some(items),
        _ => None,
    }
}

/// The route table: template path → ordered variants.
///
/// Built once at startup and mutated only by POST-append (in place, on a
/// variant payload) and by parent-collection materialization (appending a
/// new entry keyed by the concrete path). Insertion order is significant on
/// both levels.
#[derive(Debug, Clone, Default)]
pub struct HandlerIndex {
    entries: IndexMap<String, Vec<Variant>>,
}

impl HandlerIndex {
    /// Append a variant under its template path, preserving insertion order.
    pub fn insert(&mut self, template: &str, variant: Variant) {
        self.entries
            .entry(template.to_string())
            .or_default()
            .push(variant);
    }

    pub fn variants(&self, template: &str) -> Option<&Vec<Variant>> {
        self.entries.get(template)
    }

    pub fn variants_mut(&mut self, template: &str) -> Option<&mut Vec<Variant>> {
        self.entries.get_mut(template)
    }

    /// Template paths matching a concrete request path, in dispatch order.
    ///
    /// Lookup is a linear scan since templates contain placeholders. The
    /// order is deterministic: fewest placeholder segments first, insertion
    /// order as the tie-break, so a literal `/users/me` beats `/users/{id}`.
    pub fn matching_templates(&self, concrete: &str) -> Vec<String> {
        let mut matched: Vec<(usize, usize, &String)> = self
            .entries
            .keys()
            .enumerate()
            .filter(|(_, template)| path::matches(concrete, template.as_str()))
            .map(|(idx, template)| (path::param_count(template), idx, template))
            .collect();
        matched.sort_unstable_by_key(|&(params, idx, _)| (params, idx));
        matched
            .into_iter()
            .map(|(_, _, template)| template.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn templates(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }
}

/// Build the handler index from an OpenAPI document.
///
/// For every `(path, method)` operation, one variant is emitted per
/// response status and per named example, in document order:
///
/// * no `application/json` content → a single variant with a null payload;
/// * named examples present → a default variant carrying the first named
///   example's value, then one selectable variant per named example;
/// * otherwise → a single variant carrying the `example` value (possibly
///   null).
///
/// Example values pass through unchanged; schemas are only checked, never
/// used to synthesize data.
pub fn build_index(doc: &Document) -> Result<HandlerIndex, SpecError> {
    let mut index = HandlerIndex::default();
    for (raw_path, item) in &doc.paths {
        let template = path::strip_trailing_slash(raw_path);
        for (method, operation) in item.operations() {
            add_operation(doc, &mut index, template, method, operation)?;
        }
    }
    Ok(index)
}

fn add_operation(
    doc: &Document,
    index: &mut HandlerIndex,
    template: &str,
    method: Method,
    operation: &Operation,
) -> Result<(), SpecError> {
    let query_params: HashSet<String> = operation
        .parameters
        .iter()
        .filter(|p| p.is_query())
        .map(|p| p.name.clone())
        .collect();

    if let Some(body) = &operation.request_body {
        if let Some(media) = body.content.get(APPLICATION_JSON) {
            if let Some(schema) = &media.schema {
                check_schema(doc, schema)?;
            }
        }
    }

    for (code, response) in &operation.responses {
        let status: u16 = code.parse().map_err(|_| SpecError::InvalidStatus {
            code: code.clone(),
        })?;

        let Some(media) = response.content.get(APPLICATION_JSON) else {
            index.insert(
                template,
                Variant::new(
                    template,
                    method.clone(),
                    query_params.clone(),
                    None,
                    status,
                    Value::Null,
                ),
            );
            continue;
        };

        if let Some(schema) = &media.schema {
            check_schema(doc, schema)?;
        }

        if media.examples.is_empty() {
            index.insert(
                template,
                Variant::new(
                    template,
                    method.clone(),
                    query_params.clone(),
                    None,
                    status,
                    media.example.clone().unwrap_or(Value::Null),
                ),
            );
        } else {
            index.insert(
                template,
                Variant::new(
                    template,
                    method.clone(),
                    query_params.clone(),
                    None,
                    status,
                    first_example_value(media),
                ),
            );
            for (name, example) in &media.examples {
                index.insert(
                    template,
                    Variant::new(
                        template,
                        method.clone(),
                        query_params.clone(),
                        Some(name.clone()),
                        status,
                        example.value.clone().unwrap_or(Value::Null),
                    ),
                );
            }
        }
    }

    Ok(())
}

fn first_example_value(media: &MediaType) -> Value {
    media
        .examples
        .values()
        .next()
        .and_then(|example| example.value.clone())
        .unwrap_or(Value::Null)
}
