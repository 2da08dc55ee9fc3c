use http::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

use super::index::{as_object_array, HandlerIndex, Variant};
use super::pagination::{self, Page};
use crate::router::path;

/// One incoming request, as seen by the dispatch engine.
///
/// The transport has already stripped the trailing slash from `path` and
/// extracted the `X-Example` header (empty string when absent).
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub example: String,
    pub body: Option<Value>,
}

/// The engine's answer: a status code and an optional JSON payload.
///
/// `body: None` means the transport writes no body at all; `Some(Null)` is
/// JSON-encoded as `null` like any other payload.
#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl MockResponse {
    fn from_variant(variant: &Variant) -> Self {
        Self {
            status: variant.status,
            body: Some(variant.payload.clone()),
        }
    }
}

/// Outcome of the read-locked scan. Mutating outcomes are committed under
/// the write lock afterwards.
enum Resolution {
    Respond(MockResponse),
    Materialize { concrete: String, entry: Value },
    Append { template: String },
    NotFound,
}

/// Request dispatcher over the shared handler index.
///
/// Dispatch runs in two phases: a scan under the read lock that either
/// produces a response or a mutation plan, and a commit under the write
/// lock for the two mutating rules (parent-collection materialization,
/// POST-append). The commit revalidates against the index so concurrent
/// requests never lose an appended element or observe a torn variant list.
#[derive(Clone)]
pub struct Dispatcher {
    index: Arc<RwLock<HandlerIndex>>,
}

impl Dispatcher {
    pub fn new(index: HandlerIndex) -> Self {
        Self {
            index: Arc::new(RwLock::new(index)),
        }
    }

    /// Shared handle to the underlying index, mainly for tests.
    pub fn index(&self) -> Arc<RwLock<HandlerIndex>> {
        Arc::clone(&self.index)
    }

    /// Resolve a request to a response, or `None` for 404.
    pub fn dispatch(&self, req: &DispatchRequest) -> Option<MockResponse> {
        let resolution = {
            let index = self.index.read().unwrap();
            resolve(&index, req)
        };

        match resolution {
            Resolution::Respond(response) => Some(response),
            Resolution::NotFound => None,
            Resolution::Materialize { concrete, entry } => {
                Some(self.commit_materialize(req, concrete, entry))
            }
            Resolution::Append { template } => self.commit_append(req, &template),
        }
    }

    /// Append the materialized item variant under the concrete path.
    ///
    /// Another request may have materialized the same item between the scan
    /// and this commit; in that case the existing variant wins.
    fn commit_materialize(&self, req: &DispatchRequest, concrete: String, entry: Value) -> MockResponse {
        let mut index = self.index.write().unwrap();
        if let Some(existing) = index
            .variants(&concrete)
            .and_then(|vs| vs.iter().find(|v| v.method == req.method))
        {
            return MockResponse::from_variant(existing);
        }

        debug!(path = %concrete, "materialized item variant from parent collection");
        index.insert(
            &concrete,
            Variant {
                template: concrete.clone(),
                method: req.method.clone(),
                query_params: HashSet::new(),
                example: None,
                status: 200,
                payload: entry.clone(),
            },
        );
        MockResponse {
            status: 200,
            body: Some(entry),
        }
    }

    /// Append the decoded request body to the sibling GET collection.
    ///
    /// Decode failures were logged upstream; the element falls back to
    /// `null`, mirroring the best-effort append semantics.
    fn commit_append(&self, req: &DispatchRequest, template: &str) -> Option<MockResponse> {
        let element = match &req.body {
            Some(value @ Value::Object(_)) => value.clone(),
            Some(other) => {
                warn!(
                    path = %req.path,
                    kind = %json_kind(other),
                    "request body is not a JSON object; appending null"
                );
                Value::Null
            }
            None => Value::Null,
        };

        let mut index = self.index.write().unwrap();
        let variants = index.variants_mut(template)?;
        for variant in variants.iter_mut() {
            if variant.method == Method::GET && as_object_array(&variant.payload).is_some() {
                if let Value::Array(items) = &mut variant.payload {
                    items.push(element.clone());
                }
                debug!(template, "appended element to collection");
                return Some(MockResponse {
                    status: 201,
                    body: Some(element),
                });
            }
        }
        None
    }
}

/// The resolution protocol. First rule that produces a result wins:
/// example-header match, parent-collection item lookup, POST-append,
/// pagination, default.
fn resolve(index: &HandlerIndex, req: &DispatchRequest) -> Resolution {
    for template in index.matching_templates(&req.path) {
        let Some(variants) = index.variants(&template) else {
            continue;
        };

        // Rule 1: a named-example variant selected by the X-Example header
        // wins over everything else, pagination included.
        for variant in variants.iter().filter(|v| v.method == req.method) {
            if let Some(name) = &variant.example {
                if !name.is_empty() && *name == req.example {
                    return Resolution::Respond(MockResponse::from_variant(variant));
                }
            }
        }

        // Rules 2-5 apply to the first variant with a matching method; one
        // of them always produces a result, so templates further down the
        // scan are only reached when no method matched here.
        if let Some(variant) = variants.iter().find(|v| v.method == req.method) {
            if path::last_segment_is_param(&template) && variant.payload.is_null() {
                if let Some(resolution) = lookup_parent_item(index, req, &template) {
                    return resolution;
                }
            }

            if req.method == Method::POST && has_get_collection(variants) {
                return Resolution::Append {
                    template: template.clone(),
                };
            }

            let (page, err) = pagination::decode(&req.query);
            if let Some(e) = err {
                warn!(path = %req.path, error = %e, "pagination parameters failed to parse");
            }
            if page.found {
                if let Some(items) = as_object_array(&variant.payload) {
                    return Resolution::Respond(paginate(items, page));
                }
            }

            return Resolution::Respond(MockResponse::from_variant(variant));
        }
    }

    Resolution::NotFound
}

/// Rule 2: search the parent template's collection for an entry whose `id`
/// equals the concrete path's last segment.
///
/// The scan stops at the first same-method parent variant holding an array
/// of objects: a hit materializes, a miss terminates the whole dispatch
/// with "not found" rather than falling through to other templates.
fn lookup_parent_item(
    index: &HandlerIndex,
    req: &DispatchRequest,
    template: &str,
) -> Option<Resolution> {
    let parent_variants = index.variants(path::parent(template))?;
    let wanted_id = path::last_segment(&req.path);

    for parent in parent_variants.iter().filter(|v| v.method == req.method) {
        let Some(items) = as_object_array(&parent.payload) else {
            continue;
        };
        let found = items
            .iter()
            .find(|item| item.get("id").and_then(Value::as_str) == Some(wanted_id));
        return Some(match found {
            Some(entry) => Resolution::Materialize {
                concrete: req.path.clone(),
                entry: entry.clone(),
            },
            None => Resolution::NotFound,
        });
    }
    None
}

fn has_get_collection(variants: &[Variant]) -> bool {
    variants
        .iter()
        .any(|v| v.method == Method::GET && as_object_array(&v.payload).is_some())
}

/// Rule 4: slice the collection. Negative bounds clamp to zero; an offset
/// at or past the end yields an empty body.
fn paginate(items: &[Value], page: Page) -> MockResponse {
    let len = items.len() as i64;
    let offset = page.offset.max(0);
    let limit = page.limit.max(0);

    if offset >= len {
        return MockResponse {
            status: 200,
            body: None,
        };
    }

    let end = offset.saturating_add(limit).min(len);
    let slice = items[offset as usize..end as usize].to_vec();
    MockResponse {
        status: 200,
        body: Some(Value::Array(slice)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
