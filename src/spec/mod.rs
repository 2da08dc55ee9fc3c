//! # Spec Module
//!
//! OpenAPI 3 document model, loader, and build-time schema checking.
//!
//! The mock server consumes a small subset of OpenAPI 3: paths, per-method
//! operations, declared parameters, and response content with `example` /
//! `examples` payloads. This module parses that subset from YAML or JSON and
//! validates the pieces the dispatch engine relies on. Mapping order from
//! the document is preserved everywhere it is observable (named examples,
//! path declaration order).

mod load;
mod schema;
mod types;

pub use load::load_document;
pub use schema::{check_schema, SpecError};
pub use types::{
    Components, Document, Info, MediaType, NamedExample, Operation, Parameter, PathItem,
    RequestBody, Response, Schema, APPLICATION_JSON, SCHEMA_REF_PREFIX,
};
