//! # Dispatcher Module
//!
//! The request dispatch engine: the handler index built from the OpenAPI
//! document, the pagination decoder, and the runtime resolution protocol
//! that picks a handler variant per request.
//!
//! Per incoming request the engine walks templates matching the concrete
//! path and applies, in order: example-header match, parent-collection item
//! lookup, POST-append, pagination, default. The index is shared behind a
//! reader-writer lock; the two mutating rules commit under the write lock.

mod engine;
mod index;
pub mod pagination;

pub use engine::{DispatchRequest, Dispatcher, MockResponse};
pub use index::{as_object_array, build_index, HandlerIndex, Variant};
