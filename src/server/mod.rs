//! # Server Module
//!
//! HTTP transport built on `may_minihttp` and the `may` coroutine runtime.
//!
//! The transport is deliberately thin: it parses the request, honors the
//! `X-Set-Status-Code: 500` debug short-circuit, strips the trailing slash,
//! hands the rest to the dispatch engine, and JSON-encodes whatever comes
//! back. Startup is a method on [`MockService`] itself, which returns a
//! [`ServerHandle`] for readiness probing and shutdown. Requests run on
//! independent coroutines; all shared state lives in the dispatcher's
//! locked index.

pub mod request;
pub mod response;
pub mod service;

pub use request::{parse_request, ParsedRequest};
pub use service::{MockService, ServerHandle};
