pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod router;
pub mod server;
pub mod spec;

pub use config::Config;
pub use dispatcher::{build_index, DispatchRequest, Dispatcher, HandlerIndex, MockResponse, Variant};
pub use spec::{load_document, Document, SpecError};
