//! # Router Module
//!
//! Pure string logic for template paths (`/users/{id}`-style patterns).
//! The handler index keys on these templates and the dispatch engine calls
//! into [`path`] for every matching decision.

pub mod path;
