//! Command line interface.

mod commands;

pub use commands::{run_cli, Cli, Commands};
