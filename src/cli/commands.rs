use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::dispatcher::{build_index, Dispatcher};
use crate::server::MockService;
use crate::spec::load_document;

#[derive(Parser)]
#[command(name = "mockbird")]
#[command(about = "Mock HTTP server driven by an OpenAPI 3 specification", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve mock responses for an OpenAPI document
    Serve {
        /// Path to the OpenAPI document (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Listen port; falls back to MOCKBIRD_PORT, then 8080
        #[arg(short, long)]
        port: Option<String>,
    },
}

pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { spec, port } => serve(spec, port),
    }
}

fn serve(spec: PathBuf, port: Option<String>) -> anyhow::Result<()> {
    let config = Config::new(spec, port)?;
    let doc = load_document(&config.spec_path)?;
    let index = build_index(&doc)?;
    info!(
        title = %doc.info.title,
        version = %doc.info.version,
        variants = index.len(),
        "handler index built"
    );

    let service = MockService::new(Dispatcher::new(index));
    let addr = config.listen_addr();
    let handle = service
        .start(&addr)
        .map_err(|e| anyhow::anyhow!("failed to bind {addr}: {e}"))?;
    handle
        .join()
        .map_err(|e| anyhow::anyhow!("server error: {e:?}"))?;
    Ok(())
}
