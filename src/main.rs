use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

fn main() {
    init_tracing();
    if let Err(err) = mockbird::cli::run_cli() {
        eprintln!("mockbird: {err:#}");
        std::process::exit(1);
    }
}
