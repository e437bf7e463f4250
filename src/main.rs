use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use commentsmith::cli::Cli;
use commentsmith::config::Config;
use commentsmith::core::Engine;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())?;

    // RUST_LOG wins over both the flag and the config file
    let level = if cli.verbose { "debug" } else { config.logging.level.as_str() };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Commentsmith v{}", env!("CARGO_PKG_VERSION"));

    let engine = Engine::new(config);
    cli.execute(engine).await
}
