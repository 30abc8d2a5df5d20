use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use frost::config::Config;
use frost::server::{ServerState, listener};

#[derive(Parser, Debug)]
#[command(name = "frost")]
#[command(about = "Rate-limited static file server")]
struct Cli {
    /// Directory to serve
    root: PathBuf,

    /// Optional YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => Config::from_yaml_file(path)?,
        None => Config::load()?,
    };
    cfg.static_files.root = std::path::absolute(&cli.root)?;

    let state = Arc::new(ServerState::new(cfg)?);

    tracing::info!("Serving directory: {}", state.root.display());
    tracing::info!(
        "Server running on http://{}:{} (worker setting {}, one task per connection)",
        state.config.server.host,
        state.config.server.port,
        state.config.server.max_workers
    );
    tracing::info!(
        "Rate limit: {} requests per {:?} per client",
        state.limiter.limit(),
        state.limiter.window()
    );
    tracing::info!("Press Ctrl+C to stop");

    tokio::select! {
        res = listener::run(state) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
