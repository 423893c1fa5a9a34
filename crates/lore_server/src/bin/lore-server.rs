//! LoreTogether server - stories with personal choices and community polls.

use clap::Parser;
use lore_server::{ServerConfig, build_state, create_router, init_tracing};
use lore_storage::MemoryStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Command-line arguments for the server.
#[derive(Parser, Debug)]
#[command(name = "lore-server")]
#[command(about = "LoreTogether story and poll server")]
#[command(version)]
struct Args {
    /// Path to server configuration file
    #[arg(short, long, env = "LORE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, overriding configuration
    #[arg(long)]
    bind: Option<String>,

    /// Publish the bundled sample story at start-up
    #[arg(long)]
    seed_sample: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    }
    .with_env_overrides()?;
    if let Some(bind) = args.bind {
        config = config.with_bind_address(bind);
    }
    if args.seed_sample {
        config = config.with_seed_sample(true);
    }

    init_tracing(*config.log_format());
    info!(
        config_file = ?args.config,
        bind = %config.bind_address(),
        marker_strategy = %config.ledger().marker_strategy(),
        "Starting LoreTogether server"
    );

    let store = Arc::new(MemoryStore::new());
    let state = build_state(store, &config).await?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address().as_str()).await?;
    info!(address = %listener.local_addr()?, "Listening");
    axum::serve(listener, app).await?;
    Ok(())
}
