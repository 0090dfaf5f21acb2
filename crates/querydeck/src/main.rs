use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use querydeck::Server;

/// Local SQL query dashboard server.
#[derive(Parser)]
#[command(name = "querydeck", version, about)]
struct Cli {
    /// Workspace directory holding the config, database and SQL library.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Override the configured server port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("querydeck=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut server = match Server::new(cli.root, cli.port).await {
        Ok(server) => server,
        Err(error) => {
            tracing::error!(%error, "failed to start server");
            std::process::exit(1);
        }
    };
    tracing::info!("listening on http://{}", server.addr());

    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to wait for shutdown signal");
    }
    if let Err(error) = server.shutdown() {
        tracing::warn!(%error, "shutdown signal not delivered");
    }
}
