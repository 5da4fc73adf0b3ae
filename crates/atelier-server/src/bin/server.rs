//! Atelier Server Binary

use anyhow::Result;
use atelier_server::{Server, ServerConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first: the log filter falls back to the configured
    // level when RUST_LOG is unset.
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    info!("Starting Atelier Server v{}", env!("CARGO_PKG_VERSION"));

    let server = Server::new(config);
    server.run().await?;

    info!("Server shutdown complete");
    Ok(())
}
