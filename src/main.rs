use std::sync::Arc;

use anyhow::Context;
use bloglist::config::{init_logging, Config};
use bloglist::{BlogStore, FjallStore, MemStore};
use clap::Parser;
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(config.verbose);

    match &config.data_dir {
        Some(path) => {
            info!(path = %path.display(), "opening blog store");
            let store = FjallStore::open(path)
                .with_context(|| format!("failed to open blog store at {}", path.display()))?;
            serve(&config, store).await
        }
        None => {
            warn!("no data directory configured, blogs are kept in memory only");
            serve(&config, MemStore::new()).await
        }
    }
}

async fn serve<S: BlogStore>(config: &Config, store: S) -> anyhow::Result<()> {
    let store = Arc::new(store);
    let app = bloglist::api::router(Arc::clone(&store));

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "server listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    store.close().await.context("failed to close blog store")?;
    info!("blog store closed");

    served.context("server error")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutting down gracefully");
}
