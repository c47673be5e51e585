mod cache;
mod config;
mod error;
mod model;
mod server;
mod store;
mod webhook;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cache::DeckCache;
use config::Config;
use server::AppState;
use store::ProposalStore;

const DECK_CACHE_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting proposal viewer");

    let config = Config::from_env()?;
    info!(
        proposals_path = %config.proposals_path.display(),
        bind_addr = %config.bind_addr,
        public_base_url = %config.public_base_url,
        strategy = %config.strategy,
        category_rules = config.category_rules.len(),
        booking = config.booking_url.is_some(),
        "configuration loaded"
    );

    let store = ProposalStore::load(&config.proposals_path)?;
    info!(proposals = store.len().await, "proposals ready");

    let decks = DeckCache::new(config.segmenter(), DECK_CACHE_CAPACITY);
    let bind_addr = config.bind_addr;
    let app = server::build_router(AppState {
        store: Arc::new(store),
        decks: Arc::new(decks),
        config: Arc::new(config),
    });

    let listener = TcpListener::bind(bind_addr).await?;
    info!(listen_addr = %bind_addr, "HTTP server ready");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
