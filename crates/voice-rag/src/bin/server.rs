//! Voice RAG server binary
//!
//! Run with: cargo run -p voice-rag --bin voice-rag-server -- --config voice-rag.toml

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voice_rag::{
    config::RagConfig,
    conversation::DEFAULT_SESSION,
    server::{routes::SESSION_HEADER, RagServer},
};

#[derive(Parser)]
#[command(name = "voice-rag-server", version, about = "Serve spoken and typed RAG answers")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Embedding store to serve (overrides corpus.store_path)
    #[arg(short, long)]
    store: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voice_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Load configuration
    let mut config = RagConfig::load(args.config.as_deref())?;
    if let Some(store) = args.store {
        config.corpus.store_path = store;
    }
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Store: {}", config.corpus.store_path.display());
    tracing::info!("  - Embedding model: {}", config.openai.embed_model);
    tracing::info!("  - Completion model: {}", config.openai.completion_model);
    tracing::info!("  - Similarity threshold: {}", config.conversation.similarity_threshold);
    match config.conversation.history_window() {
        Some(max) => tracing::info!("  - History window: {} messages", max),
        None => tracing::warn!("  - History window: unbounded"),
    }
    match config.conversation.session_capacity() {
        Some(max) => tracing::info!("  - Session limit: {} (least recently used evicted)", max),
        None => tracing::warn!("  - Session limit: unbounded"),
    }
    tracing::info!(
        "  - Requests without {} share the '{}' session and are answered one at a time",
        SESSION_HEADER,
        DEFAULT_SESSION
    );

    // A missing or invalid corpus is fatal
    let server = RagServer::from_config(config)?;

    tracing::info!("Endpoints:");
    tracing::info!("  POST /text     - Ask a typed question");
    tracing::info!("  POST /voice    - Ask a spoken question");
    tracing::info!("  GET  /api/info - Server info");

    server.start().await?;

    Ok(())
}
