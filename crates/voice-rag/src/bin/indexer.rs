//! Corpus indexer binary
//!
//! Run with: cargo run -p voice-rag --bin voice-rag-indexer -- --docs docs --out embeddings.json

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voice_rag::{
    config::{FailurePolicy, RagConfig},
    ingestion::{CorpusIndexer, IndexEvent},
    providers::OpenAiClient,
};

#[derive(Parser)]
#[command(name = "voice-rag-indexer", version, about = "Embed a document directory into a store")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of source documents (overrides corpus.docs_dir)
    #[arg(short, long)]
    docs: Option<PathBuf>,

    /// Output store path (overrides corpus.store_path)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Skip documents that fail instead of aborting the run
    #[arg(long)]
    skip_failed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voice_rag=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = RagConfig::load(args.config.as_deref())?;
    if let Some(docs) = args.docs {
        config.corpus.docs_dir = docs;
    }
    if let Some(out) = args.out {
        config.corpus.store_path = out;
    }
    if args.skip_failed {
        config.corpus.failure_policy = FailurePolicy::Skip;
    }
    if config.openai.api_key.is_empty() {
        anyhow::bail!("OPENAI_API_KEY is not set");
    }

    let embedder = Arc::new(OpenAiClient::new(&config.openai)?);
    let indexer = CorpusIndexer::new(embedder, &config.corpus);

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let report = indexer
        .run_with_progress(&config.corpus.docs_dir, &config.corpus.store_path, |event| {
            match event {
                IndexEvent::Started { total } => progress.set_length(total as u64),
                IndexEvent::Indexed { file } => {
                    progress.set_message(file);
                    progress.inc(1);
                }
                IndexEvent::Skipped { file, error } => {
                    progress.println(format!("{} {}: {}", style("skipped").yellow(), file, error));
                    progress.inc(1);
                }
            }
        })
        .await;
    progress.finish_and_clear();

    let report = report?;
    println!(
        "{} {} documents ({} dimensions) -> {}",
        style("Indexed").green().bold(),
        report.indexed,
        report.dimensions,
        report.store_path.display()
    );
    if !report.skipped.is_empty() {
        println!("{} {} documents", style("Skipped").yellow().bold(), report.skipped.len());
    }

    Ok(())
}
