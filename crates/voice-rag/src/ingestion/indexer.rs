//! Offline corpus indexer
//!
//! Turns a directory of source documents into a persisted embedding store:
//! one embedding per document over its full text, written once at the end.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::config::{CorpusConfig, FailurePolicy};
use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::retrieval::EmbeddingStore;
use crate::types::Document;

use super::parser::FileParser;

/// Progress notifications emitted while indexing
#[derive(Debug, Clone)]
pub enum IndexEvent {
    /// Scan finished; `total` documents will be processed
    Started { total: usize },
    /// A document was extracted and embedded
    Indexed { file: String },
    /// A document failed and was skipped
    Skipped { file: String, error: String },
}

/// A document the `Skip` policy left out
#[derive(Debug, Clone)]
pub struct SkippedDocument {
    pub file: String,
    pub error: String,
}

/// Outcome of an indexing run
#[derive(Debug, Clone)]
pub struct IndexReport {
    /// Documents written to the store
    pub indexed: usize,
    /// Documents left out under the `Skip` policy
    pub skipped: Vec<SkippedDocument>,
    /// Shared embedding dimensionality
    pub dimensions: usize,
    /// Where the store was written
    pub store_path: PathBuf,
}

/// Builds the embedding store from a document directory
pub struct CorpusIndexer {
    embedder: Arc<dyn EmbeddingProvider>,
    extensions: Vec<String>,
    policy: FailurePolicy,
}

impl CorpusIndexer {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, config: &CorpusConfig) -> Self {
        Self {
            embedder,
            extensions: config
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            policy: config.failure_policy,
        }
    }

    /// Override the per-document failure policy
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// List the files to index, in file-name order
    pub fn discover(&self, docs_dir: &Path) -> Result<Vec<PathBuf>> {
        if !docs_dir.is_dir() {
            return Err(Error::Config(format!(
                "Document directory not found: {}",
                docs_dir.display()
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(docs_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            if entry.file_type().is_file() && self.matches_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }

    /// Index `docs_dir` and write the store to `store_path`
    pub async fn run(&self, docs_dir: &Path, store_path: &Path) -> Result<IndexReport> {
        self.run_with_progress(docs_dir, store_path, |_| {}).await
    }

    /// Index `docs_dir`, reporting each step to `on_event`
    ///
    /// Under `FailurePolicy::Abort` the first failing document ends the run
    /// before anything is written. Under `FailurePolicy::Skip` it is logged and
    /// left out. Either way the store is written in a single atomic replace,
    /// and never when no document was indexed.
    pub async fn run_with_progress<F>(
        &self,
        docs_dir: &Path,
        store_path: &Path,
        mut on_event: F,
    ) -> Result<IndexReport>
    where
        F: FnMut(IndexEvent),
    {
        let files = self.discover(docs_dir)?;
        tracing::info!(
            "Indexing {} documents from {} (embedder: {}, policy: {:?})",
            files.len(),
            docs_dir.display(),
            self.embedder.name(),
            self.policy
        );
        on_event(IndexEvent::Started { total: files.len() });

        let mut documents = Vec::with_capacity(files.len());
        let mut skipped = Vec::new();

        for path in &files {
            let file = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            match self.index_file(path, &file).await {
                Ok(document) => {
                    tracing::info!("Processed: {}", file);
                    on_event(IndexEvent::Indexed { file });
                    documents.push(document);
                }
                Err(e) if self.policy == FailurePolicy::Skip => {
                    tracing::warn!("Skipping {}: {}", file, e);
                    on_event(IndexEvent::Skipped {
                        file: file.clone(),
                        error: e.to_string(),
                    });
                    skipped.push(SkippedDocument {
                        file,
                        error: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::error!("Indexing aborted at {}: {}", file, e);
                    return Err(e);
                }
            }
        }

        let store = EmbeddingStore::from_documents(documents)?;
        store.persist(store_path)?;

        Ok(IndexReport {
            indexed: store.len(),
            skipped,
            dimensions: store.dimensions(),
            store_path: store_path.to_path_buf(),
        })
    }

    async fn index_file(&self, path: &Path, file: &str) -> Result<Document> {
        let owned = path.to_path_buf();
        let text = tokio::task::spawn_blocking(move || FileParser::extract_text(&owned))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))??;

        let embedding = self.embedder.embed(&text).await?;
        Ok(Document::new(file, text, embedding))
    }
}
