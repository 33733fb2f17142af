//! Read-only in-memory embedding store
//!
//! Loaded once at startup from the indexer's output and never mutated.
//! Construction validates that the corpus is non-empty and that every
//! embedding has the same dimensionality.

use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Document;

/// Indexed corpus held in memory for the life of the process
#[derive(Debug, Clone)]
pub struct EmbeddingStore {
    /// Documents in corpus scan order
    documents: Vec<Document>,
    /// Shared embedding dimensionality
    dimensions: usize,
}

impl EmbeddingStore {
    /// Build a store from documents, validating the corpus invariants
    pub fn from_documents(documents: Vec<Document>) -> Result<Self> {
        let first = documents.first().ok_or(Error::EmptyStore)?;
        let dimensions = first.dimensions();
        if dimensions == 0 {
            return Err(Error::store(format!("Document '{}' has an empty embedding", first.id)));
        }

        if let Some(bad) = documents.iter().find(|d| d.dimensions() != dimensions) {
            tracing::error!(
                "Document '{}' has {} dimensions, corpus has {}",
                bad.id,
                bad.dimensions(),
                dimensions
            );
            return Err(Error::DimensionMismatch {
                expected: dimensions,
                actual: bad.dimensions(),
            });
        }

        Ok(Self {
            documents,
            dimensions,
        })
    }

    /// Load the persisted store written by the indexer
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::store(format!("Failed to read {}: {}", path.display(), e)))?;

        let documents: Vec<Document> = serde_json::from_str(&content)
            .map_err(|e| Error::store(format!("Failed to parse {}: {}", path.display(), e)))?;

        let store = Self::from_documents(documents)?;
        tracing::info!(
            "Loaded {} documents ({} dimensions) from {}",
            store.len(),
            store.dimensions,
            path.display()
        );
        Ok(store)
    }

    /// Write the whole store to `path` in one atomic replace
    ///
    /// The JSON is written to a temporary file in the destination directory
    /// and renamed over the target, so readers never observe a partial store.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(&self.documents)?;
        let mut staged = tempfile::NamedTempFile::new_in(dir)?;
        staged.write_all(json.as_bytes())?;
        staged.as_file().sync_all()?;
        staged
            .persist(path)
            .map_err(|e| Error::store(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::info!("Persisted {} documents to {}", self.len(), path.display());
        Ok(())
    }

    /// All documents in store order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Always false for a constructed store
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Embedding dimensionality shared by every document
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}
