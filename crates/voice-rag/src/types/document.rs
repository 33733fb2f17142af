//! Indexed corpus document

use serde::{Deserialize, Serialize};

/// One indexed source document
///
/// Serialized as `{ "file", "text", "embedding" }`, the record shape of the
/// persisted embedding store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Source file name
    #[serde(rename = "file")]
    pub id: String,
    /// Full extracted text
    pub text: String,
    /// Embedding of the full text
    pub embedding: Vec<f32>,
}

impl Document {
    /// Create a new document
    pub fn new(id: impl Into<String>, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            embedding,
        }
    }

    /// Embedding dimensionality
    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }
}
