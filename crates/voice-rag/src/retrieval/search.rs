//! Nearest-document search by cosine similarity

use crate::error::{Error, Result};
use crate::types::Document;

use super::store::EmbeddingStore;

/// Best match for a query embedding
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    /// The matched document
    pub document: &'a Document,
    /// Cosine similarity in [-1, 1]
    pub similarity: f32,
}

impl SearchHit<'_> {
    /// Whether the match clears the injection threshold (strictly above)
    pub fn is_relevant(&self, threshold: f32) -> bool {
        self.similarity > threshold
    }
}

/// Index over an embedding corpus answering nearest-neighbor queries
///
/// Implementations:
/// - `EmbeddingStore`: exact linear scan
pub trait SimilarityIndex: Send + Sync {
    /// Return the single most similar document to `query`
    fn nearest(&self, query: &[f32]) -> Result<SearchHit<'_>>;

    /// Number of indexed documents
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cosine similarity of two equal-length vectors
///
/// Returns 0.0 when either vector has zero magnitude. Accumulates in f64 and
/// clamps to [-1, 1] so rounding never produces an out-of-range score.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "cosine_similarity on vectors of different length");

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0) as f32
}

impl SimilarityIndex for EmbeddingStore {
    /// Linear scan in store order; ties keep the earliest document
    fn nearest(&self, query: &[f32]) -> Result<SearchHit<'_>> {
        if query.len() != self.dimensions() {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                actual: query.len(),
            });
        }

        let mut best: Option<SearchHit<'_>> = None;
        for document in self.documents() {
            let similarity = cosine_similarity(query, &document.embedding);
            match best {
                Some(current) if similarity <= current.similarity => {}
                _ => best = Some(SearchHit { document, similarity }),
            }
        }

        best.ok_or(Error::EmptyStore)
    }

    fn len(&self) -> usize {
        EmbeddingStore::len(self)
    }
}
