//! Embedding store and similarity search

pub mod search;
pub mod store;

pub use search::{cosine_similarity, SearchHit, SimilarityIndex};
pub use store::EmbeddingStore;
