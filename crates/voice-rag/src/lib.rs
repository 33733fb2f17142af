//! voice-rag: conversational assistant with retrieval-augmented, spoken answers
//!
//! A small document corpus is embedded offline into a persisted store. At
//! serving time each question (typed, or transcribed from audio) is embedded,
//! matched against the store by cosine similarity, and the best document is
//! injected into the conversation when it is relevant enough. The completion
//! reply is returned as text and as synthesized speech.

pub mod config;
pub mod conversation;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use conversation::{Conversation, SessionStore};
pub use error::{Error, Result};
pub use generation::ResponseOrchestrator;
pub use retrieval::{EmbeddingStore, SimilarityIndex};
pub use types::{AssistantReply, Document, Message, Role};
