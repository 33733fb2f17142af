//! Core types for the voice RAG system

pub mod document;
pub mod message;
pub mod response;

pub use document::Document;
pub use message::{Message, Role};
pub use response::{AssistantReply, ErrorBody, TextRequest};
