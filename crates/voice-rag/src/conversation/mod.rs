//! Conversation state: message histories and the sessions that own them

pub mod history;
pub mod session;

pub use history::Conversation;
pub use session::{SessionStore, SharedConversation, DEFAULT_SESSION};
