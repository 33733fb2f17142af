//! Completion provider trait for generating assistant replies

use async_trait::async_trait;
use crate::error::Result;
use crate::types::Message;

/// Trait for chat-style completion over a full message history
///
/// Implementations:
/// - `OpenAiClient`: OpenAI responses API (gpt-4.1-mini)
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate the next assistant reply for the given history
    ///
    /// Messages are submitted in order; role order decides what the model
    /// treats as instruction versus dialogue.
    async fn complete(&self, messages: &[Message]) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
