//! Transcription provider trait for speech-to-text

use async_trait::async_trait;
use std::path::Path;
use crate::error::Result;

/// Trait for transcribing a staged audio file to text
///
/// Implementations:
/// - `OpenAiClient`: OpenAI audio transcriptions API (gpt-4o-mini-transcribe)
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Transcribe the audio file at `path`
    async fn transcribe(&self, path: &Path) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
