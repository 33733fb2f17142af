//! Speech synthesis trait for text-to-speech

use async_trait::async_trait;
use crate::error::Result;

/// Trait for turning reply text into MPEG audio
///
/// Implementations:
/// - `ElevenLabsClient`: ElevenLabs text-to-speech API
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with the given voice, returning raw audio bytes
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
