//! ElevenLabs text-to-speech client

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::config::SpeechConfig;
use crate::error::{Error, Result};

use super::synthesis::SpeechSynthesizer;

/// ElevenLabs API client
pub struct ElevenLabsClient {
    client: Client,
    config: SpeechConfig,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

impl ElevenLabsClient {
    /// Create a new ElevenLabs client
    pub fn new(config: &SpeechConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn speech_url(&self, voice_id: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.config.base_url.trim_end_matches('/'),
            voice_id
        )
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>> {
        let request = SpeechRequest {
            text,
            voice_settings: VoiceSettings {
                stability: self.config.stability,
                similarity_boost: self.config.similarity_boost,
            },
        };

        let response = self
            .client
            .post(self.speech_url(voice_id))
            .header("xi-api-key", &self.config.api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::synthesis(format!("Speech request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::synthesis(format!("HTTP {} - {}", status, body)));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| Error::synthesis(format!("Failed to read speech audio: {}", e)))?;

        tracing::debug!("Synthesized {} bytes of audio", audio.len());
        Ok(audio.to_vec())
    }

    fn name(&self) -> &str {
        "elevenlabs"
    }
}
