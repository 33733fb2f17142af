//! OpenAI client for embeddings, completions and transcription
//!
//! One HTTP client is shared by all three capabilities. Requests are never
//! retried; a failed call fails the request that issued it.

use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::config::OpenAiConfig;
use crate::error::{Error, Result};
use crate::types::Message;

use super::completion::CompletionProvider;
use super::embedding::EmbeddingProvider;
use super::transcription::TranscriptionProvider;

/// OpenAI API client
pub struct OpenAiClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: OpenAiConfig,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a [Message],
}

#[derive(Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

impl ResponsesResponse {
    /// Concatenate every `output_text` part of every message item
    fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content.iter())
            .filter(|part| part.kind == "output_text")
            .map(|part| part.text.as_str())
            .collect()
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl OpenAiClient {
    /// Create a new OpenAI client
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn failure_body(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        format!("HTTP {} - {}", status, body)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedRequest {
            model: &self.config.embed_model,
            input: text,
        };

        let response = self
            .client
            .post(self.url("/v1/embeddings"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::embedding(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::embedding(Self::failure_body(response).await));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("Failed to parse embedding response: {}", e)))?;

        embed_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| Error::embedding("Embedding response contained no data"))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let request = ResponsesRequest {
            model: &self.config.completion_model,
            input: messages,
        };

        tracing::info!(
            "Requesting completion with model {} over {} messages",
            self.config.completion_model,
            messages.len()
        );

        let response = self
            .client
            .post(self.url("/v1/responses"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::completion(format!("Completion request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::completion(Self::failure_body(response).await));
        }

        let parsed: ResponsesResponse = response
            .json()
            .await
            .map_err(|e| Error::completion(format!("Failed to parse completion response: {}", e)))?;

        Ok(parsed.output_text())
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.completion_model
    }
}

#[async_trait]
impl TranscriptionProvider for OpenAiClient {
    async fn transcribe(&self, path: &Path) -> Result<String> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.webm".to_string());
        let mime = mime_guess::from_path(path).first_or_octet_stream();

        let part = multipart::Part::bytes(data)
            .file_name(file_name)
            .mime_str(mime.essence_str())
            .map_err(|e| Error::transcription(format!("Invalid audio mime type: {}", e)))?;
        let form = multipart::Form::new()
            .text("model", self.config.transcription_model.clone())
            .part("file", part);

        let response = self
            .client
            .post(self.url("/v1/audio/transcriptions"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::transcription(format!("Transcription request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::transcription(Self::failure_body(response).await));
        }

        let parsed: TranscriptionResponse = response.json().await.map_err(|e| {
            Error::transcription(format!("Failed to parse transcription response: {}", e))
        })?;

        Ok(parsed.text)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
