//! Configuration for the voice RAG system

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main voice RAG configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// OpenAI configuration (embeddings, completion, transcription)
    #[serde(default)]
    pub openai: OpenAiConfig,
    /// Speech synthesis configuration
    #[serde(default)]
    pub speech: SpeechConfig,
    /// Corpus indexing and store configuration
    #[serde(default)]
    pub corpus: CorpusConfig,
    /// Conversation and retrieval configuration
    #[serde(default)]
    pub conversation: ConversationConfig,
}

impl RagConfig {
    /// Load configuration from an optional TOML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                toml::from_str(&raw).map_err(|e| {
                    Error::Config(format!("Invalid config {}: {}", path.display(), e))
                })?
            }
            None => Self::default(),
        };

        config.apply_env();
        Ok(config)
    }

    /// Override credentials and port from the process environment
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.openai.api_key = key;
        }
        if let Ok(key) = std::env::var("ELEVENLABS_API_KEY") {
            self.speech.api_key = key;
        }
        if let Ok(voice) = std::env::var("ELEVENLABS_VOICE_ID") {
            self.speech.voice_id = voice;
        }
        if let Ok(port) = std::env::var("VOICE_RAG_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid VOICE_RAG_PORT: {}", port),
            }
        }
    }

    /// Check the settings a serving process cannot run without
    pub fn validate(&self) -> Result<()> {
        if self.openai.api_key.is_empty() {
            return Err(Error::Config("OpenAI API key is not set (OPENAI_API_KEY)".to_string()));
        }
        if self.speech.api_key.is_empty() {
            return Err(Error::Config(
                "Speech API key is not set (ELEVENLABS_API_KEY)".to_string(),
            ));
        }
        if self.speech.voice_id.is_empty() {
            return Err(Error::Config(
                "Speech voice id is not set (ELEVENLABS_VOICE_ID)".to_string(),
            ));
        }
        self.conversation.validate()
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum audio upload size in bytes (default: 25MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            max_upload_size: 25 * 1024 * 1024, // 25MB
        }
    }
}

/// OpenAI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API base URL
    pub base_url: String,
    /// API key (usually supplied through OPENAI_API_KEY)
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// Embedding model name
    pub embed_model: String,
    /// Completion model name
    pub completion_model: String,
    /// Transcription model name
    pub transcription_model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            embed_model: "text-embedding-3-small".to_string(),
            completion_model: "gpt-4.1-mini".to_string(),
            transcription_model: "gpt-4o-mini-transcribe".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Speech synthesis (ElevenLabs) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// API base URL
    pub base_url: String,
    /// API key (usually supplied through ELEVENLABS_API_KEY)
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// Voice identifier used for every reply
    pub voice_id: String,
    /// Voice stability setting
    pub stability: f32,
    /// Voice similarity boost setting
    pub similarity_boost: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".to_string(),
            api_key: String::new(),
            voice_id: String::new(),
            stability: 0.75,
            similarity_boost: 0.75,
            timeout_secs: 60,
        }
    }
}

/// What the indexer does when a single document fails
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Abort the whole run; nothing is written
    #[default]
    Abort,
    /// Log the failure, skip the document, keep going
    Skip,
}

/// Corpus indexing and store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Directory holding the source documents
    pub docs_dir: PathBuf,
    /// Path of the persisted embedding store
    pub store_path: PathBuf,
    /// File extensions picked up by the indexer (lowercase, no dot)
    pub extensions: Vec<String>,
    /// Per-document failure handling
    pub failure_policy: FailurePolicy,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            store_path: PathBuf::from("embeddings.json"),
            extensions: vec!["pdf".to_string()],
            failure_policy: FailurePolicy::Abort,
        }
    }
}

/// Conversation and retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Persona seeded as the first system message of every conversation
    pub system_prompt: String,
    /// A match is injected only when its similarity is strictly above this
    pub similarity_threshold: f32,
    /// Header placed before the matched document text in the context message
    pub context_prefix: String,
    /// Sliding-window bound on messages per conversation (0 = unbounded)
    pub max_messages: usize,
    /// Live sessions kept before the least recently used is dropped (0 = unbounded)
    pub max_sessions: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            system_prompt: "You are an intelligent assistant. You may use the loaded documents \
                            when they are relevant, but you can also answer general questions."
                .to_string(),
            similarity_threshold: 0.7,
            context_prefix: "Relevant document information:".to_string(),
            max_messages: 64,
            max_sessions: 1024,
        }
    }
}

impl ConversationConfig {
    /// Message window of each conversation, `None` when unbounded
    pub fn history_window(&self) -> Option<usize> {
        (self.max_messages > 0).then_some(self.max_messages)
    }

    /// Session registry capacity, `None` when unbounded
    pub fn session_capacity(&self) -> Option<usize> {
        (self.max_sessions > 0).then_some(self.max_sessions)
    }

    fn validate(&self) -> Result<()> {
        if !(-1.0..=1.0).contains(&self.similarity_threshold) {
            return Err(Error::Config(format!(
                "similarity_threshold must be within [-1, 1], got {}",
                self.similarity_threshold
            )));
        }
        if let Some(max) = self.history_window() {
            // persona + user + context + assistant for a single turn
            if max < 4 {
                return Err(Error::Config(format!(
                    "max_messages must be at least 4, got {}",
                    max
                )));
            }
        }
        Ok(())
    }
}
