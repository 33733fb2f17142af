//! Application state for the voice RAG server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::conversation::SessionStore;
use crate::error::Result;
use crate::generation::{OrchestratorSettings, Providers, ResponseOrchestrator};
use crate::providers::{ElevenLabsClient, OpenAiClient};
use crate::retrieval::EmbeddingStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Question → answer → speech pipeline
    orchestrator: ResponseOrchestrator,
    /// Per-session conversations
    sessions: SessionStore,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create state around an already-built orchestrator
    ///
    /// The state starts not ready; the server flips it once it is listening.
    pub fn new(config: RagConfig, orchestrator: ResponseOrchestrator) -> Self {
        let sessions = SessionStore::new(&config.conversation);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                orchestrator,
                sessions,
                ready: RwLock::new(false),
            }),
        }
    }

    /// Build the production state: load the corpus and wire the network clients
    ///
    /// Fails when the store is missing, malformed, empty or of mixed
    /// dimensionality; the server must not start without a valid corpus.
    pub fn from_config(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing voice RAG application state...");

        let store = Arc::new(EmbeddingStore::load(&config.corpus.store_path)?);

        let openai = Arc::new(OpenAiClient::new(&config.openai)?);
        tracing::info!(
            "OpenAI client initialized (embeddings: {}, completion: {}, transcription: {})",
            config.openai.embed_model,
            config.openai.completion_model,
            config.openai.transcription_model
        );

        let speech = Arc::new(ElevenLabsClient::new(&config.speech)?);
        tracing::info!("Speech client initialized (voice: {})", config.speech.voice_id);

        let providers = Providers {
            embedder: openai.clone(),
            completer: openai.clone(),
            transcriber: openai,
            synthesizer: speech,
        };
        let orchestrator =
            ResponseOrchestrator::new(providers, store, OrchestratorSettings::from_config(&config));

        Ok(Self::new(config, orchestrator))
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the response orchestrator
    pub fn orchestrator(&self) -> &ResponseOrchestrator {
        &self.inner.orchestrator
    }

    /// Get the session registry
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
