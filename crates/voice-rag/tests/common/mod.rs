//! Deterministic provider fakes shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use voice_rag::config::RagConfig;
use voice_rag::error::{Error, Result};
use voice_rag::generation::{OrchestratorSettings, Providers, ResponseOrchestrator};
use voice_rag::providers::{
    CompletionProvider, EmbeddingProvider, SpeechSynthesizer, TranscriptionProvider,
};
use voice_rag::server::state::AppState;
use voice_rag::types::Message;
use voice_rag::{Document, EmbeddingStore};

pub const STUB_REPLY: &str = "Cats are small carnivorous mammals.";
pub const STUB_AUDIO: &[u8] = b"mp3";
/// base64 of STUB_AUDIO
pub const STUB_AUDIO_URI: &str = "data:audio/mpeg;base64,bXAz";

/// Returns the same embedding for every text, or fails
pub struct FixedEmbedder {
    pub vector: Vec<f32>,
    pub fail: bool,
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.lock().push(text.to_string());
        if self.fail {
            return Err(Error::embedding("stub embedding outage"));
        }
        Ok(self.vector.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Returns a fixed reply, or fails, recording every history it was shown
pub struct StubCompleter {
    pub fail: bool,
    pub seen: Mutex<Vec<Vec<Message>>>,
}

#[async_trait]
impl CompletionProvider for StubCompleter {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        self.seen.lock().push(messages.to_vec());
        if self.fail {
            return Err(Error::completion("stub completion outage"));
        }
        Ok(STUB_REPLY.to_string())
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

/// Returns a fixed transcription, or fails, recording the staged file it saw
pub struct StubTranscriber {
    pub text: String,
    pub fail: bool,
    pub staged: Mutex<Vec<(PathBuf, Vec<u8>)>>,
}

#[async_trait]
impl TranscriptionProvider for StubTranscriber {
    async fn transcribe(&self, path: &Path) -> Result<String> {
        let data = std::fs::read(path)?;
        self.staged.lock().push((path.to_path_buf(), data));
        if self.fail {
            return Err(Error::transcription("stub transcription outage"));
        }
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Returns fixed audio bytes, or fails
pub struct StubSynthesizer {
    pub fail: bool,
    pub voices: Mutex<Vec<String>>,
}

#[async_trait]
impl SpeechSynthesizer for StubSynthesizer {
    async fn synthesize(&self, _text: &str, voice_id: &str) -> Result<Vec<u8>> {
        self.voices.lock().push(voice_id.to_string());
        if self.fail {
            return Err(Error::synthesis("stub synthesis outage"));
        }
        Ok(STUB_AUDIO.to_vec())
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// All fakes plus the orchestrator built over them
pub struct Harness {
    pub config: RagConfig,
    pub embedder: Arc<FixedEmbedder>,
    pub completer: Arc<StubCompleter>,
    pub transcriber: Arc<StubTranscriber>,
    pub synthesizer: Arc<StubSynthesizer>,
    pub orchestrator: ResponseOrchestrator,
}

pub struct HarnessBuilder {
    documents: Vec<Document>,
    query: Vec<f32>,
    threshold: f32,
    embedding_fails: bool,
    completion_fails: bool,
    transcription_fails: bool,
    synthesis_fails: bool,
    transcript: String,
    config: RagConfig,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            documents: vec![Document::new("a.pdf", "cats", vec![1.0, 0.0])],
            query: vec![1.0, 0.0],
            threshold: 0.7,
            embedding_fails: false,
            completion_fails: false,
            transcription_fails: false,
            synthesis_fails: false,
            transcript: "hello".to_string(),
            config: RagConfig::default(),
        }
    }
}

impl HarnessBuilder {
    pub fn documents(mut self, documents: Vec<Document>) -> Self {
        self.documents = documents;
        self
    }

    pub fn query(mut self, query: Vec<f32>) -> Self {
        self.query = query;
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn embedding_fails(mut self) -> Self {
        self.embedding_fails = true;
        self
    }

    pub fn synthesis_fails(mut self) -> Self {
        self.synthesis_fails = true;
        self
    }

    /// Configuration handed to the application state
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = config;
        self
    }

    pub fn completion_fails(mut self) -> Self {
        self.completion_fails = true;
        self
    }

    pub fn transcription_fails(mut self) -> Self {
        self.transcription_fails = true;
        self
    }

    pub fn build(self) -> Harness {
        let embedder = Arc::new(FixedEmbedder {
            vector: self.query,
            fail: self.embedding_fails,
            calls: Mutex::new(Vec::new()),
        });
        let completer = Arc::new(StubCompleter {
            fail: self.completion_fails,
            seen: Mutex::new(Vec::new()),
        });
        let transcriber = Arc::new(StubTranscriber {
            text: self.transcript,
            fail: self.transcription_fails,
            staged: Mutex::new(Vec::new()),
        });
        let synthesizer = Arc::new(StubSynthesizer {
            fail: self.synthesis_fails,
            voices: Mutex::new(Vec::new()),
        });

        let store = Arc::new(EmbeddingStore::from_documents(self.documents).unwrap());
        let providers = Providers {
            embedder: embedder.clone(),
            completer: completer.clone(),
            transcriber: transcriber.clone(),
            synthesizer: synthesizer.clone(),
        };
        let settings = OrchestratorSettings {
            similarity_threshold: self.threshold,
            context_prefix: "Relevant document information:".to_string(),
            voice_id: "test-voice".to_string(),
        };

        Harness {
            config: self.config,
            embedder,
            completer,
            transcriber,
            synthesizer,
            orchestrator: ResponseOrchestrator::new(providers, store, settings),
        }
    }
}

impl Harness {
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::default()
    }

    /// Application state serving this harness
    pub fn app_state(&self) -> AppState {
        AppState::new(self.config.clone(), self.orchestrator.clone())
    }
}
