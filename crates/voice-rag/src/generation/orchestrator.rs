//! Response orchestrator
//!
//! Drives one request through the conversation cycle:
//!
//! ```text
//! RECEIVE_INPUT → [TRANSCRIBE] → EMBED_QUERY → SEARCH_CONTEXT → [INJECT_CONTEXT]
//!   → REQUEST_COMPLETION → APPEND_REPLY → SYNTHESIZE_SPEECH → RESPOND
//! ```
//!
//! Steps run strictly in order and any failure aborts the rest. Nothing is
//! retried and no partial reply is produced. Messages appended before the
//! failing step stay in the conversation.

use std::sync::Arc;
use std::time::Instant;

use crate::config::RagConfig;
use crate::conversation::Conversation;
use crate::error::Result;
use crate::providers::{
    CompletionProvider, EmbeddingProvider, SpeechSynthesizer, TranscriptionProvider,
};
use crate::retrieval::SimilarityIndex;
use crate::types::{AssistantReply, Role};

use super::audio::{audio_data_uri, StagedAudio};
use super::prompt::PromptBuilder;

/// The external capabilities the orchestrator consumes
#[derive(Clone)]
pub struct Providers {
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub completer: Arc<dyn CompletionProvider>,
    pub transcriber: Arc<dyn TranscriptionProvider>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
}

/// Tunables of the orchestration cycle
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Context is injected only when similarity is strictly above this
    pub similarity_threshold: f32,
    /// Header of the injected context message
    pub context_prefix: String,
    /// Voice used for every synthesized reply
    pub voice_id: String,
}

impl OrchestratorSettings {
    pub fn from_config(config: &RagConfig) -> Self {
        Self {
            similarity_threshold: config.conversation.similarity_threshold,
            context_prefix: config.conversation.context_prefix.clone(),
            voice_id: config.speech.voice_id.clone(),
        }
    }
}

/// Composes retrieval, completion and speech into one answer
#[derive(Clone)]
pub struct ResponseOrchestrator {
    providers: Providers,
    index: Arc<dyn SimilarityIndex>,
    settings: OrchestratorSettings,
}

impl ResponseOrchestrator {
    pub fn new(
        providers: Providers,
        index: Arc<dyn SimilarityIndex>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            providers,
            index,
            settings,
        }
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Number of documents available for retrieval
    pub fn corpus_size(&self) -> usize {
        self.index.len()
    }

    /// Answer a spoken question
    ///
    /// The upload is staged to a temporary file for transcription; the file
    /// is removed as soon as transcription finishes or fails.
    pub async fn answer_audio(
        &self,
        conversation: &mut Conversation,
        audio: &[u8],
        file_name: Option<&str>,
    ) -> Result<AssistantReply> {
        let question = {
            let staged = StagedAudio::stage(audio, file_name)?;
            let start = Instant::now();
            let text = self.providers.transcriber.transcribe(staged.path()).await?;
            tracing::info!(
                "Transcribed {} bytes in {}ms via {}",
                audio.len(),
                start.elapsed().as_millis(),
                self.providers.transcriber.name()
            );
            text
        };

        self.answer_text(conversation, &question).await
    }

    /// Answer a typed question
    pub async fn answer_text(
        &self,
        conversation: &mut Conversation,
        question: &str,
    ) -> Result<AssistantReply> {
        let start = Instant::now();
        tracing::info!("Question: \"{}\"", question);

        // EMBED_QUERY
        conversation.append(Role::User, question);
        let query_embedding = self.providers.embedder.embed(question).await?;

        // SEARCH_CONTEXT / INJECT_CONTEXT
        let hit = self.index.nearest(&query_embedding)?;
        tracing::debug!(
            "Best match {} (similarity {:.4})",
            hit.document.id,
            hit.similarity
        );
        if hit.is_relevant(self.settings.similarity_threshold) {
            tracing::info!(
                "Injecting context from {} (similarity {:.4})",
                hit.document.id,
                hit.similarity
            );
            conversation.append(
                Role::System,
                PromptBuilder::context_message(&self.settings.context_prefix, &hit),
            );
        }

        // REQUEST_COMPLETION / APPEND_REPLY
        let reply = self
            .providers
            .completer
            .complete(conversation.messages())
            .await?;
        conversation.append(Role::Assistant, reply.clone());

        // SYNTHESIZE_SPEECH
        let speech = self
            .providers
            .synthesizer
            .synthesize(&reply, &self.settings.voice_id)
            .await?;

        tracing::info!(
            "Answered in {}ms ({} messages in conversation)",
            start.elapsed().as_millis(),
            conversation.len()
        );

        Ok(AssistantReply {
            question: question.to_string(),
            reply,
            audio: audio_data_uri(&speech),
        })
    }
}
