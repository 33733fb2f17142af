//! Provider abstractions for the external capabilities the assistant consumes
//!
//! Embedding, completion, transcription and speech synthesis are each a
//! trait so the orchestrator can run against real network clients or
//! deterministic fakes.

pub mod completion;
pub mod elevenlabs;
pub mod embedding;
pub mod openai;
pub mod synthesis;
pub mod transcription;

pub use completion::CompletionProvider;
pub use elevenlabs::ElevenLabsClient;
pub use embedding::EmbeddingProvider;
pub use openai::OpenAiClient;
pub use synthesis::SpeechSynthesizer;
pub use transcription::TranscriptionProvider;
