//! Answer generation: the question → answer → speech cycle

pub mod audio;
pub mod orchestrator;
pub mod prompt;

pub use audio::{audio_data_uri, StagedAudio};
pub use orchestrator::{OrchestratorSettings, Providers, ResponseOrchestrator};
pub use prompt::PromptBuilder;
