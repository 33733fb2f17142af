//! Request and response bodies of the conversation endpoints

use serde::{Deserialize, Serialize};

/// Body of `POST /text`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Result of one question → answer → speech cycle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantReply {
    /// Effective input text (transcription on the audio path)
    pub question: String,
    /// Completion text
    pub reply: String,
    /// Spoken reply as a `data:audio/mpeg;base64,...` URI
    pub audio: String,
}

/// Generic failure body returned by the conversation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
