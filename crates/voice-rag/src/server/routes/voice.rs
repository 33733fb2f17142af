//! Spoken question endpoint

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::HeaderMap,
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::AssistantReply;

use super::{session_of, GenericFailure};

const VOICE_FAILURE: &str = "Error processing the audio";

/// Multipart field carrying the recording
pub const AUDIO_FIELD: &str = "audio";

/// POST /voice - Answer a spoken question
pub async fn answer_voice(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> std::result::Result<Json<AssistantReply>, GenericFailure> {
    let session = session_of(&headers);

    let reply = async {
        let multipart = multipart.map_err(|e| Error::Internal(format!("Invalid upload: {}", e)))?;
        let (file_name, audio) = read_audio_field(multipart).await?;
        tracing::info!(
            "Received audio upload ({} bytes, session {})",
            audio.len(),
            session
        );

        let conversation = state.sessions().get_or_create(&session);
        let mut conversation = conversation.lock().await;
        state
            .orchestrator()
            .answer_audio(&mut conversation, &audio, file_name.as_deref())
            .await
    }
    .await;

    reply.map(Json).map_err(|e| {
        tracing::error!("Error processing audio (session {}): {}", session, e);
        GenericFailure(VOICE_FAILURE)
    })
}

/// Pull the `audio` field out of the upload
async fn read_audio_field(mut multipart: Multipart) -> Result<(Option<String>, bytes::Bytes)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Internal(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::Internal(format!("Failed to read audio: {}", e)))?;

        if data.is_empty() {
            return Err(Error::Internal("Audio upload is empty".to_string()));
        }
        return Ok((file_name, data));
    }

    Err(Error::Internal(format!(
        "Multipart body has no '{}' field",
        AUDIO_FIELD
    )))
}
