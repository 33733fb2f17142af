//! Typed question endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};

use crate::server::state::AppState;
use crate::types::{AssistantReply, TextRequest};

use super::{session_of, GenericFailure};

const TEXT_FAILURE: &str = "Error processing the text";

/// POST /text - Answer a typed question
pub async fn answer_text(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<AssistantReply>, GenericFailure> {
    let Json(request) = payload.map_err(|e| {
        tracing::error!("Rejected text request: {}", e);
        GenericFailure(TEXT_FAILURE)
    })?;

    let session = session_of(&headers);
    let conversation = state.sessions().get_or_create(&session);
    let mut conversation = conversation.lock().await;

    state
        .orchestrator()
        .answer_text(&mut conversation, &request.text)
        .await
        .map(Json)
        .map_err(|e| {
            if e.is_precondition() {
                tracing::error!("Corpus precondition violated (session {}): {}", session, e);
            } else {
                tracing::error!("Error processing text (session {}): {}", session, e);
            }
            GenericFailure(TEXT_FAILURE)
        })
}
