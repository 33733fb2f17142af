//! HTTP routes for the voice RAG server

pub mod text;
pub mod voice;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use crate::conversation::{SessionStore, DEFAULT_SESSION};
use crate::server::state::AppState;
use crate::types::ErrorBody;

/// Header a caller uses to pick its conversation
pub const SESSION_HEADER: &str = "x-session-id";

/// Conversation endpoints
pub fn conversation_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/text", post(text::answer_text))
        .route(
            "/voice",
            post(voice::answer_voice).layer(DefaultBodyLimit::max(max_upload_size)),
        )
}

/// Informational API routes
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/info", get(info))
}

/// Session key of a request
pub(crate) fn session_of(headers: &HeaderMap) -> String {
    SessionStore::session_key(headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok()))
}

/// Opaque 500 returned by the conversation endpoints on any failure
pub struct GenericFailure(pub &'static str);

impl IntoResponse for GenericFailure {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new(self.0))).into_response()
    }
}

/// API info endpoint
async fn info(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "voice-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Conversational assistant with retrieval-augmented, spoken answers",
        "documents": state.orchestrator().corpus_size(),
        "sessions": state.sessions().len(),
        "max_sessions": state.sessions().capacity(),
        "session_header": SESSION_HEADER,
        "default_session": format!(
            "Requests without {} share the '{}' conversation and are answered one at a time",
            SESSION_HEADER, DEFAULT_SESSION
        ),
        "similarity_threshold": state.config().conversation.similarity_threshold,
        "endpoints": {
            "POST /text": "Ask a typed question ({\"text\": ...})",
            "POST /voice": "Ask a spoken question (multipart field \"audio\")",
            "GET /health": "Liveness check",
            "GET /ready": "Readiness check",
            "GET /api/info": "This document"
        }
    }))
}
