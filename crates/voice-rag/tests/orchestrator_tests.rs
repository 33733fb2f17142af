//! End-to-end conversation cycle against fake providers

mod common;

use common::{Harness, STUB_AUDIO_URI, STUB_REPLY};
use voice_rag::error::Error;
use voice_rag::retrieval::cosine_similarity;
use voice_rag::{Conversation, Document, Role};

const PERSONA: &str = "You are a helpful assistant.";

#[tokio::test]
async fn test_relevant_document_is_injected() {
    let harness = Harness::builder().build();
    let mut conversation = Conversation::new(PERSONA);

    let reply = harness
        .orchestrator
        .answer_text(&mut conversation, "What are cats?")
        .await
        .unwrap();

    assert_eq!(reply.question, "What are cats?");
    assert_eq!(reply.reply, STUB_REPLY);
    assert_eq!(reply.audio, STUB_AUDIO_URI);

    // persona, user, context, assistant
    let messages = conversation.messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[0].content, PERSONA);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[2].role, Role::System);
    assert_eq!(messages[2].content, "Relevant document information:\ncats");
    assert_eq!(messages[3].role, Role::Assistant);
    assert_eq!(messages[3].content, STUB_REPLY);

    // The completion saw the injected context but not its own reply
    let seen = harness.completer.seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].len(), 3);
    assert_eq!(seen[0][2].content, "Relevant document information:\ncats");
}

#[tokio::test]
async fn test_irrelevant_document_is_not_injected() {
    let harness = Harness::builder().query(vec![0.0, 1.0]).build();
    let mut conversation = Conversation::new(PERSONA);

    harness
        .orchestrator
        .answer_text(&mut conversation, "What is the weather?")
        .await
        .unwrap();

    assert_eq!(conversation.len(), 3);
    assert!(conversation
        .messages()
        .iter()
        .skip(1)
        .all(|m| m.role != Role::System));
}

#[tokio::test]
async fn test_similarity_equal_to_threshold_is_not_injected() {
    // Orthogonal vectors have similarity exactly 0.0
    let harness = Harness::builder()
        .query(vec![0.0, 1.0])
        .threshold(0.0)
        .build();
    let mut conversation = Conversation::new(PERSONA);

    harness
        .orchestrator
        .answer_text(&mut conversation, "hi")
        .await
        .unwrap();

    assert_eq!(conversation.len(), 3);
}

#[tokio::test]
async fn test_best_document_wins() {
    let harness = Harness::builder()
        .documents(vec![
            Document::new("a.pdf", "alpha", vec![1.0, 0.0]),
            Document::new("b.pdf", "beta", vec![0.6, 0.8]),
        ])
        .query(vec![0.0, 1.0])
        .build();
    let mut conversation = Conversation::new(PERSONA);

    harness
        .orchestrator
        .answer_text(&mut conversation, "beta?")
        .await
        .unwrap();

    assert_eq!(
        conversation.messages()[2].content,
        "Relevant document information:\nbeta"
    );
}

#[tokio::test]
async fn test_history_grows_across_turns() {
    let harness = Harness::builder().query(vec![0.0, 1.0]).build();
    let mut conversation = Conversation::new(PERSONA);

    let mut previous = conversation.len();
    for turn in 0..3 {
        harness
            .orchestrator
            .answer_text(&mut conversation, &format!("question {}", turn))
            .await
            .unwrap();
        assert_eq!(conversation.len(), previous + 2);
        previous = conversation.len();
    }

    // Each completion saw everything before it
    let seen = harness.completer.seen.lock();
    assert_eq!(seen[2].len(), 6);
    assert_eq!(seen[2][1].content, "question 0");
}

#[tokio::test]
async fn test_window_keeps_persona() {
    let harness = Harness::builder().build();
    let mut conversation = Conversation::with_window(PERSONA, Some(5));

    for _ in 0..4 {
        harness
            .orchestrator
            .answer_text(&mut conversation, "cats?")
            .await
            .unwrap();
    }

    assert_eq!(conversation.len(), 5);
    assert_eq!(conversation.persona().content, PERSONA);
    assert_eq!(conversation.last().unwrap().role, Role::Assistant);
}

#[tokio::test]
async fn test_completion_failure_keeps_user_message() {
    let harness = Harness::builder()
        .query(vec![0.0, 1.0])
        .completion_fails()
        .build();
    let mut conversation = Conversation::new(PERSONA);

    let err = harness
        .orchestrator
        .answer_text(&mut conversation, "hello?")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Completion(_)));
    assert_eq!(conversation.len(), 2);
    assert_eq!(conversation.last().unwrap().role, Role::User);
    assert_eq!(conversation.last().unwrap().content, "hello?");
    assert!(harness.synthesizer.voices.lock().is_empty());
}

#[tokio::test]
async fn test_dimension_mismatch_stops_before_completion() {
    let harness = Harness::builder().query(vec![1.0, 0.0, 0.0]).build();
    let mut conversation = Conversation::new(PERSONA);

    let err = harness
        .orchestrator
        .answer_text(&mut conversation, "cats?")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::DimensionMismatch {
            expected: 2,
            actual: 3
        }
    ));
    assert!(err.is_precondition());
    assert!(harness.completer.seen.lock().is_empty());
}

#[tokio::test]
async fn test_audio_question_is_transcribed() {
    let harness = Harness::builder().query(vec![0.0, 1.0]).build();
    let mut conversation = Conversation::new(PERSONA);

    let reply = harness
        .orchestrator
        .answer_audio(&mut conversation, b"RIFF fake audio", Some("clip.webm"))
        .await
        .unwrap();

    assert_eq!(reply.question, "hello");
    assert_eq!(reply.reply, STUB_REPLY);
    assert_eq!(conversation.messages()[1].content, "hello");
    assert_eq!(harness.embedder.calls.lock().as_slice(), ["hello"]);

    let staged = harness.transcriber.staged.lock();
    assert_eq!(staged.len(), 1);
    let (path, data) = &staged[0];
    assert_eq!(data.as_slice(), &b"RIFF fake audio"[..]);
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("webm"));
    assert!(!path.exists(), "staged audio must be removed");
}

#[tokio::test]
async fn test_failed_transcription_removes_staged_audio() {
    let harness = Harness::builder().transcription_fails().build();
    let mut conversation = Conversation::new(PERSONA);

    let err = harness
        .orchestrator
        .answer_audio(&mut conversation, b"noise", None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transcription(_)));
    assert_eq!(conversation.len(), 1);

    let staged = harness.transcriber.staged.lock();
    assert_eq!(staged.len(), 1);
    assert!(!staged[0].0.exists());
}

#[tokio::test]
async fn test_synthesis_uses_configured_voice() {
    let harness = Harness::builder().build();
    let mut conversation = Conversation::new(PERSONA);

    harness
        .orchestrator
        .answer_text(&mut conversation, "cats?")
        .await
        .unwrap();

    assert_eq!(harness.synthesizer.voices.lock().as_slice(), ["test-voice"]);
}

#[tokio::test]
async fn test_embedding_failure_keeps_user_message() {
    let harness = Harness::builder().embedding_fails().build();
    let mut conversation = Conversation::new(PERSONA);

    let err = harness
        .orchestrator
        .answer_text(&mut conversation, "cats?")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Embedding(_)));
    assert_eq!(conversation.len(), 2);
    assert_eq!(conversation.last().unwrap().role, Role::User);
    assert!(harness.completer.seen.lock().is_empty());
    assert!(harness.synthesizer.voices.lock().is_empty());
}

#[tokio::test]
async fn test_synthesis_failure_fails_whole_request() {
    let harness = Harness::builder()
        .query(vec![0.0, 1.0])
        .synthesis_fails()
        .build();
    let mut conversation = Conversation::new(PERSONA);

    let err = harness
        .orchestrator
        .answer_text(&mut conversation, "hello?")
        .await
        .unwrap_err();

    // No text-only fallback, but the reply was already recorded
    assert!(matches!(err, Error::Synthesis(_)));
    assert_eq!(conversation.len(), 3);
    assert_eq!(conversation.last().unwrap().role, Role::Assistant);
    assert_eq!(conversation.last().unwrap().content, STUB_REPLY);
}

/// Number of messages after one turn against a single `[1, 0]` document
async fn turn_length(query: Vec<f32>, threshold: f32) -> usize {
    let harness = Harness::builder().query(query).threshold(threshold).build();
    let mut conversation = Conversation::new(PERSONA);
    harness
        .orchestrator
        .answer_text(&mut conversation, "q")
        .await
        .unwrap();
    conversation.len()
}

#[tokio::test]
async fn test_default_threshold_gating() {
    let doc = [1.0, 0.0];

    let below = vec![0.69, 0.7238];
    assert!(cosine_similarity(&below, &doc) < 0.7);
    assert_eq!(turn_length(below, 0.7).await, 3);

    let barely_above = vec![0.7, 0.71414];
    assert!(cosine_similarity(&barely_above, &doc) > 0.7);
    assert_eq!(turn_length(barely_above, 0.7).await, 4);

    let above = vec![0.71, 0.70415];
    assert!(cosine_similarity(&above, &doc) > 0.7);
    assert_eq!(turn_length(above, 0.7).await, 4);
}

#[tokio::test]
async fn test_similarity_exactly_at_threshold_is_not_injected() {
    let query = vec![0.71, 0.70415];
    let threshold = cosine_similarity(&query, &[1.0, 0.0]);

    assert_eq!(turn_length(query.clone(), threshold).await, 3);
    assert_eq!(turn_length(query, threshold - 1e-4).await, 4);
}
