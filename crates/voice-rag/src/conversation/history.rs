//! Append-only conversation history with an optional sliding window

use crate::types::{Message, Role};

/// Ordered message log seeded with a system persona
///
/// Messages are only ever appended. When a window is configured and an
/// append would exceed it, the oldest message after the persona is evicted,
/// so the persona is always first and the length never decreases.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    max_messages: Option<usize>,
    evicted: usize,
}

impl Conversation {
    /// Create an unbounded conversation
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
            max_messages: None,
            evicted: 0,
        }
    }

    /// Create a conversation that keeps at most `max_messages` messages
    ///
    /// `None` disables eviction. A window below 2 is raised to 2 so the
    /// persona and the latest message always fit.
    pub fn with_window(system_prompt: impl Into<String>, max_messages: Option<usize>) -> Self {
        Self {
            max_messages: max_messages.map(|m| m.max(2)),
            ..Self::new(system_prompt)
        }
    }

    /// Append a message
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));

        if let Some(max) = self.max_messages {
            while self.messages.len() > max {
                self.messages.remove(1);
                self.evicted += 1;
            }
        }
    }

    /// Full ordered history, persona first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The persona message
    pub fn persona(&self) -> &Message {
        &self.messages[0]
    }

    /// Most recent message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Never true; the persona is always present
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages dropped by the sliding window so far
    pub fn evicted(&self) -> usize {
        self.evicted
    }
}
