//! Per-session conversation ownership
//!
//! Each session key owns its own `Conversation` behind an async mutex. A
//! request holds the lock for its whole question → answer cycle, so turns
//! of one session never interleave while different sessions run in parallel.
//!
//! Callers choose their own keys, so the registry is bounded: once it holds
//! more than `max_sessions` conversations the least recently used one is
//! dropped. A request already holding a dropped conversation finishes on
//! its own handle.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::ConversationConfig;

use super::history::Conversation;

/// Session used when a caller does not identify itself
pub const DEFAULT_SESSION: &str = "default";

/// Longest accepted session key; longer keys fall back to the default session
const MAX_SESSION_KEY_LEN: usize = 128;

/// Shared handle to one session's conversation
pub type SharedConversation = Arc<Mutex<Conversation>>;

struct SessionEntry {
    conversation: SharedConversation,
    /// Registry clock value of the latest access
    last_used: AtomicU64,
}

impl SessionEntry {
    fn touch(&self, tick: u64) {
        self.last_used.fetch_max(tick, Ordering::Relaxed);
    }

    fn last_used(&self) -> u64 {
        self.last_used.load(Ordering::Relaxed)
    }
}

/// Registry of live conversations keyed by session
pub struct SessionStore {
    sessions: DashMap<String, SessionEntry>,
    clock: AtomicU64,
    system_prompt: String,
    max_messages: Option<usize>,
    max_sessions: Option<usize>,
}

impl SessionStore {
    /// Create an empty registry; conversations are seeded from `config`
    pub fn new(config: &ConversationConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            clock: AtomicU64::new(0),
            system_prompt: config.system_prompt.clone(),
            max_messages: config.history_window(),
            max_sessions: config.session_capacity(),
        }
    }

    /// Normalize a caller-supplied session key
    pub fn session_key(raw: Option<&str>) -> String {
        match raw.map(str::trim) {
            Some(key) if !key.is_empty() && key.len() <= MAX_SESSION_KEY_LEN => key.to_string(),
            _ => DEFAULT_SESSION.to_string(),
        }
    }

    /// Get the conversation for `key`, creating it on first use
    ///
    /// Creating a session may evict the least recently used one.
    pub fn get_or_create(&self, key: &str) -> SharedConversation {
        let tick = self.clock.fetch_add(1, Ordering::Relaxed);

        if let Some(entry) = self.sessions.get(key) {
            entry.touch(tick);
            return entry.conversation.clone();
        }

        let conversation = {
            let entry = self.sessions.entry(key.to_string()).or_insert_with(|| {
                tracing::info!("Starting conversation for session '{}'", key);
                SessionEntry {
                    conversation: Arc::new(Mutex::new(Conversation::with_window(
                        self.system_prompt.clone(),
                        self.max_messages,
                    ))),
                    last_used: AtomicU64::new(tick),
                }
            });
            entry.touch(tick);
            entry.conversation.clone()
        };

        self.evict_over_capacity(key);
        conversation
    }

    /// Drop least recently used sessions until the registry fits, sparing `keep`
    fn evict_over_capacity(&self, keep: &str) {
        let Some(max) = self.max_sessions else {
            return;
        };

        while self.sessions.len() > max {
            let oldest = self
                .sessions
                .iter()
                .filter(|entry| entry.key() != keep)
                .min_by_key(|entry| entry.value().last_used())
                .map(|entry| entry.key().clone());

            match oldest {
                Some(victim) => {
                    self.sessions.remove(&victim);
                    tracing::info!(
                        "Evicted least recently used session '{}' (capacity {})",
                        victim,
                        max
                    );
                }
                None => break,
            }
        }
    }

    /// Get an existing conversation without refreshing its recency
    pub fn get(&self, key: &str) -> Option<SharedConversation> {
        self.sessions
            .get(key)
            .map(|entry| entry.value().conversation.clone())
    }

    /// Drop a session and its history
    pub fn remove(&self, key: &str) -> bool {
        self.sessions.remove(key).is_some()
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Registry bound, `None` when unbounded
    pub fn capacity(&self) -> Option<usize> {
        self.max_sessions
    }
}
