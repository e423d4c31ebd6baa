//! Per-patient conversation history
//!
//! A sliding window of the most recent turns, keyed by session id. The
//! window is re-applied after every mutation so the stored history can
//! never exceed the configured bound, whatever order concurrent requests
//! land in.

use dashmap::DashMap;

use renal_chat_core::Turn;

use renal_chat_config::constants::session;

/// Conversation history store
pub struct SessionStore {
    sessions: DashMap<String, Vec<Turn>>,
    max_turns: usize,
}

impl SessionStore {
    pub fn new(max_turns: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_turns,
        }
    }

    /// History for a session, most recent last; empty for unknown sessions
    pub fn history(&self, session_id: &str) -> Vec<Turn> {
        self.sessions
            .get(session_id)
            .map(|turns| turns.value().clone())
            .unwrap_or_default()
    }

    /// Append one completed exchange and re-apply the sliding window
    ///
    /// Both turns are appended under a single map guard so a concurrent
    /// exchange for the same session cannot interleave between them.
    pub fn record_exchange(&self, session_id: &str, user: &str, assistant: &str) {
        let mut turns = self.sessions.entry(session_id.to_string()).or_default();
        turns.push(Turn::user(user));
        turns.push(Turn::assistant(assistant));

        if turns.len() > self.max_turns {
            let excess = turns.len() - self.max_turns;
            turns.drain(..excess);
        }
    }

    /// Replace a session's history, e.g. when restoring a conversation
    /// from an external record
    ///
    /// The sliding window applies to the seed too: only the most recent
    /// turns are kept when the seed exceeds the bound.
    pub fn seed(&self, session_id: &str, mut turns: Vec<Turn>) {
        if turns.len() > self.max_turns {
            let excess = turns.len() - self.max_turns;
            turns.drain(..excess);
        }
        self.sessions.insert(session_id.to_string(), turns);
    }

    /// Forget a session entirely
    pub fn clear(&self, session_id: &str) {
        self.sessions.remove(session_id);
    }

    /// History for a session, or None when the session has never spoken
    pub fn snapshot(&self, session_id: &str) -> Option<Vec<Turn>> {
        self.sessions
            .get(session_id)
            .map(|turns| turns.value().clone())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(session::MAX_HISTORY_TURNS)
    }
}
