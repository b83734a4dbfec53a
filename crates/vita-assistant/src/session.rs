//! Per-session chat state, owned by the caller and passed into every turn.
//!
//! Nothing here is ambient or global: the engine receives a `&mut
//! ChatSession`, mutates it, and returns. State dies with the session.

use chrono::{DateTime, Utc};

/// A continuation that was generated ahead of time and is waiting for the
/// user to ask for it. At most one lives per session.
#[derive(Debug, Clone)]
pub struct PendingContinuation {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl PendingContinuation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// Session-scoped chat state. One instance per interactive session; turns
/// within a session are strictly sequential, so no locking is needed.
#[derive(Debug, Default)]
pub struct ChatSession {
    pending: Option<PendingContinuation>,
    /// How many continuations this session has served.
    continuations_served: u32,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Replace any existing buffer; the invariant is at most one live
    /// pending continuation per session.
    pub fn store_pending(&mut self, text: impl Into<String>) {
        self.pending = Some(PendingContinuation::new(text));
    }

    /// Consume the buffer. Bumps the served counter when one was live.
    pub fn take_pending(&mut self) -> Option<PendingContinuation> {
        let taken = self.pending.take();
        if taken.is_some() {
            self.continuations_served += 1;
        }
        taken
    }

    /// Drop the buffer without serving it: the conversation moved on and the
    /// pre-generated text no longer fits.
    pub fn discard_pending(&mut self) {
        self.pending = None;
    }

    pub fn continuations_served(&self) -> u32 {
        self.continuations_served
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_lifecycle() {
        let mut session = ChatSession::new();
        assert!(!session.has_pending());

        session.store_pending("rest of the story");
        assert!(session.has_pending());

        let taken = session.take_pending().unwrap();
        assert_eq!(taken.text, "rest of the story");
        assert!(!session.has_pending());
        assert_eq!(session.continuations_served(), 1);
    }

    #[test]
    fn test_store_replaces_existing() {
        let mut session = ChatSession::new();
        session.store_pending("first");
        session.store_pending("second");
        assert_eq!(session.take_pending().unwrap().text, "second");
        assert!(session.take_pending().is_none());
    }

    #[test]
    fn test_discard_does_not_count_as_served() {
        let mut session = ChatSession::new();
        session.store_pending("stale");
        session.discard_pending();
        assert!(!session.has_pending());
        assert_eq!(session.continuations_served(), 0);
    }
}
