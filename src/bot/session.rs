use dashmap::DashMap;

use crate::bot::strings::Lang;
use crate::models::SubmissionKind;

/// Per-chat conversational context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub lang: Lang,
    pub pending: Option<Pending>,
}

/// What the next free-text message from the chat means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    Message(SubmissionKind),
    DeleteId,
}

/// Storage for chat sessions. The in-memory store loses sessions on restart;
/// a persistent implementation can be swapped in behind this trait.
pub trait SessionStore: Send + Sync {
    fn load(&self, chat_id: i64) -> Session;
    fn save(&self, chat_id: i64, session: Session);
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: DashMap<i64, Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, chat_id: i64) -> Session {
        self.sessions
            .get(&chat_id)
            .map(|s| s.value().clone())
            .unwrap_or_default()
    }

    fn save(&self, chat_id: i64, session: Session) {
        self.sessions.insert(chat_id, session);
    }
}
