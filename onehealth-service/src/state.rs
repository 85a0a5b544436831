use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use onehealth_core::{ChatMessage, SEED_GREETING, SourceDocument};
use uuid::Uuid;

/// One user's chat session: transcript plus knowledge base. Sessions live in
/// memory only; nothing survives a restart.
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: String,
    pub messages: Vec<ChatMessage>,
    pub documents: Vec<SourceDocument>,
    pub links: Vec<String>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            messages: vec![ChatMessage::model(SEED_GREETING)],
            documents: Vec::new(),
            links: Vec::new(),
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for storing and retrieving chat sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save(&self, session: ChatSession);
    async fn get(&self, id: &str) -> Option<ChatSession>;
    async fn delete(&self, id: &str) -> bool;
}

/// In-memory implementation of SessionStore
pub struct InMemorySessionStore {
    sessions: Arc<DashMap<String, ChatSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save(&self, session: ChatSession) {
        self.sessions.insert(session.id.clone(), session);
    }

    async fn get(&self, id: &str) -> Option<ChatSession> {
        self.sessions.get(id).map(|entry| entry.clone())
    }

    async fn delete(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }
}
