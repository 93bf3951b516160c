//! Per-chat conversation state.
//!
//! [`ConversationStore::open`] hands out an exclusive [`ChatSession`] for one chat. Writes made
//! through the session are buffered and become visible only on [`ChatSession::commit`]; a
//! session dropped without committing leaves the chat exactly as it was.

use async_trait::async_trait;
use dashmap::DashMap;
use lizbot_core::{ChatId, Result};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// What follow-up input a chat owes. Absence from the store means `Idle`; idle chats are not kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingCity,
    AwaitingTriviaAnswer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ChatRecord {
    state: ConversationState,
    /// Present iff `state` is `AwaitingTriviaAnswer`.
    pending_answer: Option<String>,
}

/// Owner of every chat's state and pending trivia answer.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Waits for exclusive access to `chat_id` and returns a session over its current state.
    async fn open(&self, chat_id: ChatId) -> Result<Box<dyn ChatSession>>;
}

/// Exclusive, transactional view of one chat.
#[async_trait]
pub trait ChatSession: Send {
    fn chat_id(&self) -> ChatId;

    fn state(&self) -> ConversationState;

    /// Any state other than `AwaitingTriviaAnswer` also clears the pending answer.
    fn set_state(&mut self, state: ConversationState);

    /// Back to `Idle`, without a pending answer.
    fn clear_state(&mut self);

    fn pending_answer(&self) -> Option<&str>;

    fn set_pending_answer(&mut self, answer: String);

    fn clear_pending_answer(&mut self);

    /// Publishes the buffered writes and releases the chat.
    async fn commit(self: Box<Self>) -> Result<()>;
}

/// Process-lifetime store: one async mutex per chat, indexed by a sharded map.
///
/// The map's shard locks are held only long enough to clone a chat's mutex handle, so a session
/// open on one chat never blocks another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    chats: Arc<DashMap<ChatId, Arc<Mutex<ChatRecord>>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chats with a non-idle record or an open session.
    pub fn tracked_chats(&self) -> usize {
        self.chats.len()
    }

    fn slot(&self, chat_id: ChatId) -> Arc<Mutex<ChatRecord>> {
        Arc::clone(self.chats.entry(chat_id).or_default().value())
    }

    /// Committed state of `chat_id`; waits if a session is open on it.
    pub async fn state(&self, chat_id: ChatId) -> ConversationState {
        let slot = self.chats.get(&chat_id).map(|entry| Arc::clone(entry.value()));
        match slot {
            Some(slot) => slot.lock().await.state,
            None => ConversationState::Idle,
        }
    }

    /// Committed pending trivia answer of `chat_id`.
    pub async fn pending_answer(&self, chat_id: ChatId) -> Option<String> {
        let slot = self.chats.get(&chat_id).map(|entry| Arc::clone(entry.value()))?;
        let record = slot.lock().await;
        record.pending_answer.clone()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn open(&self, chat_id: ChatId) -> Result<Box<dyn ChatSession>> {
        let guard = self.slot(chat_id).lock_owned().await;
        let working = guard.clone();
        debug!(chat_id = %chat_id, state = ?working.state, "Opened chat session");
        Ok(Box::new(InMemorySession {
            chat_id,
            chats: Arc::clone(&self.chats),
            guard: Some(guard),
            working,
        }))
    }
}

struct InMemorySession {
    chat_id: ChatId,
    chats: Arc<DashMap<ChatId, Arc<Mutex<ChatRecord>>>>,
    /// Taken on drop.
    guard: Option<OwnedMutexGuard<ChatRecord>>,
    working: ChatRecord,
}

#[async_trait]
impl ChatSession for InMemorySession {
    fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    fn state(&self) -> ConversationState {
        self.working.state
    }

    /// Leaving `AwaitingTriviaAnswer` drops the pending answer.
    fn set_state(&mut self, state: ConversationState) {
        self.working.state = state;
        if state != ConversationState::AwaitingTriviaAnswer {
            self.working.pending_answer = None;
        }
    }

    fn clear_state(&mut self) {
        self.set_state(ConversationState::Idle);
    }

    fn pending_answer(&self) -> Option<&str> {
        self.working.pending_answer.as_deref()
    }

    fn set_pending_answer(&mut self, answer: String) {
        self.working.pending_answer = Some(answer);
    }

    fn clear_pending_answer(&mut self) {
        self.working.pending_answer = None;
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let mut this = self;
        let session = &mut *this;
        debug_assert_eq!(
            session.working.pending_answer.is_some(),
            session.working.state == ConversationState::AwaitingTriviaAnswer,
            "pending answer must exist iff awaiting a trivia answer"
        );
        if let Some(guard) = session.guard.as_mut() {
            **guard = session.working.clone();
        }
        debug!(chat_id = %session.chat_id, state = ?session.working.state, "Committed chat session");
        Ok(())
    }
}

impl Drop for InMemorySession {
    /// Releases the chat. An idle record is removed from the map unless another session is
    /// already waiting on it.
    fn drop(&mut self) {
        let Some(guard) = self.guard.take() else {
            return;
        };
        let idle = *guard == ChatRecord::default();
        drop(guard);
        if idle {
            self.chats
                .remove_if(&self.chat_id, |_, slot| Arc::strong_count(slot) == 1);
        }
    }
}
