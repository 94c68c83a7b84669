/// Common test utilities for the telechat client integration tests.
/// Provides builders for messages and conversations and a pre-wired store.

use telechat_client::models::{Conversation, Message, MessageStatus};
use telechat_client::services::ChatStore;

/// Helper for creating test messages
pub struct TestMessageBuilder {
    id: String,
    conversation_id: String,
    sender_id: String,
    receiver_id: String,
    content: String,
    status: MessageStatus,
}

impl TestMessageBuilder {
    pub fn new(id: &str) -> Self {
        TestMessageBuilder {
            id: id.to_string(),
            conversation_id: "conv-1".to_string(),
            sender_id: "bob".to_string(),
            receiver_id: "alice".to_string(),
            content: "hello".to_string(),
            status: MessageStatus::Sent,
        }
    }

    pub fn conversation(mut self, conversation_id: &str) -> Self {
        self.conversation_id = conversation_id.to_string();
        self
    }

    pub fn from(mut self, sender_id: &str) -> Self {
        self.sender_id = sender_id.to_string();
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    pub fn status(mut self, status: MessageStatus) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> Message {
        Message {
            id: self.id,
            conversation_id: self.conversation_id,
            sender_id: self.sender_id,
            receiver_id: self.receiver_id,
            content: self.content,
            message_type: "text".to_string(),
            status: self.status,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Helper for creating test conversations
pub struct TestConversationBuilder {
    id: String,
    participants: Vec<String>,
}

impl TestConversationBuilder {
    pub fn new(id: &str) -> Self {
        TestConversationBuilder {
            id: id.to_string(),
            participants: vec!["alice".to_string(), "bob".to_string()],
        }
    }

    pub fn participants(mut self, a: &str, b: &str) -> Self {
        self.participants = vec![a.to_string(), b.to_string()];
        self
    }

    pub fn build(self) -> Conversation {
        Conversation::new(self.id, self.participants)
    }
}

/// A store for user `alice` with `conv-1` (alice, bob) already listed
pub fn store_for_alice() -> ChatStore {
    let mut store = ChatStore::new("alice".to_string());
    store.upsert_conversations(vec![TestConversationBuilder::new("conv-1").build()]);
    store
}

/// Collect the message ids of a conversation window in order
pub fn ids(store: &ChatStore, conversation_id: &str) -> Vec<String> {
    store
        .messages(conversation_id)
        .iter()
        .map(|m| m.id.clone())
        .collect()
}
