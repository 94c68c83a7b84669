/// Data models for the telehealth chat client.
/// Defines Conversation, Message, and the REST request/response payloads.

pub mod conversation;
pub mod message;

pub use conversation::{Conversation, MessagePreview};
pub use message::{Message, MessageStatus, TEMP_ID_PREFIX};

use serde::{Deserialize, Serialize};

/// Request body for the message persistence API.
/// `conversation_id = None` asks the server to create a new conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    #[serde(rename = "senderId")]
    pub sender_id: String,
    #[serde(rename = "receiverId")]
    pub receiver_id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(rename = "conversationId")]
    pub conversation_id: Option<String>,
}

/// A chat target returned by the contact search API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}
