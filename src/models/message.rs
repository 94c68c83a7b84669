/// Message model for the telehealth chat client.
/// Represents one message in a 1:1 conversation, including the optimistic
/// placeholder state used while a send is in flight.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix of locally assigned placeholder identifiers
pub const TEMP_ID_PREFIX: &str = "temp-";

/// Delivery status of a message, advanced by push events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Sending,
    Sent,
    Delivered,
    Read,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
    #[serde(rename = "senderId")]
    pub sender_id: String,
    #[serde(rename = "receiverId")]
    pub receiver_id: String,
    pub content: String,
    #[serde(rename = "type", default = "default_message_type")]
    pub message_type: String,
    #[serde(default = "default_status")]
    pub status: MessageStatus,
    #[serde(rename = "createdAt", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_message_type() -> String {
    "text".to_string()
}

fn default_status() -> MessageStatus {
    MessageStatus::Sent
}

impl Message {
    /// Create an optimistic placeholder with a temp id and status Sending.
    /// The placeholder holds the list position until the server confirms.
    pub fn pending(
        conversation_id: String,
        sender_id: String,
        receiver_id: String,
        content: String,
    ) -> Self {
        Message {
            id: Self::temp_id(),
            conversation_id,
            sender_id,
            receiver_id,
            content,
            message_type: "text".to_string(),
            status: MessageStatus::Sending,
            created_at: Utc::now(),
        }
    }

    /// Generate a fresh temp identifier
    pub fn temp_id() -> String {
        format!(
            "{}{}-{}",
            TEMP_ID_PREFIX,
            Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4().simple()
        )
    }

    /// True while this message is an unconfirmed local placeholder
    pub fn is_temp(&self) -> bool {
        self.id.starts_with(TEMP_ID_PREFIX)
    }
}
