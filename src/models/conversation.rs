/// Conversation model for the telehealth chat client.
/// Represents a 1:1 conversation row in the cached listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the latest message, used for list previews
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePreview {
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    #[serde(rename = "participantIds")]
    pub participant_ids: Vec<String>,
    #[serde(rename = "lastMessage")]
    pub last_message: Option<MessagePreview>,
    #[serde(rename = "unreadCount", default)]
    pub unread_count: u32,
}

impl Conversation {
    /// Reserved id for a conversation not yet persisted server-side
    pub const NEW_ID: &'static str = "new";

    pub fn new(id: String, participant_ids: Vec<String>) -> Self {
        Conversation {
            id,
            participant_ids,
            last_message: None,
            unread_count: 0,
        }
    }

    /// True while this conversation exists only locally
    pub fn is_unpersisted(&self) -> bool {
        self.id == Self::NEW_ID
    }

    /// True when the given pair of users are this conversation's
    /// participants, in either order
    pub fn has_participants(&self, a: &str, b: &str) -> bool {
        self.participant_ids.iter().any(|p| p == a) && self.participant_ids.iter().any(|p| p == b)
    }
}
