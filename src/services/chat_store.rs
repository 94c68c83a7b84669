/// Cache reconciliation engine.
/// The single source of truth for conversations and messages visible to the
/// UI. Reconciles three independent write sources without losing or
/// duplicating data: optimistic local sends, paginated REST fetches, and
/// push-delivered updates. No other component mutates this cache.

use crate::models::{Conversation, Message, MessagePreview, MessageStatus};
use log::debug;
use std::collections::HashMap;

pub struct ChatStore {
    /// Identifier of the signed-in user, used to scope unread accounting
    user_id: String,
    /// Conversation listing in server order
    conversations: Vec<Conversation>,
    /// Per-conversation message window, keyed by conversation id
    messages: HashMap<String, Vec<Message>>,
    /// Set when a push referenced a conversation the listing does not
    /// contain; the listing should be refetched rather than guessed at
    listing_stale: bool,
}

impl ChatStore {
    pub fn new(user_id: String) -> Self {
        ChatStore {
            user_id,
            conversations: Vec::new(),
            messages: HashMap::new(),
            listing_stale: false,
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn messages(&self, conversation_id: &str) -> &[Message] {
        self.messages
            .get(conversation_id)
            .map(|m| m.as_slice())
            .unwrap_or(&[])
    }

    /// True when the conversation listing needs a refetch
    pub fn listing_stale(&self) -> bool {
        self.listing_stale
    }

    /// Find the persisted conversation with the given peer, if one exists.
    /// Used to reuse an existing conversation before creating a duplicate
    /// for the same participant pair.
    pub fn find_with_participant(&self, peer_id: &str) -> Option<&Conversation> {
        self.conversations
            .iter()
            .find(|c| !c.is_unpersisted() && c.has_participants(&self.user_id, peer_id))
    }

    /// Replace the conversation listing from a fresh fetch
    pub fn upsert_conversations(&mut self, listing: Vec<Conversation>) {
        self.conversations = listing;
        self.listing_stale = false;
    }

    /// Insert an optimistic placeholder at the tail of the loaded window.
    /// Returns the temp id used to confirm or roll back later.
    pub fn insert_pending(&mut self, message: Message) -> String {
        debug_assert!(message.is_temp());
        let temp_id = message.id.clone();
        self.messages
            .entry(message.conversation_id.clone())
            .or_default()
            .push(message);
        temp_id
    }

    /// Replace the first placeholder in the conversation with the
    /// server-confirmed record, preserving its list position. Falls back to
    /// an append when no placeholder remains (the window was reloaded in
    /// between).
    pub fn confirm_pending(&mut self, conversation_id: &str, confirmed: Message) {
        let list = self.messages.entry(conversation_id.to_string()).or_default();

        if list.iter().any(|m| m.id == confirmed.id) {
            // Push beat the REST response; drop the placeholder instead.
            // Only the first temp belongs to this send, later ones may be
            // other in-flight sends.
            if let Some(index) = list.iter().position(|m| m.is_temp()) {
                list.remove(index);
            }
            return;
        }

        let preview = MessagePreview {
            content: confirmed.content.clone(),
            created_at: confirmed.created_at,
        };

        match list.iter().position(|m| m.is_temp()) {
            Some(index) => list[index] = confirmed,
            None => list.push(confirmed),
        }

        if let Some(conv) = self.conversations.iter_mut().find(|c| c.id == conversation_id) {
            conv.last_message = Some(preview);
        }
    }

    /// Remove the placeholder after a failed send, restoring the list to
    /// its pre-send state
    pub fn rollback_pending(&mut self, conversation_id: &str, temp_id: &str) {
        if let Some(list) = self.messages.get_mut(conversation_id) {
            list.retain(|m| m.id != temp_id);
        }
    }

    /// Apply a pushed message. Deduplicates by final id so a push racing a
    /// page refetch cannot produce a double entry.
    pub fn apply_new_message(&mut self, message: Message) {
        let conversation_id = message.conversation_id.clone();
        let list = self.messages.entry(conversation_id.clone()).or_default();

        if list.iter().any(|m| m.id == message.id) {
            debug!("Dropping duplicate message {}", message.id);
            return;
        }

        let from_peer = message.sender_id != self.user_id;
        let preview = MessagePreview {
            content: message.content.clone(),
            created_at: message.created_at,
        };
        list.push(message);

        match self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        {
            Some(conv) => {
                conv.last_message = Some(preview);
                if from_peer {
                    conv.unread_count += 1;
                }
            }
            None => {
                // A conversation we have never listed; refetch rather than
                // fabricate a row
                debug!(
                    "Push for unknown conversation {}, marking listing stale",
                    conversation_id
                );
                self.listing_stale = true;
            }
        }
    }

    /// Patch the status of one message. A status for a message we have not
    /// fetched yet is dropped silently; transport ordering does not
    /// guarantee the new_message arrives first.
    pub fn apply_status(&mut self, conversation_id: &str, message_id: &str, status: MessageStatus) {
        let found = self
            .messages
            .get_mut(conversation_id)
            .and_then(|list| list.iter_mut().find(|m| m.id == message_id));

        match found {
            Some(message) => message.status = status,
            None => debug!(
                "Status update for uncached message {} in {}, dropping",
                message_id, conversation_id
            ),
        }
    }

    /// Merge one fetched page into the cached window, keyed by `skip`:
    /// a fresh load (skip = 0) replaces the window to guarantee the
    /// freshest ordering head, an older page (skip > 0) is prepended so
    /// older messages always appear before the loaded window.
    pub fn merge_page(&mut self, conversation_id: &str, skip: usize, page: Vec<Message>) {
        let list = self.messages.entry(conversation_id.to_string()).or_default();

        if skip == 0 {
            *list = page;
            return;
        }

        let mut merged: Vec<Message> = page
            .into_iter()
            .filter(|incoming| !list.iter().any(|m| m.id == incoming.id))
            .collect();
        merged.append(list);
        *list = merged;
    }

    /// Zero the unread counter locally; the server copy is reset by the
    /// read-receipt API
    pub fn mark_read(&mut self, conversation_id: &str) {
        if let Some(conv) = self.conversations.iter_mut().find(|c| c.id == conversation_id) {
            conv.unread_count = 0;
        }
    }
}
