/// Event router.
/// Pure dispatch of decoded inbound events to the cache reconciliation
/// engine and the presence tracker. No business logic lives here; handlers
/// are synchronous cache mutations so inbound-frame processing never stalls
/// the connection.

use crate::protocol::ServerEvent;
use crate::services::{ChatStore, PresenceTracker};
use log::{debug, warn};

pub fn route(event: ServerEvent, store: &mut ChatStore, presence: &mut PresenceTracker) {
    match event {
        ServerEvent::Pong => debug!("Heartbeat acknowledged"),
        ServerEvent::NewMessage(message) => store.apply_new_message(message),
        ServerEvent::MessageStatus {
            conversation_id,
            message_id,
            status,
        } => store.apply_status(&conversation_id, &message_id, status),
        ServerEvent::UserTyping {
            user_id,
            conversation_id,
            is_typing,
        } => presence.apply(&user_id, &conversation_id, is_typing),
        ServerEvent::UserStatus { user_id, online } => {
            debug!("User {} is now {}", user_id, if online { "online" } else { "offline" })
        }
        ServerEvent::Notification(payload) => debug!("Notification received: {}", payload),
        ServerEvent::Error { message } => warn!("Server error frame: {}", message),
        ServerEvent::Unknown(kind) => debug!("Ignoring unknown event kind: {}", kind),
    }
}
