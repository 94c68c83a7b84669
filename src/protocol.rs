/// Wire protocol for the realtime chat connection.
/// Decodes inbound text frames into typed events and encodes outbound
/// commands. A frame is a JSON object discriminated by its `type` field;
/// some producers wrap the payload in a `data` object and some place the
/// fields at the top level, so the decoder accepts both shapes.

use crate::error::{ClientError, Result};
use crate::models::{Message, MessageStatus};
use serde::Deserialize;
use serde_json::{json, Value};

/// Decoded inbound event
#[derive(Debug, Clone)]
pub enum ServerEvent {
    /// Heartbeat reply
    Pong,
    /// A message pushed into one of our conversations
    NewMessage(Message),
    /// Delivery status advance for an already-sent message
    MessageStatus {
        conversation_id: String,
        message_id: String,
        status: MessageStatus,
    },
    /// Out-of-band notification payload, passed through untyped
    Notification(Value),
    /// A peer started or stopped typing
    UserTyping {
        user_id: String,
        conversation_id: String,
        is_typing: bool,
    },
    /// A peer went online or offline
    UserStatus { user_id: String, online: bool },
    /// Server-reported error
    Error { message: String },
    /// Unrecognized kind, accepted for forward compatibility
    Unknown(String),
}

/// Outbound command frame
#[derive(Debug, Clone)]
pub enum ClientCommand {
    Ping,
    Typing {
        conversation_id: String,
        is_typing: bool,
    },
    /// Secondary send path; the primary send path is the REST API
    Message(Message),
}

#[derive(Deserialize)]
struct StatusPayload {
    #[serde(rename = "conversationId", alias = "conversation_id")]
    conversation_id: String,
    #[serde(rename = "messageId", alias = "message_id")]
    message_id: String,
    status: MessageStatus,
}

#[derive(Deserialize)]
struct TypingPayload {
    #[serde(rename = "userId", alias = "user_id")]
    user_id: String,
    #[serde(rename = "conversationId", alias = "conversation_id")]
    conversation_id: String,
    #[serde(rename = "isTyping", alias = "is_typing")]
    is_typing: bool,
}

#[derive(Deserialize)]
struct UserStatusPayload {
    #[serde(rename = "userId", alias = "user_id")]
    user_id: String,
    online: bool,
}

#[derive(Deserialize)]
struct ErrorPayload {
    message: String,
}

/// Decode one inbound text frame.
/// Malformed frames are an error for the caller to log and drop; a bad
/// frame must never take the connection down.
pub fn decode(raw: &str) -> Result<ServerEvent> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ClientError::ProtocolError(format!("Malformed frame: {}", e)))?;

    let kind = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or_else(|| ClientError::ProtocolError("Frame has no type field".to_string()))?
        .to_string();

    // Payload fields live under `data` when present, otherwise at the top
    let payload = match value.get("data") {
        Some(data) if data.is_object() => data.clone(),
        _ => {
            let mut flat = value.clone();
            if let Some(object) = flat.as_object_mut() {
                // In the flat shape the discriminator sits next to the
                // payload fields; strip it so it cannot shadow a payload's
                // own `type` field
                object.remove("type");
            }
            flat
        }
    };

    let event = match kind.as_str() {
        "pong" => ServerEvent::Pong,
        "new_message" => {
            let message: Message = serde_json::from_value(payload)
                .map_err(|e| ClientError::ProtocolError(format!("Bad new_message: {}", e)))?;
            ServerEvent::NewMessage(message)
        }
        "message_status" => {
            let p: StatusPayload = serde_json::from_value(payload)
                .map_err(|e| ClientError::ProtocolError(format!("Bad message_status: {}", e)))?;
            ServerEvent::MessageStatus {
                conversation_id: p.conversation_id,
                message_id: p.message_id,
                status: p.status,
            }
        }
        "notification" => ServerEvent::Notification(payload),
        "user_typing" => {
            let p: TypingPayload = serde_json::from_value(payload)
                .map_err(|e| ClientError::ProtocolError(format!("Bad user_typing: {}", e)))?;
            ServerEvent::UserTyping {
                user_id: p.user_id,
                conversation_id: p.conversation_id,
                is_typing: p.is_typing,
            }
        }
        "user_status" => {
            let p: UserStatusPayload = serde_json::from_value(payload)
                .map_err(|e| ClientError::ProtocolError(format!("Bad user_status: {}", e)))?;
            ServerEvent::UserStatus {
                user_id: p.user_id,
                online: p.online,
            }
        }
        "error" => {
            let p: ErrorPayload = serde_json::from_value(payload)
                .map_err(|e| ClientError::ProtocolError(format!("Bad error frame: {}", e)))?;
            ServerEvent::Error { message: p.message }
        }
        _ => ServerEvent::Unknown(kind),
    };

    Ok(event)
}

/// Encode one outbound command frame. The `type` key is the frame
/// discriminator; a message's own `type` field travels as `messageType`
/// so the two never collide.
pub fn encode(command: &ClientCommand) -> Result<String> {
    let frame = match command {
        ClientCommand::Ping => json!({ "type": "ping" }),
        ClientCommand::Typing {
            conversation_id,
            is_typing,
        } => json!({
            "type": "typing",
            "conversation_id": conversation_id,
            "is_typing": is_typing,
        }),
        ClientCommand::Message(message) => {
            let mut frame = serde_json::to_value(message)?;
            if let Some(object) = frame.as_object_mut() {
                if let Some(message_type) = object.remove("type") {
                    object.insert("messageType".to_string(), message_type);
                }
                object.insert("type".to_string(), json!("message"));
            }
            frame
        }
    };
    Ok(frame.to_string())
}
