/// Wire Protocol Tests for the telechat client
/// Verifies the frame codec against the shapes real producers emit: the
/// data-wrapped and flat payload layouts, snake_case and camelCase field
/// names, unknown kinds, and malformed frames.

use telechat_client::models::MessageStatus;
use telechat_client::protocol::{decode, encode, ClientCommand, ServerEvent};

#[test]
fn test_decode_all_recognized_kinds() {
    let frames = [
        r#"{"type": "pong"}"#,
        r#"{"type": "new_message", "data": {"id": "m-1", "conversationId": "c-1", "senderId": "bob", "receiverId": "alice", "content": "hi"}}"#,
        r#"{"type": "message_status", "data": {"conversationId": "c-1", "messageId": "m-1", "status": "delivered"}}"#,
        r#"{"type": "notification", "data": {"title": "appointment"}}"#,
        r#"{"type": "user_typing", "data": {"userId": "bob", "conversationId": "c-1", "isTyping": true}}"#,
        r#"{"type": "user_status", "data": {"userId": "bob", "online": false}}"#,
        r#"{"type": "error", "data": {"message": "bad request"}}"#,
    ];

    for raw in frames {
        assert!(decode(raw).is_ok(), "failed to decode: {}", raw);
    }
}

#[test]
fn test_decode_accepts_flat_payload_shape() {
    // Some producers omit the data wrapper entirely
    let raw = r#"{"type": "message_status", "conversationId": "c-1", "messageId": "m-1", "status": "read"}"#;

    match decode(raw).unwrap() {
        ServerEvent::MessageStatus {
            conversation_id,
            message_id,
            status,
        } => {
            assert_eq!(conversation_id, "c-1");
            assert_eq!(message_id, "m-1");
            assert_eq!(status, MessageStatus::Read);
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[test]
fn test_decode_accepts_snake_case_fields() {
    let raw = r#"{"type": "user_typing", "user_id": "bob", "conversation_id": "c-1", "is_typing": false}"#;

    match decode(raw).unwrap() {
        ServerEvent::UserTyping {
            user_id,
            conversation_id,
            is_typing,
        } => {
            assert_eq!(user_id, "bob");
            assert_eq!(conversation_id, "c-1");
            assert!(!is_typing);
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[test]
fn test_flat_new_message_keeps_default_message_type() {
    // The flat shape puts the discriminator next to the payload fields;
    // it must not be read as the message's own type
    let raw = r#"{"type": "new_message", "id": "m-1", "conversationId": "c-1", "senderId": "bob", "receiverId": "alice", "content": "hi"}"#;

    match decode(raw).unwrap() {
        ServerEvent::NewMessage(message) => {
            assert_eq!(message.message_type, "text");
            assert_eq!(message.content, "hi");
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[test]
fn test_unknown_kinds_are_accepted_not_rejected() {
    // Forward compatibility: a newer server must not break older clients
    let event = decode(r#"{"type": "call_invite", "data": {"room": "r-1"}}"#).unwrap();
    assert!(matches!(event, ServerEvent::Unknown(kind) if kind == "call_invite"));
}

#[test]
fn test_malformed_frames_are_errors_for_the_caller_to_drop() {
    assert!(decode("").is_err());
    assert!(decode("not json at all").is_err());
    assert!(decode(r#"{"no_type_field": true}"#).is_err());
    assert!(decode(r#"{"type": "new_message", "data": {"id": 42}}"#).is_err());
}

#[test]
fn test_encode_outbound_commands() {
    assert_eq!(encode(&ClientCommand::Ping).unwrap(), r#"{"type":"ping"}"#);

    let typing = encode(&ClientCommand::Typing {
        conversation_id: "c-1".to_string(),
        is_typing: true,
    })
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&typing).unwrap();
    assert_eq!(value["type"], "typing");
    assert_eq!(value["conversation_id"], "c-1");
    assert_eq!(value["is_typing"], true);
}

#[test]
fn test_decoded_message_survives_command_encoding() {
    // The secondary WebSocket send path reuses the message model
    let raw = r#"{"type": "new_message", "data": {"id": "m-1", "conversationId": "c-1", "senderId": "alice", "receiverId": "bob", "content": "hi"}}"#;
    let message = match decode(raw).unwrap() {
        ServerEvent::NewMessage(message) => message,
        other => panic!("unexpected event: {:?}", other),
    };

    let encoded = encode(&ClientCommand::Message(message)).unwrap();
    // Exactly one `type` key: the frame discriminator; the message's own
    // type travels as messageType
    assert_eq!(encoded.matches("\"type\"").count(), 1);

    let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
    assert_eq!(value["type"], "message");
    assert_eq!(value["messageType"], "text");
    assert_eq!(value["conversationId"], "c-1");
    assert_eq!(value["content"], "hi");
}
