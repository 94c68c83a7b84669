/// Error types for the telehealth chat client.
/// Provides comprehensive error handling for all client operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Server communication error: {0}")]
    ServerError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("WebSocket error: {0}")]
    WebSocketError(String),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("State error: {0}")]
    StateError(String),

    #[error("Message error: {0}")]
    MessageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::WebSocketError("connection refused".to_string());
        assert!(err.to_string().contains("WebSocket error"));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let client_err: ClientError = json_err.into();
        assert!(client_err.to_string().contains("JSON error"));
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        let err_result: Result<i32> = Err(ClientError::StateError("invalid state".to_string()));

        assert!(ok_result.is_ok());
        assert!(err_result.is_err());
    }
}
