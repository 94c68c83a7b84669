/// Configuration for a chat client session.
/// Holds the REST and WebSocket endpoints plus the session credentials.

use crate::error::{ClientError, Result};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API (e.g. http://localhost:4000)
    pub server_url: String,
    /// Identifier of the signed-in user
    pub user_id: String,
    /// Auth credential attached to the WebSocket URL as a query parameter
    pub token: String,
}

impl ClientConfig {
    pub fn new(server_url: String, user_id: String, token: String) -> Self {
        ClientConfig {
            server_url,
            user_id,
            token,
        }
    }

    /// WebSocket endpoint for this user. The credential travels as a query
    /// parameter because the transport cannot carry custom headers.
    pub fn websocket_url(&self) -> Result<String> {
        if self.user_id.is_empty() {
            return Err(ClientError::ConfigError("user id is empty".to_string()));
        }

        let ws_base = self
            .server_url
            .replace("http://", "ws://")
            .replace("https://", "wss://");

        let mut url = url::Url::parse(&format!("{}/ws/{}", ws_base, self.user_id))
            .map_err(|e| ClientError::ConfigError(format!("Invalid server URL: {}", e)))?;
        if !self.token.is_empty() {
            url.query_pairs_mut().append_pair("token", &self.token);
        }

        Ok(url.to_string())
    }
}
