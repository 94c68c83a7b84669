/// REST collaborator for the chat backend.
/// Thin wrappers over the fixed server contract: message persistence,
/// conversation listing and pagination, read receipts, and contact search.
/// This layer defines no server behavior; the reconciliation engine decides
/// how responses merge with push-delivered state.

use crate::error::{ClientError, Result};
use crate::models::{Contact, Conversation, Message, SendMessageRequest};

pub struct ServerClient {
    base_url: String,
    client: reqwest::Client,
}

impl ServerClient {
    pub fn new(server_url: String) -> Self {
        ServerClient {
            base_url: server_url,
            client: reqwest::Client::new(),
        }
    }

    /// Persist a message. A `conversation_id` of `None` asks the server to
    /// create the conversation; the response carries the final record with
    /// its server-assigned id.
    pub async fn send_message(&self, request: &SendMessageRequest) -> Result<Message> {
        let url = format!("{}/messages", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::HttpError(format!("Failed to send message: {}", e)))?;

        if !response.status().is_success() {
            return Err(ClientError::ServerError(format!(
                "Failed to send message: {}",
                response.status()
            )));
        }

        let message = response
            .json::<Message>()
            .await
            .map_err(|e| ClientError::HttpError(format!("Failed to parse message: {}", e)))?;

        Ok(message)
    }

    /// Fetch the conversation listing
    pub async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let url = format!("{}/conversations", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::HttpError(format!("Failed to list conversations: {}", e)))?;

        if !response.status().is_success() {
            return Err(ClientError::ServerError(format!(
                "Failed to list conversations: {}",
                response.status()
            )));
        }

        let conversations = response
            .json::<Vec<Conversation>>()
            .await
            .map_err(|e| ClientError::HttpError(format!("Failed to parse conversations: {}", e)))?;

        Ok(conversations)
    }

    /// Fetch one page of a conversation's messages
    pub async fn fetch_messages(
        &self,
        conversation_id: &str,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Message>> {
        let url = format!(
            "{}/conversations/{}/messages?skip={}&limit={}",
            self.base_url, conversation_id, skip, limit
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::HttpError(format!("Failed to fetch messages: {}", e)))?;

        if !response.status().is_success() {
            return Err(ClientError::ServerError(format!(
                "Failed to fetch messages: {}",
                response.status()
            )));
        }

        let messages = response
            .json::<Vec<Message>>()
            .await
            .map_err(|e| ClientError::HttpError(format!("Failed to parse messages: {}", e)))?;

        Ok(messages)
    }

    /// Reset the server-side unread counter for a conversation
    pub async fn mark_read(&self, conversation_id: &str) -> Result<()> {
        let url = format!("{}/conversations/{}/read", self.base_url, conversation_id);

        let response = self
            .client
            .put(&url)
            .send()
            .await
            .map_err(|e| ClientError::HttpError(format!("Failed to mark read: {}", e)))?;

        if !response.status().is_success() {
            return Err(ClientError::ServerError(format!(
                "Failed to mark read: {}",
                response.status()
            )));
        }

        Ok(())
    }

    /// Search for chat targets by name
    pub async fn search_contacts(&self, query: &str) -> Result<Vec<Contact>> {
        let mut url = url::Url::parse(&format!("{}/contacts", self.base_url))
            .map_err(|e| ClientError::ConfigError(format!("Invalid server URL: {}", e)))?;
        url.query_pairs_mut().append_pair("query", query);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::HttpError(format!("Failed to search contacts: {}", e)))?;

        if !response.status().is_success() {
            return Err(ClientError::ServerError(format!(
                "Failed to search contacts: {}",
                response.status()
            )));
        }

        let contacts = response
            .json::<Vec<Contact>>()
            .await
            .map_err(|e| ClientError::HttpError(format!("Failed to parse contacts: {}", e)))?;

        Ok(contacts)
    }
}
