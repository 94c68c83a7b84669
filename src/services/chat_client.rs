/// Chat client - main orchestrator for one user session.
/// Owns the session singletons (connection, cache, presence, REST client)
/// with an explicit start/stop lifecycle and exposes the query/command
/// surface consumed by the UI. All cache mutation flows through the
/// reconciliation engine; the event pump feeds it pushed events.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::models::{Contact, Conversation, Message, SendMessageRequest};
use crate::protocol::{ClientCommand, ServerEvent};
use crate::services::{
    event_router, ChatStore, ConnectionManager, ConnectionState, PresenceTracker, ServerClient,
};
use log::info;
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;

pub struct ChatClient {
    config: ClientConfig,
    store: Arc<Mutex<ChatStore>>,
    presence: Arc<Mutex<PresenceTracker>>,
    server: Arc<ServerClient>,
    connection: Arc<ConnectionManager>,
    event_rx: Mutex<Option<mpsc::UnboundedReceiver<ServerEvent>>>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl ChatClient {
    pub fn new(config: ClientConfig) -> Self {
        let store = Arc::new(Mutex::new(ChatStore::new(config.user_id.clone())));
        let presence = Arc::new(Mutex::new(PresenceTracker::new()));
        let server = Arc::new(ServerClient::new(config.server_url.clone()));
        let (connection, event_rx) = ConnectionManager::new(config.clone());

        ChatClient {
            config,
            store,
            presence,
            server,
            connection: Arc::new(connection),
            event_rx: Mutex::new(Some(event_rx)),
            pump: Mutex::new(None),
        }
    }

    /// Open the realtime connection and start the event pump. Each pushed
    /// event runs to completion against the cache before the next one is
    /// taken, so handlers never race each other.
    pub async fn start(&self) -> Result<()> {
        let event_rx = self.event_rx.lock().await.take();
        let mut event_rx = match event_rx {
            Some(rx) => rx,
            None => return Err(ClientError::StateError("Client already started".to_string())),
        };

        self.connection.connect().await?;

        let store = self.store.clone();
        let presence = self.presence.clone();
        let handle = tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                let mut store = store.lock().await;
                let mut presence = presence.lock().await;
                event_router::route(event, &mut store, &mut presence);
            }
        });
        self.pump.lock().await.replace(handle);

        info!("Chat client started for user {}", self.config.user_id);
        Ok(())
    }

    /// Stop the event pump and tear down the connection (logout/teardown)
    pub async fn stop(&self) {
        self.connection.disconnect().await;
        if let Some(handle) = self.pump.lock().await.take() {
            handle.abort();
        }
        info!("Chat client stopped for user {}", self.config.user_id);
    }

    /// Send a message to a peer. Reuses the existing conversation for this
    /// participant pair when one is cached; otherwise the server creates
    /// one. The message appears immediately as a Sending placeholder and is
    /// either confirmed in place or rolled back on failure. There is no
    /// automatic retry; resending is the caller's decision.
    pub async fn send_message(&self, receiver_id: &str, content: &str) -> Result<Message> {
        if content.is_empty() {
            return Err(ClientError::MessageError(
                "Cannot send empty message".to_string(),
            ));
        }

        let conversation_id = {
            let store = self.store.lock().await;
            store
                .find_with_participant(receiver_id)
                .map(|c| c.id.clone())
        };
        let pending_key = conversation_id
            .clone()
            .unwrap_or_else(|| Conversation::NEW_ID.to_string());

        let pending = Message::pending(
            pending_key.clone(),
            self.config.user_id.clone(),
            receiver_id.to_string(),
            content.to_string(),
        );
        let temp_id = self.store.lock().await.insert_pending(pending);

        let request = SendMessageRequest {
            sender_id: self.config.user_id.clone(),
            receiver_id: receiver_id.to_string(),
            content: content.to_string(),
            message_type: "text".to_string(),
            conversation_id,
        };

        match self.server.send_message(&request).await {
            Ok(confirmed) => {
                let created_conversation = confirmed.conversation_id != pending_key;
                let confirmed_conversation_id = confirmed.conversation_id.clone();
                {
                    let mut store = self.store.lock().await;
                    if created_conversation {
                        // The placeholder lives under the "new" sentinel;
                        // move the record to its real conversation
                        store.rollback_pending(&pending_key, &temp_id);
                    }
                    store.confirm_pending(&confirmed_conversation_id, confirmed.clone());
                }
                if created_conversation {
                    // Pick up the server-created conversation row
                    self.load_conversations().await?;
                }
                Ok(confirmed)
            }
            Err(e) => {
                self.store
                    .lock()
                    .await
                    .rollback_pending(&pending_key, &temp_id);
                Err(e)
            }
        }
    }

    /// Fetch the conversation listing and replace the cached copy
    pub async fn load_conversations(&self) -> Result<()> {
        let listing = self.server.list_conversations().await?;
        self.store.lock().await.upsert_conversations(listing);
        Ok(())
    }

    /// Refetch the listing when a push referenced an unknown conversation
    pub async fn refresh_if_stale(&self) -> Result<()> {
        let stale = self.store.lock().await.listing_stale();
        if stale {
            self.load_conversations().await?;
        }
        Ok(())
    }

    /// Fetch one page of messages and merge it into the cached window.
    /// `skip = 0` replaces the window; `skip > 0` prepends older history.
    pub async fn load_messages(
        &self,
        conversation_id: &str,
        skip: usize,
        limit: usize,
    ) -> Result<()> {
        let page = self
            .server
            .fetch_messages(conversation_id, skip, limit)
            .await?;
        self.store
            .lock()
            .await
            .merge_page(conversation_id, skip, page);
        Ok(())
    }

    /// Zero the unread counter locally and issue the read receipt
    pub async fn mark_read(&self, conversation_id: &str) -> Result<()> {
        self.store.lock().await.mark_read(conversation_id);
        self.server.mark_read(conversation_id).await
    }

    /// Signal typing state over the live connection. Callers debounce: at
    /// most one `true` per second of continuous input, and a single `false`
    /// one second after the last keystroke.
    pub async fn set_typing(&self, conversation_id: &str, is_typing: bool) -> Result<()> {
        self.connection
            .send_command(&ClientCommand::Typing {
                conversation_id: conversation_id.to_string(),
                is_typing,
            })
            .await
    }

    /// Is this peer currently typing in this conversation?
    pub async fn is_typing(&self, user_id: &str, conversation_id: &str) -> bool {
        self.presence.lock().await.is_typing(user_id, conversation_id)
    }

    /// Search for chat targets by name
    pub async fn search_contacts(&self, query: &str) -> Result<Vec<Contact>> {
        self.server.search_contacts(query).await
    }

    /// Snapshot of the cached conversation listing
    pub async fn conversations(&self) -> Vec<Conversation> {
        self.store.lock().await.conversations().to_vec()
    }

    /// Snapshot of a conversation's cached message window
    pub async fn messages(&self, conversation_id: &str) -> Vec<Message> {
        self.store.lock().await.messages(conversation_id).to_vec()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Observe connection transitions (reconnecting banner, terminal
    /// disconnect)
    pub fn subscribe_connection(&self) -> watch::Receiver<ConnectionState> {
        self.connection.subscribe()
    }
}
