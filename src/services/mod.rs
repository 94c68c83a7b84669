/// Service layer for the telehealth chat client.
/// Connection lifecycle, event routing, cache reconciliation, presence,
/// and the REST collaborator.

pub mod chat_client;
pub mod chat_store;
pub mod connection_manager;
pub mod event_router;
pub mod presence;
pub mod server_client;

pub use chat_client::ChatClient;
pub use chat_store::ChatStore;
pub use connection_manager::{
    backoff_delay, ConnectionManager, ConnectionState, HEARTBEAT_INTERVAL, MAX_RECONNECT_ATTEMPTS,
};
pub use presence::PresenceTracker;
pub use server_client::ServerClient;
