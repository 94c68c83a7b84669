/// Telehealth Chat Client Library
/// Realtime chat synchronization core: connection management, wire
/// protocol, and client-side cache reconciliation.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod protocol;
pub mod services;

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use services::{ChatClient, ConnectionState};
