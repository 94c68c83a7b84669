/// Connection manager for the realtime chat channel.
/// Maintains at most one live WebSocket per user session, recovering from
/// transient failures with capped exponential backoff and detecting
/// liveness through a periodic ping heartbeat. Every state transition is
/// published on a watch channel so the UI can render connection status.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::protocol::{self, ClientCommand, ServerEvent};
use futures::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Open,
    Closing,
    Closed,
    /// Terminal: reconnect attempts exhausted, a new `connect` is required
    Failed,
}

/// Ping cadence while the connection is open
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(25);

/// Consecutive failures tolerated before giving up
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Delay before reconnect attempt `attempt` (0-based): doubles from 1s,
/// capped at 5s
pub fn backoff_delay(attempt: u32) -> Duration {
    let millis = 1000u64.saturating_mul(1u64 << attempt.min(16));
    Duration::from_millis(millis.min(5000))
}

pub struct ConnectionManager {
    config: ClientConfig,
    state_tx: Arc<watch::Sender<ConnectionState>>,
    state_rx: watch::Receiver<ConnectionState>,
    events: mpsc::UnboundedSender<ServerEvent>,
    command_tx: Arc<Mutex<Option<mpsc::UnboundedSender<String>>>>,
    reconnect_enabled: Arc<AtomicBool>,
    attempts: Arc<AtomicU32>,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl ConnectionManager {
    /// Create a manager plus the receiving end of its decoded-event channel.
    /// The receiver is consumed by the event pump, keeping the transport and
    /// the cache decoupled.
    pub fn new(config: ClientConfig) -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Idle);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let manager = ConnectionManager {
            config,
            state_tx: Arc::new(state_tx),
            state_rx,
            events: event_tx,
            command_tx: Arc::new(Mutex::new(None)),
            reconnect_enabled: Arc::new(AtomicBool::new(false)),
            attempts: Arc::new(AtomicU32::new(0)),
            tasks: Arc::new(Mutex::new(Vec::new())),
        };

        (manager, event_rx)
    }

    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Observe every state transition (reconnecting banner, terminal
    /// disconnect signal)
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Open the connection and keep it alive. No-op when already open or
    /// connecting, or when no user id is configured.
    pub async fn connect(&self) -> Result<()> {
        match self.state() {
            ConnectionState::Open | ConnectionState::Connecting => {
                debug!("Connect ignored, already {:?}", self.state());
                return Ok(());
            }
            _ => {}
        }

        if self.config.user_id.is_empty() {
            warn!("Connect ignored, no user id configured");
            return Ok(());
        }

        let ws_url = self.config.websocket_url()?;

        self.reconnect_enabled.store(true, Ordering::SeqCst);
        self.attempts.store(0, Ordering::SeqCst);
        self.set_state(ConnectionState::Connecting);

        let manager = self.clone_for_spawn();
        let handle = tokio::spawn(async move {
            manager.run(ws_url).await;
        });
        self.tasks.lock().await.push(handle);

        Ok(())
    }

    /// Tear the connection down and disable auto-reconnect until the next
    /// explicit `connect`
    pub async fn disconnect(&self) {
        self.reconnect_enabled.store(false, Ordering::SeqCst);
        self.set_state(ConnectionState::Closing);

        for handle in self.tasks.lock().await.drain(..) {
            handle.abort();
        }
        self.command_tx.lock().await.take();

        self.set_state(ConnectionState::Closed);
        info!("Connection closed for user {}", self.config.user_id);
    }

    /// Queue an outbound command frame on the live connection
    pub async fn send_command(&self, command: &ClientCommand) -> Result<()> {
        let raw = protocol::encode(command)?;

        let tx = self.command_tx.lock().await;
        match tx.as_ref() {
            Some(sender) => sender
                .send(raw)
                .map_err(|_| ClientError::WebSocketError("Connection writer is gone".to_string())),
            None => Err(ClientError::StateError("Not connected".to_string())),
        }
    }

    fn set_state(&self, state: ConnectionState) {
        self.state_tx.send_replace(state);
    }

    fn clone_for_spawn(&self) -> ConnectionManager {
        ConnectionManager {
            config: self.config.clone(),
            state_tx: self.state_tx.clone(),
            state_rx: self.state_rx.clone(),
            events: self.events.clone(),
            command_tx: self.command_tx.clone(),
            reconnect_enabled: self.reconnect_enabled.clone(),
            attempts: self.attempts.clone(),
            tasks: self.tasks.clone(),
        }
    }

    /// Connect-session-reconnect loop. Network errors and server closes are
    /// treated identically: both feed the same bounded backoff.
    async fn run(&self, ws_url: String) {
        loop {
            match connect_async(&ws_url).await {
                Ok((stream, _)) => {
                    info!("Connection open for user {}", self.config.user_id);
                    self.attempts.store(0, Ordering::SeqCst);
                    self.set_state(ConnectionState::Open);

                    self.run_session(stream).await;
                    info!("Connection lost for user {}", self.config.user_id);
                }
                Err(e) => {
                    warn!("Connection attempt failed: {}", e);
                }
            }

            self.command_tx.lock().await.take();
            self.set_state(ConnectionState::Closed);

            if !self.reconnect_enabled.load(Ordering::SeqCst) {
                return;
            }

            let attempt = self.attempts.load(Ordering::SeqCst);
            if attempt >= MAX_RECONNECT_ATTEMPTS {
                error!(
                    "Giving up after {} reconnect attempts, manual reconnect required",
                    attempt
                );
                self.set_state(ConnectionState::Failed);
                return;
            }

            let delay = backoff_delay(attempt);
            self.attempts.store(attempt + 1, Ordering::SeqCst);
            info!("Reconnecting in {:?} (attempt {})", delay, attempt + 1);
            tokio::time::sleep(delay).await;

            if !self.reconnect_enabled.load(Ordering::SeqCst) {
                return;
            }
            self.set_state(ConnectionState::Connecting);
        }
    }

    /// Drive one open session: heartbeat ticks, outbound command relay, and
    /// inbound frame decoding. Returns when the socket closes or errors.
    async fn run_session(&self, stream: WebSocketStream<MaybeTlsStream<TcpStream>>) {
        let (mut sink, mut source) = stream.split();

        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<String>();
        self.command_tx.lock().await.replace(cmd_tx);

        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        // The first tick completes immediately; consume it so pings start
        // one interval after open
        heartbeat.tick().await;

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    let ping = match protocol::encode(&ClientCommand::Ping) {
                        Ok(raw) => raw,
                        Err(e) => {
                            error!("Failed to encode ping: {}", e);
                            continue;
                        }
                    };
                    if sink.send(Message::Text(ping.into())).await.is_err() {
                        break;
                    }
                }
                Some(raw) = cmd_rx.recv() => {
                    if sink.send(Message::Text(raw.into())).await.is_err() {
                        break;
                    }
                }
                frame = source.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => match protocol::decode(&text) {
                            Ok(event) => {
                                let _ = self.events.send(event);
                            }
                            // A bad frame never takes the connection down
                            Err(e) => warn!("Dropping undecodable frame: {}", e),
                        },
                        Some(Ok(Message::Close(_))) => {
                            info!("Connection closed by server");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            error!("Transport error: {}", e);
                            break;
                        }
                        None => break,
                    }
                }
            }
        }
    }
}
