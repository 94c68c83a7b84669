/// Typing presence tracker.
/// Keeps the ephemeral set of "peer is typing in conversation X" facts fed
/// by push events. Facts expire after a bounded TTL so a peer that
/// disconnects mid-typing cannot leave a stale indicator behind.

use std::collections::HashMap;
use std::time::{Duration, Instant};

pub struct PresenceTracker {
    typing: HashMap<(String, String), Instant>,
    ttl: Duration,
}

impl PresenceTracker {
    /// Covers the caller-side 1s debounce interval with generous slack
    pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

    pub fn new() -> Self {
        Self::with_ttl(Self::DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        PresenceTracker {
            typing: HashMap::new(),
            ttl,
        }
    }

    /// Apply a typing push event
    pub fn apply(&mut self, user_id: &str, conversation_id: &str, is_typing: bool) {
        let key = (user_id.to_string(), conversation_id.to_string());
        if is_typing {
            self.typing.insert(key, Instant::now());
        } else {
            self.typing.remove(&key);
        }
    }

    /// Is this user currently typing in this conversation?
    pub fn is_typing(&self, user_id: &str, conversation_id: &str) -> bool {
        self.typing
            .get(&(user_id.to_string(), conversation_id.to_string()))
            .map(|seen| seen.elapsed() < self.ttl)
            .unwrap_or(false)
    }

    /// Drop facts older than the TTL
    pub fn prune(&mut self) {
        let ttl = self.ttl;
        self.typing.retain(|_, seen| seen.elapsed() < ttl);
    }

    pub fn len(&self) -> usize {
        self.typing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.typing.is_empty()
    }
}

impl Default for PresenceTracker {
    fn default() -> Self {
        Self::new()
    }
}
