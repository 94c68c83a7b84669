/// Connection Lifecycle Tests for the telechat client
/// Covers the reconnection backoff schedule and the observable state
/// machine. Live socket paths need a real endpoint and are intentionally
/// not exercised here; the policy they follow is tested as pure logic.

use std::time::Duration;
use telechat_client::services::{
    backoff_delay, ConnectionManager, ConnectionState, MAX_RECONNECT_ATTEMPTS,
};
use telechat_client::ClientConfig;

fn config(user: &str) -> ClientConfig {
    ClientConfig::new(
        "http://localhost:4000".to_string(),
        user.to_string(),
        "secret".to_string(),
    )
}

// ============================================================================
// BACKOFF POLICY
// ============================================================================

#[test]
fn test_backoff_schedule_doubles_then_caps() {
    // min(1000 * 2^n, 5000) for attempt n
    assert_eq!(backoff_delay(0), Duration::from_millis(1000));
    assert_eq!(backoff_delay(1), Duration::from_millis(2000));
    assert_eq!(backoff_delay(2), Duration::from_millis(4000));
    assert_eq!(backoff_delay(3), Duration::from_millis(5000));
    assert_eq!(backoff_delay(4), Duration::from_millis(5000));
}

#[test]
fn test_backoff_is_monotonic_within_the_attempt_budget() {
    let mut previous = Duration::ZERO;
    for attempt in 0..MAX_RECONNECT_ATTEMPTS {
        let delay = backoff_delay(attempt);
        assert!(delay >= previous);
        previous = delay;
    }
    assert_eq!(MAX_RECONNECT_ATTEMPTS, 5);
}

#[test]
fn test_backoff_never_overflows_for_large_attempts() {
    assert_eq!(backoff_delay(u32::MAX), Duration::from_millis(5000));
}

// ============================================================================
// STATE MACHINE OBSERVABILITY
// ============================================================================

#[test]
fn test_manager_starts_idle() {
    let (manager, _events) = ConnectionManager::new(config("alice"));
    assert_eq!(manager.state(), ConnectionState::Idle);
    assert!(!manager.is_open());
}

#[tokio::test]
async fn test_connect_without_user_id_is_a_no_op() {
    let (manager, _events) = ConnectionManager::new(config(""));
    manager.connect().await.unwrap();
    assert_eq!(manager.state(), ConnectionState::Idle);
}

#[tokio::test]
async fn test_disconnect_is_observable_and_disables_reconnect() {
    let (manager, _events) = ConnectionManager::new(config("alice"));
    let mut subscriber = manager.subscribe();

    manager.disconnect().await;

    assert_eq!(manager.state(), ConnectionState::Closed);
    // Subscribers see the transition without polling the manager
    assert!(subscriber.has_changed().unwrap());
    assert_eq!(*subscriber.borrow_and_update(), ConnectionState::Closed);
}

#[tokio::test]
async fn test_commands_are_rejected_while_disconnected() {
    use telechat_client::protocol::ClientCommand;

    let (manager, _events) = ConnectionManager::new(config("alice"));
    assert!(manager.send_command(&ClientCommand::Ping).await.is_err());

    manager.disconnect().await;
    assert!(manager.send_command(&ClientCommand::Ping).await.is_err());
}
