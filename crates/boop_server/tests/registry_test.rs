//! Session directory and matchmaking pool.

use boop_rules::Player;
use boop_server::{Registry, RegistryError, ServerMessage};
use tokio::sync::mpsc;

fn outbox() -> (
    mpsc::UnboundedSender<ServerMessage>,
    mpsc::UnboundedReceiver<ServerMessage>,
) {
    mpsc::unbounded_channel()
}

#[test]
fn test_created_session_is_pooled() {
    let registry = Registry::new();
    let (tx, _rx) = outbox();

    let (session, player) = registry.create(tx);

    assert_eq!(player, Player::One);
    assert_eq!(session.id().len(), 6);
    assert_eq!(registry.waiting_ids(), vec![session.id().to_string()]);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_join_takes_session_out_of_pool() {
    let registry = Registry::new();
    let (tx1, _rx1) = outbox();
    let (tx2, _rx2) = outbox();
    let (created, _) = registry.create(tx1);

    let (joined, player) = registry.join(created.id(), tx2).expect("waiting session");

    assert_eq!(player, Player::Two);
    assert_eq!(joined.id(), created.id());
    assert!(joined.is_full());
    assert!(registry.waiting_ids().is_empty());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_join_unknown_session() {
    let registry = Registry::new();
    let (tx, _rx) = outbox();

    let result = registry.join("ZZZZZZ", tx);
    assert_eq!(
        result.map(|(_, player)| player),
        Err(RegistryError::GameNotFound("ZZZZZZ".to_string()))
    );
}

#[test]
fn test_join_full_session() {
    let registry = Registry::new();
    let (tx1, _rx1) = outbox();
    let (tx2, _rx2) = outbox();
    let (tx3, _rx3) = outbox();
    let (session, _) = registry.create(tx1);
    registry.join(session.id(), tx2).unwrap();

    let result = registry.join(session.id(), tx3);
    assert_eq!(
        result.map(|(_, player)| player),
        Err(RegistryError::GameFull(session.id().to_string()))
    );
}

#[test]
fn test_session_survives_one_departure() {
    let registry = Registry::new();
    let (tx1, _rx1) = outbox();
    let (tx2, _rx2) = outbox();
    let (session, _) = registry.create(tx1);
    registry.join(session.id(), tx2).unwrap();

    registry.leave(&session, Player::One);
    assert!(registry.get(session.id()).is_some());
    assert_eq!(session.player_count(), 1);

    registry.leave(&session, Player::Two);
    assert!(registry.get(session.id()).is_none());
    assert!(registry.is_empty());
}

#[test]
fn test_abandoned_waiting_session_is_torn_down() {
    let registry = Registry::new();
    let (tx1, _rx1) = outbox();
    let (tx2, _rx2) = outbox();
    let (session, _) = registry.create(tx1);
    let id = session.id().to_string();

    registry.leave(&session, Player::One);

    assert!(registry.waiting_ids().is_empty());
    assert!(registry.is_empty());
    assert_eq!(
        registry.join(&id, tx2).map(|(_, player)| player),
        Err(RegistryError::GameNotFound(id))
    );
}

#[test]
fn test_pool_is_oldest_first() {
    let registry = Registry::new();
    let (tx1, _rx1) = outbox();
    let (tx2, _rx2) = outbox();
    let (first, _) = registry.create(tx1);
    let (second, _) = registry.create(tx2);

    assert_eq!(
        registry.waiting_ids(),
        vec![first.id().to_string(), second.id().to_string()]
    );
}

#[test]
fn test_clones_share_the_directory() {
    let registry = Registry::new();
    let handle = registry.clone();
    let (tx, _rx) = outbox();

    let (session, _) = registry.create(tx);
    assert!(handle.get(session.id()).is_some());
}
