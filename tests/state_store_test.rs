// ABOUTME: Integration tests for the OAuth state store: one-time reads, TTL, validation

use std::time::Duration;
use talentgate_iam::models::OAuthProviderKind;
use talentgate_iam::state_store::memory::MemoryStateStore;
use talentgate_iam::state_store::{OAuthStateStore, StateData};

fn payload(invitation: Option<&str>) -> StateData {
    StateData {
        provider: OAuthProviderKind::Google,
        invitation_token: invitation.map(ToOwned::to_owned),
    }
}

#[tokio::test]
async fn test_state_tokens_are_unguessable_and_unique() {
    let store = MemoryStateStore::new(Duration::from_secs(600));
    let a = store.generate_state();
    let b = store.generate_state();
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_get_state_data_returns_payload_exactly_once() {
    let store = MemoryStateStore::new(Duration::from_secs(600));
    let state = store.generate_state();
    store
        .store_state(&state, payload(Some("invite-token")))
        .await
        .unwrap();

    let data = store.get_state_data(&state).await.unwrap();
    assert_eq!(data.provider, OAuthProviderKind::Google);
    assert_eq!(data.invitation_token.as_deref(), Some("invite-token"));

    // second read fails with invalid state
    assert!(store.get_state_data(&state).await.is_err());
}

#[tokio::test]
async fn test_validate_state_is_non_destructive() {
    let store = MemoryStateStore::new(Duration::from_secs(600));
    let state = store.generate_state();
    store.store_state(&state, payload(None)).await.unwrap();

    assert!(store.validate_state(&state).await.unwrap());
    assert!(store.validate_state(&state).await.unwrap());

    // the payload is still there for the destructive read
    assert!(store.get_state_data(&state).await.is_ok());
    // and now it is gone
    assert!(!store.validate_state(&state).await.unwrap());
}

#[tokio::test]
async fn test_unknown_state_is_invalid() {
    let store = MemoryStateStore::new(Duration::from_secs(600));
    assert!(!store.validate_state("nope").await.unwrap());
    assert!(store.get_state_data("nope").await.is_err());
}

#[tokio::test]
async fn test_expired_state_is_invalid_on_both_paths() {
    let store = MemoryStateStore::new(Duration::from_millis(20));
    let state = store.generate_state();
    store.store_state(&state, payload(None)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!store.validate_state(&state).await.unwrap());
    assert!(store.get_state_data(&state).await.is_err());
}

#[tokio::test]
async fn test_background_sweep_removes_expired_entries() {
    let store =
        MemoryStateStore::with_background_sweep(Duration::from_millis(10), Duration::from_millis(20));
    let state = store.generate_state();
    store.store_state(&state, payload(None)).await.unwrap();
    assert_eq!(store.len(), 1);

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(store.is_empty());
}
