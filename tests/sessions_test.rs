// ABOUTME: Integration tests for session issuance, refresh-token verification, and logout

mod common;

use chrono::{Duration, Utc};
use common::{active_tenant, active_user, jwt_config, MemoryStore};
use talentgate_iam::auth::AuthManager;
use talentgate_iam::errors::ErrorCode;
use talentgate_iam::models::TenantStatus;
use talentgate_iam::sessions::{ClientMeta, SessionManager};

fn client() -> ClientMeta {
    ClientMeta {
        ip_address: "198.51.100.4".to_owned(),
        user_agent: "integration-test".to_owned(),
    }
}

#[tokio::test]
async fn test_establish_persists_refresh_token_and_session() {
    let store = MemoryStore::new();
    let tenant = active_tenant(5);
    store.seed_tenant(&tenant);
    let user = active_user(tenant.id, "pat@initech.test", &["jobs:read"]);
    store.seed_user(&user);

    let sessions = SessionManager::new(store.clone(), AuthManager::new(&jwt_config()));
    let tokens = sessions
        .establish(user.clone(), tenant.clone(), &client())
        .await
        .unwrap();

    assert_eq!(tokens.token_type, "Bearer");
    assert!(tokens.user.last_login_at.is_some());

    let rows = store.refresh_tokens.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].token, tokens.refresh_token);
    assert!(!rows[0].is_revoked);
    drop(rows);

    let session_rows = store.sessions.lock().unwrap();
    assert_eq!(session_rows.len(), 1);
    assert_eq!(session_rows[0].ip_address, "198.51.100.4");
}

#[tokio::test]
async fn test_refresh_requires_signature_and_live_row() {
    let store = MemoryStore::new();
    let tenant = active_tenant(5);
    store.seed_tenant(&tenant);
    let user = active_user(tenant.id, "pat@initech.test", &["jobs:read"]);
    store.seed_user(&user);

    let auth = AuthManager::new(&jwt_config());
    let sessions = SessionManager::new(store.clone(), auth.clone());
    let tokens = sessions
        .establish(user.clone(), tenant.clone(), &client())
        .await
        .unwrap();

    // happy path
    let refreshed = sessions
        .refresh_access_token(&tokens.refresh_token)
        .await
        .unwrap();
    let claims = auth.validate_access_token(&refreshed.access_token).unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);

    // a validly signed token with no stored row is refused
    let orphan = auth.generate_refresh_token(user.id).unwrap();
    let err = sessions.refresh_access_token(&orphan).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);

    // garbage fails on signature before any lookup
    assert!(sessions.refresh_access_token("garbage").await.is_err());
}

#[tokio::test]
async fn test_refresh_rejected_when_row_revoked_or_expired() {
    let store = MemoryStore::new();
    let tenant = active_tenant(5);
    store.seed_tenant(&tenant);
    let user = active_user(tenant.id, "pat@initech.test", &["jobs:read"]);
    store.seed_user(&user);

    let sessions = SessionManager::new(store.clone(), AuthManager::new(&jwt_config()));
    let tokens = sessions
        .establish(user.clone(), tenant.clone(), &client())
        .await
        .unwrap();

    // revoked row: signature is still valid but the presentation fails
    {
        let mut rows = store.refresh_tokens.lock().unwrap();
        rows[0].is_revoked = true;
    }
    let err = sessions
        .refresh_access_token(&tokens.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Revoked);

    // expired row
    {
        let mut rows = store.refresh_tokens.lock().unwrap();
        rows[0].is_revoked = false;
        rows[0].expires_at = Utc::now() - Duration::hours(1);
    }
    let err = sessions
        .refresh_access_token(&tokens.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Expired);
}

#[tokio::test]
async fn test_refresh_rejected_for_inactive_tenant() {
    let store = MemoryStore::new();
    let tenant = active_tenant(5);
    store.seed_tenant(&tenant);
    let user = active_user(tenant.id, "pat@initech.test", &["jobs:read"]);
    store.seed_user(&user);

    let sessions = SessionManager::new(store.clone(), AuthManager::new(&jwt_config()));
    let tokens = sessions
        .establish(user, tenant, &client())
        .await
        .unwrap();

    {
        let mut tenants = store.tenants.lock().unwrap();
        tenants[0].status = TenantStatus::Suspended;
    }
    let err = sessions
        .refresh_access_token(&tokens.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::TenantInactive);
}

#[tokio::test]
async fn test_logout_revokes_every_token_and_session() {
    let store = MemoryStore::new();
    let tenant = active_tenant(5);
    store.seed_tenant(&tenant);
    let user = active_user(tenant.id, "pat@initech.test", &["jobs:read"]);
    store.seed_user(&user);

    let sessions = SessionManager::new(store.clone(), AuthManager::new(&jwt_config()));

    // two concurrent sessions for the same principal
    let first = sessions
        .establish(user.clone(), tenant.clone(), &client())
        .await
        .unwrap();
    let second = sessions
        .establish(user.clone(), tenant.clone(), &client())
        .await
        .unwrap();

    sessions.logout(user.id).await.unwrap();

    // all refresh tokens revoked, not just the latest
    let rows = store.refresh_tokens.lock().unwrap();
    assert!(rows.iter().all(|t| t.is_revoked));
    drop(rows);
    assert!(store.sessions.lock().unwrap().is_empty());

    // neither token refreshes any more
    assert!(sessions.refresh_access_token(&first.refresh_token).await.is_err());
    assert!(sessions.refresh_access_token(&second.refresh_token).await.is_err());
}
