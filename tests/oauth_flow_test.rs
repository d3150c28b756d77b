// ABOUTME: Integration tests for the OAuth flow: state consumption, invitation gating,
// ABOUTME: account linking, quota enforcement, and session establishment

mod common;

use async_trait::async_trait;
use common::{active_tenant, active_user, jwt_config, pending_invitation, MemoryStore};
use std::sync::Arc;
use std::time::Duration;
use talentgate_iam::auth::AuthManager;
use talentgate_iam::errors::{AppResult, ErrorCode};
use talentgate_iam::models::{InvitationStatus, OAuthProviderKind, UserStatus};
use talentgate_iam::oauth::{
    OAuthFlow, OAuthProvider, OAuthUserInfo, ProviderRegistry, ProviderToken,
};
use talentgate_iam::sessions::{ClientMeta, SessionManager};
use talentgate_iam::state_store::memory::MemoryStateStore;

/// Provider stub returning a canned identity without touching the network
struct StubProvider {
    kind: OAuthProviderKind,
    identity: OAuthUserInfo,
}

#[async_trait]
impl OAuthProvider for StubProvider {
    fn kind(&self) -> OAuthProviderKind {
        self.kind
    }

    fn auth_url(&self, state: &str) -> String {
        format!("https://provider.test/authorize?state={state}")
    }

    async fn exchange_code(&self, _code: &str) -> AppResult<ProviderToken> {
        Ok(ProviderToken {
            access_token: "provider-access-token".to_owned(),
        })
    }

    async fn user_info(&self, _access_token: &str) -> AppResult<OAuthUserInfo> {
        Ok(self.identity.clone())
    }
}

struct Fixture {
    store: Arc<MemoryStore>,
    flow: OAuthFlow,
}

fn fixture(identity: OAuthUserInfo) -> Fixture {
    let store = MemoryStore::new();
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(StubProvider {
        kind: OAuthProviderKind::Google,
        identity,
    }));
    let state_store = Arc::new(MemoryStateStore::new(Duration::from_secs(600)));
    let sessions = SessionManager::new(store.clone(), AuthManager::new(&jwt_config()));
    let flow = OAuthFlow::new(store.clone(), registry, state_store, sessions);
    Fixture { store, flow }
}

fn google_identity(email: &str) -> OAuthUserInfo {
    OAuthUserInfo {
        provider_user_id: "google-sub-42".to_owned(),
        email: email.to_owned(),
        name: "Pat Example".to_owned(),
        picture: "https://provider.test/avatar.png".to_owned(),
        email_verified: true,
    }
}

fn client() -> ClientMeta {
    ClientMeta {
        ip_address: "203.0.113.7".to_owned(),
        user_agent: "integration-test".to_owned(),
    }
}

#[tokio::test]
async fn test_initiate_login_stores_state_and_builds_url() {
    let fx = fixture(google_identity("new@initech.test"));

    let start = fx
        .flow
        .initiate_login(OAuthProviderKind::Google, Some("invite-1".to_owned()))
        .await
        .unwrap();

    assert!(start.auth_url.contains(&start.state));
    assert!(fx.flow.validate_state(&start.state).await.unwrap());
}

#[tokio::test]
async fn test_unregistered_provider_rejected() {
    let fx = fixture(google_identity("new@initech.test"));
    let err = fx
        .flow
        .initiate_login(OAuthProviderKind::Microsoft, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_callback_without_invitation_refused() {
    let fx = fixture(google_identity("new@initech.test"));

    let start = fx
        .flow
        .initiate_login(OAuthProviderKind::Google, None)
        .await
        .unwrap();

    let err = fx
        .flow
        .handle_callback(OAuthProviderKind::Google, "code", &start.state, &client())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);
    assert!(fx.store.users.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_callback_creates_active_user_and_consumes_state() {
    let fx = fixture(google_identity("new@initech.test"));
    let tenant = active_tenant(5);
    fx.store.seed_tenant(&tenant);
    let invitation = pending_invitation(tenant.id, "new@initech.test", &["jobs:read"]);
    fx.store.seed_invitation(&invitation);

    let start = fx
        .flow
        .initiate_login(OAuthProviderKind::Google, Some(invitation.token.clone()))
        .await
        .unwrap();

    let tokens = fx
        .flow
        .handle_callback(OAuthProviderKind::Google, "code", &start.state, &client())
        .await
        .unwrap();

    assert_eq!(tokens.user.email, "new@initech.test");
    assert_eq!(tokens.user.status, UserStatus::Active);
    assert_eq!(tokens.user.oauth_provider, Some(OAuthProviderKind::Google));
    assert!(tokens.user.email_verified);
    assert!(!tokens.user.otp_enabled);

    // quota counted, invitation accepted, refresh token + session persisted
    assert_eq!(fx.store.tenants.lock().unwrap()[0].current_users, 1);
    assert_eq!(
        fx.store.invitations.lock().unwrap()[0].status,
        InvitationStatus::Accepted
    );
    assert_eq!(fx.store.refresh_tokens.lock().unwrap().len(), 1);
    assert_eq!(fx.store.sessions.lock().unwrap().len(), 1);

    // the state was consumed: replaying the callback fails
    let err = fx
        .flow
        .handle_callback(OAuthProviderKind::Google, "code", &start.state, &client())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);
}

#[tokio::test]
async fn test_callback_email_must_match_invitation() {
    let fx = fixture(google_identity("other@initech.test"));
    let tenant = active_tenant(5);
    fx.store.seed_tenant(&tenant);
    let invitation = pending_invitation(tenant.id, "invited@initech.test", &["jobs:read"]);
    fx.store.seed_invitation(&invitation);

    let start = fx
        .flow
        .initiate_login(OAuthProviderKind::Google, Some(invitation.token.clone()))
        .await
        .unwrap();

    let err = fx
        .flow
        .handle_callback(OAuthProviderKind::Google, "code", &start.state, &client())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert!(fx.store.users.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_callback_links_existing_user_even_at_quota() {
    let fx = fixture(google_identity("linked@initech.test"));
    let mut tenant = active_tenant(1);
    tenant.current_users = 1;
    fx.store.seed_tenant(&tenant);

    // existing OTP-only account for the same email
    let mut user = active_user(tenant.id, "linked@initech.test", &["jobs:read"]);
    user.otp_enabled = true;
    fx.store.seed_user(&user);

    let invitation = pending_invitation(tenant.id, "linked@initech.test", &["jobs:read"]);
    fx.store.seed_invitation(&invitation);

    let start = fx
        .flow
        .initiate_login(OAuthProviderKind::Google, Some(invitation.token.clone()))
        .await
        .unwrap();

    let tokens = fx
        .flow
        .handle_callback(OAuthProviderKind::Google, "code", &start.state, &client())
        .await
        .unwrap();

    // linked, not duplicated: the account now holds both credential types
    assert_eq!(tokens.user.id, user.id);
    assert_eq!(tokens.user.oauth_provider, Some(OAuthProviderKind::Google));
    assert!(tokens.user.otp_enabled);
    assert_eq!(fx.store.users.lock().unwrap().len(), 1);
    // quota untouched by linking
    assert_eq!(fx.store.tenants.lock().unwrap()[0].current_users, 1);
}

#[tokio::test]
async fn test_callback_new_account_rejected_at_quota() {
    let fx = fixture(google_identity("late@initech.test"));
    let mut tenant = active_tenant(1);
    tenant.current_users = 1;
    fx.store.seed_tenant(&tenant);

    let invitation = pending_invitation(tenant.id, "late@initech.test", &["jobs:read"]);
    fx.store.seed_invitation(&invitation);

    let start = fx
        .flow
        .initiate_login(OAuthProviderKind::Google, Some(invitation.token.clone()))
        .await
        .unwrap();

    let err = fx
        .flow
        .handle_callback(OAuthProviderKind::Google, "code", &start.state, &client())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::QuotaExceeded);
    // no partial user state left behind
    assert!(fx.store.users.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_callback_provider_mismatch_rejected() {
    let fx = fixture(google_identity("new@initech.test"));

    let start = fx
        .flow
        .initiate_login(OAuthProviderKind::Google, Some("invite".to_owned()))
        .await
        .unwrap();

    // callback arrives claiming a different provider than the state recorded
    let err = fx
        .flow
        .handle_callback(OAuthProviderKind::Microsoft, "code", &start.state, &client())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);
}
