// ABOUTME: Shared test fixtures: in-memory IamStore, notification recorder, entity builders
// ABOUTME: Used by the integration tests; not compiled into the library

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use talentgate_iam::config::JwtConfig;
use talentgate_iam::errors::{AppError, AppResult};
use talentgate_iam::models::{
    ApiKey, Invitation, InvitationStatus, Otp, OtpPurpose, RefreshToken, Session,
    SubscriptionPlan, Tenant, TenantId, TenantStatus, User, UserStatus,
};
use talentgate_iam::notifications::NotificationSender;
use talentgate_iam::store::IamStore;
use uuid::Uuid;

/// In-memory IamStore test double
#[derive(Default)]
pub struct MemoryStore {
    pub users: Mutex<Vec<User>>,
    pub tenants: Mutex<Vec<Tenant>>,
    pub invitations: Mutex<Vec<Invitation>>,
    pub api_keys: Mutex<Vec<ApiKey>>,
    pub otps: Mutex<Vec<Otp>>,
    pub refresh_tokens: Mutex<Vec<RefreshToken>>,
    pub sessions: Mutex<Vec<Session>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed_tenant(&self, tenant: &Tenant) {
        self.tenants.lock().unwrap().push(tenant.clone());
    }

    pub fn seed_user(&self, user: &User) {
        self.users.lock().unwrap().push(user.clone());
    }

    pub fn seed_invitation(&self, invitation: &Invitation) {
        self.invitations.lock().unwrap().push(invitation.clone());
    }

    pub fn seed_api_key(&self, api_key: &ApiKey) {
        self.api_keys.lock().unwrap().push(api_key.clone());
    }
}

#[async_trait]
impl IamStore for MemoryStore {
    async fn create_user(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.email == user.email && u.tenant_id == user.tenant_id)
        {
            return Err(AppError::already_exists("user already exists"));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn get_user(&self, user_id: Uuid, tenant_id: TenantId) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id && u.tenant_id == tenant_id)
            .cloned())
    }

    async fn get_user_by_email(
        &self,
        email: &str,
        tenant_id: TenantId,
    ) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email && u.tenant_id == tenant_id)
            .cloned())
    }

    async fn get_users_by_email(&self, email: &str) -> AppResult<Vec<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.email == email)
            .cloned()
            .collect())
    }

    async fn get_users_by_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn update_user(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(AppError::not_found("user")),
        }
    }

    async fn delete_user(&self, user_id: Uuid, tenant_id: TenantId) -> AppResult<()> {
        self.users
            .lock()
            .unwrap()
            .retain(|u| !(u.id == user_id && u.tenant_id == tenant_id));
        Ok(())
    }

    async fn create_tenant(&self, tenant: &Tenant) -> AppResult<()> {
        self.tenants.lock().unwrap().push(tenant.clone());
        Ok(())
    }

    async fn get_tenant(&self, tenant_id: TenantId) -> AppResult<Option<Tenant>> {
        Ok(self
            .tenants
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == tenant_id)
            .cloned())
    }

    async fn update_tenant(&self, tenant: &Tenant) -> AppResult<()> {
        let mut tenants = self.tenants.lock().unwrap();
        match tenants.iter_mut().find(|t| t.id == tenant.id) {
            Some(existing) => {
                *existing = tenant.clone();
                Ok(())
            }
            None => Err(AppError::not_found("tenant")),
        }
    }

    async fn create_invitation(&self, invitation: &Invitation) -> AppResult<()> {
        self.invitations.lock().unwrap().push(invitation.clone());
        Ok(())
    }

    async fn get_invitation(&self, invitation_id: Uuid) -> AppResult<Option<Invitation>> {
        Ok(self
            .invitations
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == invitation_id)
            .cloned())
    }

    async fn get_invitation_by_token(&self, token: &str) -> AppResult<Option<Invitation>> {
        Ok(self
            .invitations
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.token == token)
            .cloned())
    }

    async fn pending_invitation_exists(
        &self,
        email: &str,
        tenant_id: TenantId,
    ) -> AppResult<bool> {
        Ok(self.invitations.lock().unwrap().iter().any(|i| {
            i.email == email && i.tenant_id == tenant_id && i.status == InvitationStatus::Pending
        }))
    }

    async fn get_invitations_by_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<Invitation>> {
        Ok(self
            .invitations
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn get_pending_invitations(&self, tenant_id: TenantId) -> AppResult<Vec<Invitation>> {
        Ok(self
            .invitations
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.tenant_id == tenant_id && i.status == InvitationStatus::Pending)
            .cloned()
            .collect())
    }

    async fn update_invitation(&self, invitation: &Invitation) -> AppResult<()> {
        let mut invitations = self.invitations.lock().unwrap();
        match invitations.iter_mut().find(|i| i.id == invitation.id) {
            Some(existing) => {
                *existing = invitation.clone();
                Ok(())
            }
            None => Err(AppError::not_found("invitation")),
        }
    }

    async fn delete_invitation(&self, invitation_id: Uuid) -> AppResult<()> {
        self.invitations
            .lock()
            .unwrap()
            .retain(|i| i.id != invitation_id);
        Ok(())
    }

    async fn get_expired_pending_invitations(&self) -> AppResult<Vec<Invitation>> {
        Ok(self
            .invitations
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.status == InvitationStatus::Pending && i.is_expired())
            .cloned()
            .collect())
    }

    async fn create_api_key(&self, api_key: &ApiKey) -> AppResult<()> {
        self.api_keys.lock().unwrap().push(api_key.clone());
        Ok(())
    }

    async fn get_api_key_by_hash(&self, key_hash: &str) -> AppResult<Option<ApiKey>> {
        Ok(self
            .api_keys
            .lock()
            .unwrap()
            .iter()
            .find(|k| k.key_hash == key_hash)
            .cloned())
    }

    async fn get_api_keys_by_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<ApiKey>> {
        Ok(self
            .api_keys
            .lock()
            .unwrap()
            .iter()
            .filter(|k| k.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn update_api_key(&self, api_key: &ApiKey) -> AppResult<()> {
        let mut keys = self.api_keys.lock().unwrap();
        match keys.iter_mut().find(|k| k.id == api_key.id) {
            Some(existing) => {
                *existing = api_key.clone();
                Ok(())
            }
            None => Err(AppError::not_found("API key")),
        }
    }

    async fn touch_api_key(&self, api_key_id: Uuid) -> AppResult<()> {
        if let Some(key) = self
            .api_keys
            .lock()
            .unwrap()
            .iter_mut()
            .find(|k| k.id == api_key_id)
        {
            key.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_otp(&self, otp: &Otp) -> AppResult<()> {
        self.otps.lock().unwrap().push(otp.clone());
        Ok(())
    }

    async fn get_latest_otp(
        &self,
        contact: &str,
        purpose: OtpPurpose,
    ) -> AppResult<Option<Otp>> {
        Ok(self
            .otps
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.contact == contact && o.purpose == purpose)
            .max_by_key(|o| o.created_at)
            .cloned())
    }

    async fn update_otp(&self, otp: &Otp) -> AppResult<()> {
        let mut otps = self.otps.lock().unwrap();
        match otps.iter_mut().find(|o| o.id == otp.id) {
            Some(existing) => {
                *existing = otp.clone();
                Ok(())
            }
            None => Err(AppError::not_found("one-time code")),
        }
    }

    async fn delete_dead_otps(&self) -> AppResult<u64> {
        let mut otps = self.otps.lock().unwrap();
        let before = otps.len();
        otps.retain(|o| !o.is_expired() && o.verified_at.is_none());
        Ok((before - otps.len()) as u64)
    }

    async fn save_refresh_token(&self, token: &RefreshToken) -> AppResult<()> {
        self.refresh_tokens.lock().unwrap().push(token.clone());
        Ok(())
    }

    async fn get_refresh_token(&self, token: &str) -> AppResult<Option<RefreshToken>> {
        Ok(self
            .refresh_tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token == token)
            .cloned())
    }

    async fn revoke_user_refresh_tokens(&self, user_id: Uuid) -> AppResult<u64> {
        let mut tokens = self.refresh_tokens.lock().unwrap();
        let mut revoked = 0;
        for token in tokens.iter_mut().filter(|t| t.user_id == user_id) {
            if !token.is_revoked {
                token.is_revoked = true;
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn delete_dead_refresh_tokens(&self) -> AppResult<u64> {
        let mut tokens = self.refresh_tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|t| t.is_valid());
        Ok((before - tokens.len()) as u64)
    }

    async fn save_session(&self, session: &Session) -> AppResult<()> {
        self.sessions.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn revoke_user_sessions(&self, user_id: Uuid) -> AppResult<u64> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.user_id != user_id);
        Ok((before - sessions.len()) as u64)
    }

    async fn delete_expired_sessions(&self) -> AppResult<u64> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| !s.is_expired());
        Ok((before - sessions.len()) as u64)
    }

    async fn delete_dead_reset_tokens(&self) -> AppResult<u64> {
        Ok(0)
    }
}

/// Notification sender that records deliveries and can be told to fail
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: AtomicBool,
}

impl RecordingSender {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn last_code(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send_otp(&self, contact: &str, code: &str) -> AppResult<()> {
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(AppError::external_service("mail", "delivery refused"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((contact.to_owned(), code.to_owned()));
        Ok(())
    }
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig::with_secret("integration-test-secret")
}

pub fn active_tenant(max_users: u32) -> Tenant {
    let now = Utc::now();
    Tenant {
        id: TenantId::new(),
        company_name: "Initech".to_owned(),
        status: TenantStatus::Active,
        plan: SubscriptionPlan::Professional,
        max_users,
        current_users: 0,
        trial_expires_at: None,
        subscription_expires_at: Some(now + Duration::days(365)),
        created_at: now,
        updated_at: now,
    }
}

pub fn active_user(tenant_id: TenantId, email: &str, scopes: &[&str]) -> User {
    let mut user = User::new(
        tenant_id,
        email.to_owned(),
        "Pat Example".to_owned(),
        scopes.iter().map(|s| (*s).to_owned()).collect(),
    );
    user.status = UserStatus::Active;
    user.email_verified = true;
    user
}

pub fn pending_invitation(tenant_id: TenantId, email: &str, scopes: &[&str]) -> Invitation {
    let now = Utc::now();
    Invitation {
        id: Uuid::new_v4(),
        tenant_id,
        email: email.to_owned(),
        token: talentgate_iam::crypto::generate_token_hex(32),
        scopes: scopes.iter().map(|s| (*s).to_owned()).collect(),
        status: InvitationStatus::Pending,
        invited_by: Uuid::new_v4(),
        expires_at: now + Duration::days(7),
        accepted_at: None,
        accepted_by: None,
        created_at: now,
        updated_at: now,
    }
}
