// ABOUTME: Session establishment shared by the OAuth and passwordless flows
// ABOUTME: Issues token pairs, persists refresh tokens and sessions, refreshes and revokes them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! # Session Issuance
//!
//! Both login flows end the same way: issue an access+refresh token pair,
//! persist the refresh token and a session record, and update the user's
//! last login. Logout revokes *all* of a principal's refresh tokens and
//! sessions, not just the current one; the reaper deletes the rows later.

use crate::auth::AuthManager;
use crate::errors::{AppError, AppResult};
use crate::models::{RefreshToken, Session, Tenant, User};
use crate::store::IamStore;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Client metadata captured on the session record
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    /// Client IP address
    pub ip_address: String,
    /// Client user agent
    pub user_agent: String,
}

/// Token pair handed to a freshly authenticated principal
#[derive(Debug, Clone, Serialize)]
pub struct IssuedTokens {
    /// Signed access token
    pub access_token: String,
    /// Signed refresh token, also persisted server-side
    pub refresh_token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    /// Authenticated user
    pub user: User,
    /// The user's tenant
    pub tenant: Tenant,
}

/// Fresh access token minted from a refresh token
#[derive(Debug, Clone, Serialize)]
pub struct RefreshedAccess {
    /// Signed access token
    pub access_token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Issues, refreshes, and revokes sessions and refresh tokens
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn IamStore>,
    auth: AuthManager,
}

impl SessionManager {
    /// Create a new session manager
    #[must_use]
    pub fn new(store: Arc<dyn IamStore>, auth: AuthManager) -> Self {
        Self { store, auth }
    }

    /// The token issuer backing this manager
    #[must_use]
    pub const fn auth(&self) -> &AuthManager {
        &self.auth
    }

    /// Establish a session for an authenticated user: token pair, persisted
    /// refresh token, session record, last-login update.
    ///
    /// Session and last-login persistence failures are logged without
    /// failing the login; the refresh token write must succeed.
    ///
    /// # Errors
    ///
    /// Returns an error if token signing or the refresh token write fails
    pub async fn establish(
        &self,
        mut user: User,
        tenant: Tenant,
        client: &ClientMeta,
    ) -> AppResult<IssuedTokens> {
        let access_token = self.auth.generate_access_token(&user)?;
        let refresh_token = self.auth.generate_refresh_token(user.id)?;
        let now = Utc::now();

        let token_row = RefreshToken {
            id: Uuid::new_v4(),
            token: refresh_token.clone(),
            user_id: user.id,
            tenant_id: user.tenant_id,
            expires_at: now + self.auth.refresh_ttl(),
            is_revoked: false,
            created_at: now,
        };
        self.store.save_refresh_token(&token_row).await?;

        let session = Session {
            id: Uuid::new_v4(),
            user_id: user.id,
            tenant_id: user.tenant_id,
            session_token: Uuid::new_v4().to_string(),
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent.clone(),
            expires_at: now + self.auth.refresh_ttl(),
            created_at: now,
            last_activity: now,
        };
        if let Err(e) = self.store.save_session(&session).await {
            tracing::warn!("failed to persist session for user {}: {e}", user.id);
        }

        user.update_last_login();
        if let Err(e) = self.store.update_user(&user).await {
            tracing::warn!("failed to record last login for user {}: {e}", user.id);
        }

        Ok(IssuedTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_owned(),
            expires_in: self.auth.access_ttl().num_seconds(),
            user,
            tenant,
        })
    }

    /// Mint a fresh access token from a refresh token.
    ///
    /// The presentation is honored only when the signature verifies AND the
    /// persisted row is unrevoked and unexpired, the user can log in, and
    /// the tenant is active.
    ///
    /// # Errors
    ///
    /// Returns invalid-credential, expired/revoked, or tenant-inactive
    /// errors accordingly
    pub async fn refresh_access_token(&self, refresh_token: &str) -> AppResult<RefreshedAccess> {
        self.auth.validate_refresh_token(refresh_token)?;

        let Some(row) = self.store.get_refresh_token(refresh_token).await? else {
            return Err(AppError::auth_invalid("invalid refresh token"));
        };
        if row.is_revoked {
            return Err(AppError::revoked("refresh token has been revoked"));
        }
        if !row.is_valid() {
            return Err(AppError::expired("refresh token has expired"));
        }

        let user = self
            .store
            .get_user(row.user_id, row.tenant_id)
            .await?
            .ok_or_else(|| AppError::auth_invalid("invalid refresh token"))?;
        if !user.can_login() {
            return Err(AppError::auth_invalid("account cannot log in"));
        }

        let tenant = self
            .store
            .get_tenant(row.tenant_id)
            .await?
            .ok_or_else(|| AppError::auth_invalid("invalid refresh token"))?;
        if !tenant.is_active() {
            return Err(AppError::tenant_inactive("organization is not active"));
        }

        let access_token = self.auth.generate_access_token(&user)?;
        Ok(RefreshedAccess {
            access_token,
            token_type: "Bearer".to_owned(),
            expires_in: self.auth.access_ttl().num_seconds(),
        })
    }

    /// Revoke every refresh token and session of a principal.
    ///
    /// Revocation is logical; the reaper deletes the rows on its next sweep.
    /// The transport layer clears credential cookies alongside this call.
    ///
    /// # Errors
    ///
    /// Never fails outright; storage errors are logged and swallowed so
    /// logout always completes from the caller's perspective
    pub async fn logout(&self, user_id: Uuid) -> AppResult<()> {
        if let Err(e) = self.store.revoke_user_refresh_tokens(user_id).await {
            tracing::warn!("failed to revoke refresh tokens for user {user_id}: {e}");
        }
        if let Err(e) = self.store.revoke_user_sessions(user_id).await {
            tracing::warn!("failed to revoke sessions for user {user_id}: {e}");
        }
        Ok(())
    }
}
