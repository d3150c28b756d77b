// ABOUTME: OAuth login/registration flow with invitation gating and account linking
// ABOUTME: Quota-checked user creation with compensating delete; state consumed exactly once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! # OAuth Flow
//!
//! *auth-url issued* → *state stored* → *code received* → *token exchanged* →
//! *identity resolved* → *session established*.
//!
//! Registration is invitation-gated: without an invitation token in the
//! stored state payload the callback fails. When an account already exists
//! for (email, tenant), the returned provider identity is linked onto it —
//! the mechanism by which one user ends up holding both OAuth and code
//! login. New accounts enforce the tenant quota, with a compensating delete
//! if the quota increment fails after creation.

use super::{OAuthUserInfo, ProviderRegistry};
use crate::errors::{AppError, AppResult};
use crate::models::{OAuthProviderKind, Tenant, User, UserStatus};
use crate::sessions::{ClientMeta, IssuedTokens, SessionManager};
use crate::state_store::{OAuthStateStore, StateData};
use crate::store::IamStore;
use serde::Serialize;
use std::sync::Arc;

/// Response to a login initiation: where to send the user
#[derive(Debug, Clone, Serialize)]
pub struct LoginStart {
    /// Provider authorization URL to redirect to
    pub auth_url: String,
    /// CSRF state token embedded in the URL
    pub state: String,
}

/// Orchestrates the OAuth login and registration flow
#[derive(Clone)]
pub struct OAuthFlow {
    store: Arc<dyn IamStore>,
    providers: ProviderRegistry,
    state_store: Arc<dyn OAuthStateStore>,
    sessions: SessionManager,
}

impl OAuthFlow {
    /// Create a new OAuth flow
    #[must_use]
    pub fn new(
        store: Arc<dyn IamStore>,
        providers: ProviderRegistry,
        state_store: Arc<dyn OAuthStateStore>,
        sessions: SessionManager,
    ) -> Self {
        Self {
            store,
            providers,
            state_store,
            sessions,
        }
    }

    /// Start a login: generate and store the CSRF state, return the
    /// provider authorization URL.
    ///
    /// The invitation token, when present, rides in the state payload and
    /// gates registration at callback time.
    ///
    /// # Errors
    ///
    /// Returns an error for unregistered providers or state-store failures
    pub async fn initiate_login(
        &self,
        provider: OAuthProviderKind,
        invitation_token: Option<String>,
    ) -> AppResult<LoginStart> {
        let oauth_provider = self
            .providers
            .get(provider)
            .ok_or_else(|| AppError::invalid_input("unsupported OAuth provider"))?;

        let state = self.state_store.generate_state();
        self.state_store
            .store_state(
                &state,
                StateData {
                    provider,
                    invitation_token,
                },
            )
            .await?;

        Ok(LoginStart {
            auth_url: oauth_provider.auth_url(&state),
            state,
        })
    }

    /// Non-destructive check that a state the provider echoed back is live
    ///
    /// # Errors
    ///
    /// Returns an error only on state-store failure
    pub async fn validate_state(&self, state: &str) -> AppResult<bool> {
        self.state_store.validate_state(state).await
    }

    /// Handle the provider callback: consume the state, exchange the code,
    /// resolve the identity, and establish a session.
    ///
    /// # Errors
    ///
    /// Returns invalid-state on unknown/expired/replayed states, external
    /// errors from the provider exchange, and the business errors of
    /// identity resolution (invitation gating, quota)
    pub async fn handle_callback(
        &self,
        provider: OAuthProviderKind,
        code: &str,
        state: &str,
        client: &ClientMeta,
    ) -> AppResult<IssuedTokens> {
        // Destructive read: a replayed callback fails here
        let state_data = self.state_store.get_state_data(state).await?;
        if state_data.provider != provider {
            return Err(AppError::auth_invalid("invalid state"));
        }

        let oauth_provider = self
            .providers
            .get(provider)
            .ok_or_else(|| AppError::invalid_input("unsupported OAuth provider"))?;

        let token = oauth_provider.exchange_code(code).await?;
        let user_info = oauth_provider.user_info(&token.access_token).await?;

        let (user, tenant) = self
            .find_or_create_user(&user_info, provider, state_data.invitation_token.as_deref())
            .await?;

        self.sessions.establish(user, tenant, client).await
    }

    /// Resolve the provider identity to a user, linking or creating under
    /// invitation gating.
    ///
    /// Mid-flow failures never leave partial user state: if the tenant
    /// quota increment fails after the user row was created, the row is
    /// deleted again.
    async fn find_or_create_user(
        &self,
        info: &OAuthUserInfo,
        provider: OAuthProviderKind,
        invitation_token: Option<&str>,
    ) -> AppResult<(User, Tenant)> {
        let Some(invitation_token) = invitation_token else {
            return Err(AppError::permission_denied(
                "an invitation is required for registration",
            ));
        };

        let mut invitation = self
            .store
            .get_invitation_by_token(invitation_token)
            .await?
            .ok_or_else(|| AppError::not_found("invitation"))?;

        if !invitation.can_be_accepted() {
            if invitation.is_expired() {
                return Err(AppError::expired("invitation has expired"));
            }
            return Err(AppError::invalid_state("invitation cannot be accepted")
                .with_detail("status", invitation.status.to_string()));
        }
        if invitation.email != info.email {
            return Err(AppError::invalid_input("email does not match invitation"));
        }

        let mut tenant = self
            .store
            .get_tenant(invitation.tenant_id)
            .await?
            .ok_or_else(|| AppError::not_found("tenant"))?;

        // Account linking: an existing account absorbs the provider
        // identity instead of a duplicate being created. No quota check.
        if let Some(mut existing) = self
            .store
            .get_user_by_email(&info.email, tenant.id)
            .await?
        {
            let already_linked = existing.oauth_provider == Some(provider)
                && existing.oauth_provider_id.as_deref() == Some(info.provider_user_id.as_str());
            if !already_linked {
                existing.link_oauth(provider, info.provider_user_id.clone());
                existing.update_profile(&info.name, &info.picture);
                self.store.update_user(&existing).await?;
            }

            if invitation.accept(existing.id).is_ok() {
                if let Err(e) = self.store.update_invitation(&invitation).await {
                    tracing::warn!("failed to mark invitation {} accepted: {e}", invitation.id);
                }
            }
            return Ok((existing, tenant));
        }

        if !tenant.can_add_user() {
            return Err(AppError::quota_exceeded(
                "organization has reached its user limit",
            ));
        }

        let scopes = if invitation.scopes.is_empty() {
            default_scopes()
        } else {
            invitation.scopes.clone()
        };

        let mut user = User::new(tenant.id, info.email.clone(), info.name.clone(), scopes);
        user.status = UserStatus::Active;
        user.email_verified = info.email_verified;
        user.oauth_provider = Some(provider);
        user.oauth_provider_id = Some(info.provider_user_id.clone());
        if !info.picture.is_empty() {
            user.picture = Some(info.picture.clone());
        }

        self.store.create_user(&user).await?;

        // Quota increment failure rolls the just-created user back
        if let Err(quota_err) = tenant.add_user() {
            if let Err(e) = self.store.delete_user(user.id, tenant.id).await {
                tracing::error!(
                    "failed to roll back user {} after quota failure: {e}",
                    user.id
                );
            }
            return Err(quota_err);
        }
        if let Err(e) = self.store.update_tenant(&tenant).await {
            tracing::warn!("failed to persist tenant user count for {}: {e}", tenant.id);
        }

        if invitation.accept(user.id).is_ok() {
            if let Err(e) = self.store.update_invitation(&invitation).await {
                tracing::warn!("failed to mark invitation {} accepted: {e}", invitation.id);
            }
        }

        Ok((user, tenant))
    }
}

fn default_scopes() -> Vec<String> {
    crate::scopes::scopes_for_group(crate::scopes::DEFAULT_SCOPE_GROUP)
        .unwrap_or(&[crate::scopes::SCOPE_USERS_READ])
        .iter()
        .map(|s| (*s).to_owned())
        .collect()
}
