// ABOUTME: Invitation lifecycle service: issue, validate, list, revoke, and expire invitations
// ABOUTME: Enforces one pending invitation per (email, tenant) and inviter permission checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! # Invitation Service
//!
//! Invitations are the only path into a tenant. They are single-use,
//! tenant-scoped, expiry-bound, and carry the scope set the accepting user
//! will be granted. At most one PENDING invitation exists per (email,
//! tenant) at a time; ACCEPTED, EXPIRED, and REVOKED are terminal states.

use crate::config::InvitationConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{Invitation, InvitationStatus, TenantId};
use crate::store::IamStore;
use chrono::{Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Parameters for creating an invitation
#[derive(Debug, Clone, Default)]
pub struct CreateInvitationRequest {
    /// Email the invitation targets
    pub email: String,
    /// Explicit scopes to grant; wins over the group when non-empty
    pub scopes: Vec<String>,
    /// Named scope group to grant instead of explicit scopes
    pub scope_group: Option<String>,
    /// Days until expiry; the configured default applies when absent
    pub expires_in_days: Option<i64>,
}

/// Outcome of a non-consuming token validation
#[derive(Debug, Clone, Serialize)]
pub struct InvitationValidation {
    /// Whether the token can currently be accepted
    pub valid: bool,
    /// The invitation, when valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitation: Option<Invitation>,
    /// Why the token is not valid, when it is not
    pub message: String,
}

/// Service managing the invitation lifecycle
#[derive(Clone)]
pub struct InvitationService {
    store: Arc<dyn IamStore>,
    config: InvitationConfig,
}

impl InvitationService {
    /// Create a new invitation service
    #[must_use]
    pub fn new(store: Arc<dyn IamStore>, config: InvitationConfig) -> Self {
        Self { store, config }
    }

    /// Issue an invitation.
    ///
    /// The tenant must be active, the inviter must hold `users:invite` or
    /// admin authority, the email must not already have an account or a
    /// pending invitation in the tenant, and every granted scope must be
    /// registered.
    ///
    /// # Errors
    ///
    /// Returns permission, conflict, and validation errors accordingly
    pub async fn create(
        &self,
        tenant_id: TenantId,
        invited_by: Uuid,
        request: CreateInvitationRequest,
    ) -> AppResult<Invitation> {
        let tenant = self
            .store
            .get_tenant(tenant_id)
            .await?
            .ok_or_else(|| AppError::not_found("tenant"))?;
        if !tenant.is_active() {
            return Err(AppError::tenant_inactive("organization is not active"));
        }

        let inviter = self
            .store
            .get_user(invited_by, tenant_id)
            .await?
            .ok_or_else(|| AppError::not_found("inviting user"))?;
        if !inviter.is_admin() && !inviter.has_scope(crate::scopes::SCOPE_USERS_INVITE) {
            return Err(AppError::permission_denied(
                "insufficient permissions to invite users",
            )
            .with_detail("required_scope", crate::scopes::SCOPE_USERS_INVITE));
        }

        if self
            .store
            .get_user_by_email(&request.email, tenant_id)
            .await?
            .is_some()
        {
            return Err(AppError::already_exists(
                "a user with this email already exists in the organization",
            ));
        }

        if self
            .store
            .pending_invitation_exists(&request.email, tenant_id)
            .await?
        {
            return Err(AppError::already_exists(
                "a pending invitation already exists for this email",
            ));
        }

        let scopes = self.resolve_scopes(&request)?;
        Self::validate_scopes(&scopes)?;

        let expires_in_days = request
            .expires_in_days
            .filter(|days| *days > 0)
            .unwrap_or(self.config.default_expiry_days);

        let now = Utc::now();
        let invitation = Invitation {
            id: Uuid::new_v4(),
            tenant_id,
            email: request.email,
            token: crate::crypto::generate_token_hex(self.config.token_bytes),
            scopes,
            status: InvitationStatus::Pending,
            invited_by,
            expires_at: now + Duration::days(expires_in_days),
            accepted_at: None,
            accepted_by: None,
            created_at: now,
            updated_at: now,
        };

        self.store.create_invitation(&invitation).await?;
        Ok(invitation)
    }

    /// Get an invitation by ID within a tenant
    ///
    /// # Errors
    ///
    /// Returns not-found when absent or belonging to another tenant
    pub async fn get(&self, invitation_id: Uuid, tenant_id: TenantId) -> AppResult<Invitation> {
        let invitation = self
            .store
            .get_invitation(invitation_id)
            .await?
            .ok_or_else(|| AppError::not_found("invitation"))?;
        // Absent-from-tenant looks identical to absent
        if invitation.tenant_id != tenant_id {
            return Err(AppError::not_found("invitation"));
        }
        Ok(invitation)
    }

    /// Get an invitation by its opaque token
    ///
    /// # Errors
    ///
    /// Returns not-found for unknown tokens
    pub async fn get_by_token(&self, token: &str) -> AppResult<Invitation> {
        self.store
            .get_invitation_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found("invitation"))
    }

    /// Check a token without consuming it, reporting why it cannot be
    /// accepted when it cannot
    ///
    /// # Errors
    ///
    /// Returns an error only on storage failure
    pub async fn validate_token(&self, token: &str) -> AppResult<InvitationValidation> {
        let Some(invitation) = self.store.get_invitation_by_token(token).await? else {
            return Ok(InvitationValidation {
                valid: false,
                invitation: None,
                message: "invitation not found".to_owned(),
            });
        };

        if invitation.can_be_accepted() {
            return Ok(InvitationValidation {
                valid: true,
                invitation: Some(invitation),
                message: "invitation is valid".to_owned(),
            });
        }

        let message = if invitation.is_expired() {
            "invitation has expired"
        } else {
            match invitation.status {
                InvitationStatus::Accepted => "invitation has already been accepted",
                InvitationStatus::Revoked => "invitation has been revoked",
                InvitationStatus::Pending | InvitationStatus::Expired => "invitation is not valid",
            }
        };
        Ok(InvitationValidation {
            valid: false,
            invitation: None,
            message: message.to_owned(),
        })
    }

    /// List a tenant's invitations
    ///
    /// # Errors
    ///
    /// Returns not-found for unknown tenants
    pub async fn list(&self, tenant_id: TenantId) -> AppResult<Vec<Invitation>> {
        self.require_tenant(tenant_id).await?;
        self.store.get_invitations_by_tenant(tenant_id).await
    }

    /// List a tenant's PENDING invitations
    ///
    /// # Errors
    ///
    /// Returns not-found for unknown tenants
    pub async fn list_pending(&self, tenant_id: TenantId) -> AppResult<Vec<Invitation>> {
        self.require_tenant(tenant_id).await?;
        self.store.get_pending_invitations(tenant_id).await
    }

    /// Revoke a not-yet-accepted invitation
    ///
    /// # Errors
    ///
    /// Returns not-found outside the tenant and business errors for
    /// accepted or already-revoked invitations
    pub async fn revoke(&self, invitation_id: Uuid, tenant_id: TenantId) -> AppResult<()> {
        let mut invitation = self.get(invitation_id, tenant_id).await?;
        invitation.revoke()?;
        self.store.update_invitation(&invitation).await
    }

    /// Delete a non-accepted invitation
    ///
    /// # Errors
    ///
    /// Returns an invalid-state error for accepted invitations
    pub async fn delete(&self, invitation_id: Uuid, tenant_id: TenantId) -> AppResult<()> {
        let invitation = self.get(invitation_id, tenant_id).await?;
        if invitation.status == InvitationStatus::Accepted {
            return Err(AppError::invalid_state("accepted invitations cannot be deleted"));
        }
        self.store.delete_invitation(invitation.id).await
    }

    /// Move PENDING invitations past their expiry to EXPIRED; returns how
    /// many transitioned. Called by the background reaper.
    ///
    /// # Errors
    ///
    /// Returns an error only when the expired listing itself fails;
    /// per-row update failures are logged and skipped
    pub async fn mark_expired_invitations(&self) -> AppResult<u64> {
        let expired = self.store.get_expired_pending_invitations().await?;

        let mut count = 0u64;
        for mut invitation in expired {
            invitation.mark_expired();
            match self.store.update_invitation(&invitation).await {
                Ok(()) => count += 1,
                Err(e) => {
                    tracing::warn!("failed to expire invitation {}: {e}", invitation.id);
                }
            }
        }
        Ok(count)
    }

    async fn require_tenant(&self, tenant_id: TenantId) -> AppResult<()> {
        self.store
            .get_tenant(tenant_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("tenant"))
    }

    fn resolve_scopes(&self, request: &CreateInvitationRequest) -> AppResult<Vec<String>> {
        if !request.scopes.is_empty() {
            return Ok(request.scopes.clone());
        }
        if let Some(group) = request.scope_group.as_deref() {
            return crate::scopes::scopes_for_group(group)
                .map(|scopes| scopes.iter().map(|s| (*s).to_owned()).collect())
                .ok_or_else(|| {
                    AppError::invalid_input("unknown scope group")
                        .with_detail("group", group)
                        .with_detail(
                            "available_groups",
                            serde_json::json!(crate::scopes::group_names()),
                        )
                });
        }
        Ok(crate::scopes::scopes_for_group(crate::scopes::DEFAULT_SCOPE_GROUP)
            .unwrap_or(&[crate::scopes::SCOPE_USERS_READ])
            .iter()
            .map(|s| (*s).to_owned())
            .collect())
    }

    fn validate_scopes(scopes: &[String]) -> AppResult<()> {
        if scopes.is_empty() {
            return Err(AppError::invalid_input("at least one scope is required"));
        }
        let invalid: Vec<&String> = scopes
            .iter()
            .filter(|s| !crate::scopes::validate_scope(s))
            .collect();
        if !invalid.is_empty() {
            return Err(AppError::invalid_input("unknown scopes in request")
                .with_detail("invalid_scopes", serde_json::json!(invalid)));
        }
        Ok(())
    }
}
