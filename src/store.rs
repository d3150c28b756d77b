// ABOUTME: Repository contract consumed by every flow; implementations live outside this crate
// ABOUTME: Covers users, tenants, invitations, API keys, OTPs, refresh tokens, and sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! # Storage Contract
//!
//! `IamStore` is the single persistence contract the engine consumes.
//! Implementations (Postgres, SQLite, in-memory test doubles) live outside
//! this crate; correctness of concurrent updates is delegated to the backing
//! store's per-row atomicity. Every method is one backing-store round trip.

use crate::errors::AppResult;
use crate::models::{
    ApiKey, Invitation, Otp, OtpPurpose, RefreshToken, Session, Tenant, TenantId, User,
};
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence contract for the IAM engine
#[async_trait]
pub trait IamStore: Send + Sync {
    // ================================================================================
    // User Management
    // ================================================================================

    /// Create a new user
    async fn create_user(&self, user: &User) -> AppResult<()>;

    /// Get user by ID within a tenant; `None` when absent from the tenant
    async fn get_user(&self, user_id: Uuid, tenant_id: TenantId) -> AppResult<Option<User>>;

    /// Get user by email within a tenant
    async fn get_user_by_email(&self, email: &str, tenant_id: TenantId)
        -> AppResult<Option<User>>;

    /// Get every account registered under an email across all tenants
    async fn get_users_by_email(&self, email: &str) -> AppResult<Vec<User>>;

    /// List all users of a tenant
    async fn get_users_by_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<User>>;

    /// Persist updated user state
    async fn update_user(&self, user: &User) -> AppResult<()>;

    /// Delete a user (quota-rollback compensation only; users are otherwise
    /// never hard-deleted)
    async fn delete_user(&self, user_id: Uuid, tenant_id: TenantId) -> AppResult<()>;

    // ================================================================================
    // Tenant Management
    // ================================================================================

    /// Create a new tenant
    async fn create_tenant(&self, tenant: &Tenant) -> AppResult<()>;

    /// Get a tenant by ID
    async fn get_tenant(&self, tenant_id: TenantId) -> AppResult<Option<Tenant>>;

    /// Persist updated tenant state
    async fn update_tenant(&self, tenant: &Tenant) -> AppResult<()>;

    // ================================================================================
    // Invitations
    // ================================================================================

    /// Create a new invitation
    async fn create_invitation(&self, invitation: &Invitation) -> AppResult<()>;

    /// Get an invitation by ID
    async fn get_invitation(&self, invitation_id: Uuid) -> AppResult<Option<Invitation>>;

    /// Get an invitation by its opaque token
    async fn get_invitation_by_token(&self, token: &str) -> AppResult<Option<Invitation>>;

    /// Whether a PENDING invitation exists for (email, tenant)
    async fn pending_invitation_exists(
        &self,
        email: &str,
        tenant_id: TenantId,
    ) -> AppResult<bool>;

    /// List a tenant's invitations
    async fn get_invitations_by_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<Invitation>>;

    /// List a tenant's PENDING invitations
    async fn get_pending_invitations(&self, tenant_id: TenantId) -> AppResult<Vec<Invitation>>;

    /// Persist updated invitation state
    async fn update_invitation(&self, invitation: &Invitation) -> AppResult<()>;

    /// Delete an invitation
    async fn delete_invitation(&self, invitation_id: Uuid) -> AppResult<()>;

    /// List PENDING invitations whose expiry has passed
    async fn get_expired_pending_invitations(&self) -> AppResult<Vec<Invitation>>;

    // ================================================================================
    // API Keys
    // ================================================================================

    /// Create a new API key
    async fn create_api_key(&self, api_key: &ApiKey) -> AppResult<()>;

    /// Look an API key up by the SHA-256 hash of its secret
    async fn get_api_key_by_hash(&self, key_hash: &str) -> AppResult<Option<ApiKey>>;

    /// List a tenant's API keys
    async fn get_api_keys_by_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<ApiKey>>;

    /// Persist updated API key state
    async fn update_api_key(&self, api_key: &ApiKey) -> AppResult<()>;

    /// Record that a key just authenticated a request
    async fn touch_api_key(&self, api_key_id: Uuid) -> AppResult<()>;

    // ================================================================================
    // One-Time Codes
    // ================================================================================

    /// Create a new one-time code
    async fn create_otp(&self, otp: &Otp) -> AppResult<()>;

    /// Most recently issued code for (contact, purpose)
    async fn get_latest_otp(
        &self,
        contact: &str,
        purpose: OtpPurpose,
    ) -> AppResult<Option<Otp>>;

    /// Persist updated code state (attempts, verified_at)
    async fn update_otp(&self, otp: &Otp) -> AppResult<()>;

    /// Delete expired and consumed codes; returns rows removed
    async fn delete_dead_otps(&self) -> AppResult<u64>;

    // ================================================================================
    // Refresh Tokens
    // ================================================================================

    /// Persist a refresh token row
    async fn save_refresh_token(&self, token: &RefreshToken) -> AppResult<()>;

    /// Find a refresh token row by its token string
    async fn get_refresh_token(&self, token: &str) -> AppResult<Option<RefreshToken>>;

    /// Logically revoke every refresh token of a user
    async fn revoke_user_refresh_tokens(&self, user_id: Uuid) -> AppResult<u64>;

    /// Delete expired or revoked refresh token rows; returns rows removed
    async fn delete_dead_refresh_tokens(&self) -> AppResult<u64>;

    // ================================================================================
    // Sessions
    // ================================================================================

    /// Persist a session record
    async fn save_session(&self, session: &Session) -> AppResult<()>;

    /// Revoke every session of a user
    async fn revoke_user_sessions(&self, user_id: Uuid) -> AppResult<u64>;

    /// Delete expired session rows; returns rows removed
    async fn delete_expired_sessions(&self) -> AppResult<u64>;

    // ================================================================================
    // Password Reset Tokens
    // ================================================================================

    /// Delete expired or used password-reset token rows; returns rows removed
    async fn delete_dead_reset_tokens(&self) -> AppResult<u64>;
}
