// ABOUTME: User administration service: tenant-checked lookups, status changes, scope management
// ABOUTME: All scope mutations validate against the registry before persisting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! # User Service
//!
//! Administrative operations on user accounts. Every lookup is
//! tenant-checked; a user absent from the caller's tenant reads as
//! not-found, never as belonging elsewhere.

use crate::errors::{AppError, AppResult};
use crate::models::{TenantId, User};
use crate::store::IamStore;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// A scope with its registry category, for introspection surfaces
#[derive(Debug, Clone, Serialize)]
pub struct ScopeDetail {
    /// The scope string
    pub name: String,
    /// Registry category the scope belongs to
    pub category: String,
}

/// Scope report for one user
#[derive(Debug, Clone, Serialize)]
pub struct UserScopes {
    /// User the report covers
    pub user_id: Uuid,
    /// Granted scope strings
    pub scopes: Vec<String>,
    /// Granted scopes with their categories
    pub scope_details: Vec<ScopeDetail>,
    /// Whether the grants amount to administrative authority
    pub is_admin: bool,
}

/// Service for user administration
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn IamStore>,
}

impl UserService {
    /// Create a new user service
    #[must_use]
    pub fn new(store: Arc<dyn IamStore>) -> Self {
        Self { store }
    }

    /// Get a user by ID within a tenant
    ///
    /// # Errors
    ///
    /// Returns not-found when absent or belonging to another tenant
    pub async fn get(&self, user_id: Uuid, tenant_id: TenantId) -> AppResult<User> {
        self.store
            .get_user(user_id, tenant_id)
            .await?
            .ok_or_else(|| AppError::not_found("user"))
    }

    /// List a tenant's users
    ///
    /// # Errors
    ///
    /// Returns an error on storage failure
    pub async fn list(&self, tenant_id: TenantId) -> AppResult<Vec<User>> {
        self.store.get_users_by_tenant(tenant_id).await
    }

    /// Suspend an active user
    ///
    /// # Errors
    ///
    /// Returns not-found or an invalid-state error for non-active accounts
    pub async fn suspend(&self, user_id: Uuid, tenant_id: TenantId, reason: &str) -> AppResult<User> {
        let mut user = self.get(user_id, tenant_id).await?;
        user.suspend()?;
        self.store.update_user(&user).await?;
        tracing::info!("user {user_id} suspended: {reason}");
        Ok(user)
    }

    /// Activate a pending user
    ///
    /// # Errors
    ///
    /// Returns not-found or an invalid-state error for non-pending accounts
    pub async fn activate(&self, user_id: Uuid, tenant_id: TenantId) -> AppResult<User> {
        let mut user = self.get(user_id, tenant_id).await?;
        user.activate()?;
        self.store.update_user(&user).await?;
        Ok(user)
    }

    /// Grant additional scopes
    ///
    /// # Errors
    ///
    /// Returns a validation error if any scope is unregistered
    pub async fn add_scopes(
        &self,
        user_id: Uuid,
        tenant_id: TenantId,
        scopes: &[String],
    ) -> AppResult<User> {
        Self::validate_scopes(scopes)?;
        let mut user = self.get(user_id, tenant_id).await?;
        for scope in scopes {
            user.add_scope(scope);
        }
        self.store.update_user(&user).await?;
        Ok(user)
    }

    /// Remove verbatim scope grants
    ///
    /// # Errors
    ///
    /// Returns not-found for unknown users
    pub async fn remove_scopes(
        &self,
        user_id: Uuid,
        tenant_id: TenantId,
        scopes: &[String],
    ) -> AppResult<User> {
        let mut user = self.get(user_id, tenant_id).await?;
        for scope in scopes {
            user.remove_scope(scope);
        }
        self.store.update_user(&user).await?;
        Ok(user)
    }

    /// Replace the scope set
    ///
    /// # Errors
    ///
    /// Returns a validation error if any scope is unregistered
    pub async fn set_scopes(
        &self,
        user_id: Uuid,
        tenant_id: TenantId,
        scopes: Vec<String>,
    ) -> AppResult<User> {
        Self::validate_scopes(&scopes)?;
        let mut user = self.get(user_id, tenant_id).await?;
        user.set_scopes(scopes);
        self.store.update_user(&user).await?;
        Ok(user)
    }

    /// Replace the scope set with a named group's scopes
    ///
    /// # Errors
    ///
    /// Returns a validation error for unknown groups
    pub async fn apply_scope_group(
        &self,
        user_id: Uuid,
        tenant_id: TenantId,
        group: &str,
    ) -> AppResult<User> {
        let scopes = crate::scopes::scopes_for_group(group)
            .ok_or_else(|| {
                AppError::invalid_input("unknown scope group")
                    .with_detail("group", group)
                    .with_detail(
                        "available_groups",
                        serde_json::json!(crate::scopes::group_names()),
                    )
            })?
            .iter()
            .map(|s| (*s).to_owned())
            .collect();
        self.set_scopes(user_id, tenant_id, scopes).await
    }

    /// Scope report for a user
    ///
    /// # Errors
    ///
    /// Returns not-found for unknown users
    pub async fn scopes_report(&self, user_id: Uuid, tenant_id: TenantId) -> AppResult<UserScopes> {
        let user = self.get(user_id, tenant_id).await?;
        let scope_details = user
            .scopes
            .iter()
            .map(|scope| ScopeDetail {
                name: scope.clone(),
                category: crate::scopes::scope_category(scope)
                    .unwrap_or("Unknown")
                    .to_owned(),
            })
            .collect();
        Ok(UserScopes {
            user_id: user.id,
            is_admin: user.is_admin(),
            scope_details,
            scopes: user.scopes,
        })
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
