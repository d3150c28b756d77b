// ABOUTME: Unified per-request authentication over API keys and bearer/cookie access tokens
// ABOUTME: Exactly one credential path runs; guards evaluate scopes uniformly over the context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! # Unified Authenticator
//!
//! Per request: prefer an API key when a presented value matches the API-key
//! format (Authorization header, `X-API-Key` header, or `api_key` query
//! parameter), otherwise fall back to a bearer or cookie-carried access
//! token. Exactly one of the two paths executes.
//!
//! Both paths produce the same [`AuthContext`]; the guards never care which
//! credential kind produced it.

use crate::api_keys::ApiKeyManager;
use crate::auth::AuthManager;
use crate::constants::cookies;
use crate::errors::{AppError, AppResult};
use crate::models::TenantId;
use crate::store::IamStore;
use http::HeaderMap;
use std::sync::Arc;
use uuid::Uuid;

/// Which credential kind authenticated the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialKind {
    /// Interactive principal carrying a signed access token
    AccessToken,
    /// Non-interactive API key
    ApiKey {
        /// ID of the authenticating key
        key_id: Uuid,
    },
}

/// Resolved authorization context guards evaluate against
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Authenticated user; absent for tenant-level API keys
    pub user_id: Option<Uuid>,
    /// Tenant the credential is scoped to
    pub tenant_id: TenantId,
    /// Principal email, for token credentials
    pub email: Option<String>,
    /// Principal display name, for token credentials
    pub name: Option<String>,
    /// Granted permission scopes
    pub scopes: Vec<String>,
    /// Credential kind that produced this context
    pub credential: CredentialKind,
}

impl AuthContext {
    /// Whether a non-interactive API key produced this context
    #[must_use]
    pub const fn is_api_key(&self) -> bool {
        matches!(self.credential, CredentialKind::ApiKey { .. })
    }

    /// Whether the context holds a scope (wildcards included)
    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        crate::scopes::has_scope(&self.scopes, scope)
    }

    /// Whether the context holds administrative authority
    #[must_use]
    pub fn is_admin(&self) -> bool {
        crate::scopes::is_admin(&self.scopes)
    }

    /// Require a specific scope
    ///
    /// # Errors
    ///
    /// Returns permission-denied naming the required scope
    pub fn require_scope(&self, scope: &str) -> AppResult<()> {
        if self.has_scope(scope) {
            return Ok(());
        }
        Err(AppError::permission_denied("insufficient permissions")
            .with_detail("required_scope", scope))
    }

    /// Require any of the given scopes
    ///
    /// # Errors
    ///
    /// Returns permission-denied naming the acceptable scopes
    pub fn require_any_scope(&self, scopes: &[&str]) -> AppResult<()> {
        if crate::scopes::has_any_scope(&self.scopes, scopes) {
            return Ok(());
        }
        Err(AppError::permission_denied("insufficient permissions")
            .with_detail("required_scopes", serde_json::json!(scopes)))
    }

    /// Require all of the given scopes
    ///
    /// # Errors
    ///
    /// Returns permission-denied naming the required scopes
    pub fn require_all_scopes(&self, scopes: &[&str]) -> AppResult<()> {
        if crate::scopes::has_all_scopes(&self.scopes, scopes) {
            return Ok(());
        }
        Err(AppError::permission_denied("insufficient permissions")
            .with_detail("required_scopes", serde_json::json!(scopes)))
    }

    /// Require administrative authority (`*` or `admin:*`)
    ///
    /// # Errors
    ///
    /// Returns permission-denied for non-admin contexts
    pub fn require_admin(&self) -> AppResult<()> {
        self.require_any_scope(&[crate::scopes::SCOPE_ALL, crate::scopes::SCOPE_ADMIN_ALL])
    }

    /// Require administrative authority or a specific scope
    ///
    /// # Errors
    ///
    /// Returns permission-denied when neither holds
    pub fn require_admin_or_scope(&self, scope: &str) -> AppResult<()> {
        self.require_any_scope(&[
            crate::scopes::SCOPE_ALL,
            crate::scopes::SCOPE_ADMIN_ALL,
            scope,
        ])
    }
}

/// Middleware resolving request credentials to an [`AuthContext`]
#[derive(Clone)]
pub struct UnifiedAuthMiddleware {
    auth_manager: AuthManager,
    api_keys: ApiKeyManager,
    store: Arc<dyn IamStore>,
}

impl UnifiedAuthMiddleware {
    /// Create new authentication middleware
    #[must_use]
    pub fn new(auth_manager: AuthManager, store: Arc<dyn IamStore>) -> Self {
        Self {
            auth_manager,
            api_keys: ApiKeyManager::new(),
            store,
        }
    }

    /// Authenticate a request from its headers and optional `api_key`
    /// query parameter.
    ///
    /// A value matching the API-key format selects the API-key path;
    /// otherwise the bearer/cookie token path runs. Never both.
    ///
    /// # Errors
    ///
    /// Returns auth-required when no credential is present and
    /// invalid-credential errors when validation fails
    #[tracing::instrument(skip_all, fields(auth_method = tracing::field::Empty))]
    pub async fn authenticate(
        &self,
        headers: &HeaderMap,
        query_api_key: Option<&str>,
    ) -> AppResult<AuthContext> {
        if let Some(api_key) = Self::extract_api_key(headers, query_api_key) {
            tracing::Span::current().record("auth_method", "api_key");
            return self.authenticate_api_key(&api_key).await;
        }

        tracing::Span::current().record("auth_method", "access_token");
        self.authenticate_token(headers)
    }

    async fn authenticate_api_key(&self, api_key: &str) -> AppResult<AuthContext> {
        let key_hash = ApiKeyManager::hash_key(api_key);
        let Some(key) = self.store.get_api_key_by_hash(&key_hash).await? else {
            return Err(AppError::auth_invalid("invalid API key"));
        };

        self.api_keys.check_key(&key)?;

        if let Err(e) = self.store.touch_api_key(key.id).await {
            tracing::warn!("failed to record API key usage for {}: {e}", key.id);
        }

        Ok(AuthContext {
            user_id: key.user_id,
            tenant_id: key.tenant_id,
            email: None,
            name: None,
            scopes: key.scopes,
            credential: CredentialKind::ApiKey { key_id: key.id },
        })
    }

    fn authenticate_token(&self, headers: &HeaderMap) -> AppResult<AuthContext> {
        let token = Self::extract_bearer(headers)
            .or_else(|| get_cookie_value(headers, cookies::ACCESS_TOKEN))
            .ok_or_else(AppError::auth_required)?;

        let claims = self.auth_manager.validate_access_token(&token)?;
        let user_id = claims.user_id()?;

        Ok(AuthContext {
            user_id: Some(user_id),
            tenant_id: claims.tenant_id,
            email: Some(claims.email),
            name: Some(claims.name),
            scopes: claims.scopes,
            credential: CredentialKind::AccessToken,
        })
    }

    /// Pull an API-key-shaped value out of the request, if any
    fn extract_api_key(headers: &HeaderMap, query_api_key: Option<&str>) -> Option<String> {
        if let Some(value) = Self::extract_bearer(headers) {
            if ApiKeyManager::matches_format(&value) {
                return Some(value);
            }
        }

        if let Some(value) = headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
            if ApiKeyManager::matches_format(value) {
                return Some(value.to_owned());
            }
        }

        query_api_key
            .filter(|v| ApiKeyManager::matches_format(v))
            .map(ToOwned::to_owned)
    }

    fn extract_bearer(headers: &HeaderMap) -> Option<String> {
        let auth_header = headers.get(http::header::AUTHORIZATION)?.to_str().ok()?;
        let value = auth_header.strip_prefix("Bearer ")?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_owned())
        }
    }
}

/// Extract a cookie value from the `Cookie` header
#[must_use]
pub fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie_header = headers.get(http::header::COOKIE)?.to_str().ok()?;
    cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key == name && !value.is_empty() {
            Some(value.to_owned())
        } else {
            None
        }
    })
}
