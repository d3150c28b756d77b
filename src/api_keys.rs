// ABOUTME: API key management for long-lived machine credentials
// ABOUTME: Generation, format validation, and one-way hashing; the secret leaves once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! # API Key Management
//!
//! API key secrets have the form `tg_<env>_<64 hex>` where `env` is `live`
//! or `test`. Only the SHA-256 hash and a display prefix are persisted;
//! verification re-hashes the presented secret and looks the hash up — the
//! stored value is never reversible.

use crate::constants::key_prefixes;
use crate::errors::{AppError, AppResult};
use crate::models::{ApiKey, TenantId};
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Deployment environment an API key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyEnvironment {
    /// Production keys (`tg_live_...`)
    Live,
    /// Sandbox keys (`tg_test_...`)
    Test,
}

impl ApiKeyEnvironment {
    /// The two-part prefix for this environment
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Live => key_prefixes::LIVE,
            Self::Test => key_prefixes::TEST,
        }
    }
}

/// Freshly generated API key material
///
/// `secret` is the only copy of the plaintext; it is returned to the caller
/// exactly once and never stored.
#[derive(Debug)]
pub struct GeneratedApiKey {
    /// Full plaintext secret
    pub secret: String,
    /// Display prefix for identification (`tg_live_1a2b3c4d...`)
    pub key_prefix: String,
    /// SHA-256 hex digest of the full secret
    pub key_hash: String,
}

/// Parameters for building a new API key
#[derive(Debug)]
pub struct CreateApiKeyParams {
    /// Tenant the key belongs to
    pub tenant_id: TenantId,
    /// Optional owning user
    pub user_id: Option<Uuid>,
    /// Human-readable key name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Scopes to grant
    pub scopes: Vec<String>,
    /// Environment prefix to issue under
    pub environment: ApiKeyEnvironment,
    /// Days until expiry; `None` means the key never expires
    pub expires_in_days: Option<i64>,
}

/// API key manager
#[derive(Clone, Copy, Default)]
pub struct ApiKeyManager;

impl ApiKeyManager {
    /// Create a new API key manager
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Generate fresh key material for an environment
    #[must_use]
    pub fn generate(&self, environment: ApiKeyEnvironment) -> GeneratedApiKey {
        let tail = crate::crypto::generate_token_hex(crate::constants::limits::API_KEY_SECRET_BYTES);
        let prefix = environment.prefix();
        let secret = format!("{prefix}_{tail}");
        let key_prefix = format!("{prefix}_{}...", &tail[..key_prefixes::DISPLAY_HEX_LEN]);
        let key_hash = Self::hash_key(&secret);

        GeneratedApiKey {
            secret,
            key_prefix,
            key_hash,
        }
    }

    /// Hash an API key secret for storage or lookup
    #[must_use]
    pub fn hash_key(secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Check whether a presented value has the API key shape.
    ///
    /// Cheap structural pre-check run before any lookup, and used by the
    /// unified authenticator to decide between the API-key and token paths.
    #[must_use]
    pub fn matches_format(value: &str) -> bool {
        let mut parts = value.splitn(3, '_');
        let (Some(first), Some(second), Some(tail)) = (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        let prefix = format!("{first}_{second}");
        (prefix == key_prefixes::LIVE || prefix == key_prefixes::TEST)
            && tail.len() == key_prefixes::SECRET_HEX_LEN
            && tail.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Validate an API key's format
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix or secret length is wrong
    pub fn validate_format(&self, value: &str) -> AppResult<()> {
        if Self::matches_format(value) {
            Ok(())
        } else {
            Err(AppError::invalid_format("invalid API key format"))
        }
    }

    /// Build a new API key entity, returning it with the plaintext secret.
    ///
    /// The plaintext is returned exactly once here; every later interaction
    /// goes through the hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope set is empty or carries unregistered
    /// scopes
    pub fn build_key(&self, params: CreateApiKeyParams) -> AppResult<(ApiKey, String)> {
        if params.scopes.is_empty() {
            return Err(AppError::invalid_input("at least one scope is required"));
        }
        let invalid: Vec<&String> = params
            .scopes
            .iter()
            .filter(|s| !crate::scopes::validate_scope(s))
            .collect();
        if !invalid.is_empty() {
            return Err(AppError::invalid_input("unknown scopes in request")
                .with_detail("invalid_scopes", serde_json::json!(invalid)));
        }

        let generated = self.generate(params.environment);
        let now = Utc::now();
        let api_key = ApiKey {
            id: Uuid::new_v4(),
            key_hash: generated.key_hash,
            key_prefix: generated.key_prefix,
            tenant_id: params.tenant_id,
            user_id: params.user_id,
            name: params.name,
            description: params.description,
            scopes: params.scopes,
            is_active: true,
            expires_at: params.expires_in_days.map(|days| now + Duration::days(days)),
            last_used_at: None,
            created_at: now,
            updated_at: now,
        };

        Ok((api_key, generated.secret))
    }

    /// Check whether a stored key may authenticate requests
    ///
    /// # Errors
    ///
    /// Returns a revoked error for inactive keys and an expired error for
    /// keys past their expiry
    pub fn check_key(&self, api_key: &ApiKey) -> AppResult<()> {
        if !api_key.is_active {
            return Err(AppError::revoked("API key has been revoked"));
        }
        if api_key.is_expired() {
            return Err(AppError::expired("API key has expired"));
        }
        Ok(())
    }
}
