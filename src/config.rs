// ABOUTME: Environment-driven typed configuration for every IAM subsystem
// ABOUTME: Parses env vars with validated fallbacks; the JWT secret is the only hard requirement
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! Environment-based configuration management.
//!
//! Every knob has a compiled-in default from [`crate::constants`]; only the
//! JWT signing secret must be provided. Values that fail to parse fall back
//! to the default with a warning rather than aborting startup.

use crate::constants::{limits, service_names};
use anyhow::{Context, Result};
use std::env;
use tracing::warn;

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_parse<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("invalid value for {key}: {raw:?}, using default");
            default
        }),
        Err(_) => default,
    }
}

/// JWT signing configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC signing secret
    pub secret: String,
    /// Access token lifetime in minutes
    pub access_token_ttl_minutes: i64,
    /// Refresh token lifetime in days
    pub refresh_token_ttl_days: i64,
    /// Token issuer claim
    pub issuer: String,
    /// Token audience claim
    pub audience: String,
}

impl JwtConfig {
    /// Load from environment; `JWT_SECRET` is required
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is unset or empty
    pub fn from_env() -> Result<Self> {
        let secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        Ok(Self {
            secret,
            access_token_ttl_minutes: env_parse(
                "JWT_ACCESS_TTL_MINUTES",
                limits::ACCESS_TOKEN_TTL_MINUTES,
            ),
            refresh_token_ttl_days: env_parse(
                "JWT_REFRESH_TTL_DAYS",
                limits::REFRESH_TOKEN_TTL_DAYS,
            ),
            issuer: env_string("JWT_ISSUER", service_names::TOKEN_ISSUER),
            audience: env_string("JWT_AUDIENCE", service_names::TOKEN_AUDIENCE),
        })
    }

    /// Configuration with a fixed secret, for tests and embedding
    #[must_use]
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_ttl_minutes: limits::ACCESS_TOKEN_TTL_MINUTES,
            refresh_token_ttl_days: limits::REFRESH_TOKEN_TTL_DAYS,
            issuer: service_names::TOKEN_ISSUER.to_owned(),
            audience: service_names::TOKEN_AUDIENCE.to_owned(),
        }
    }
}

/// One-time-code configuration
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// Digits in a code
    pub code_length: usize,
    /// Minutes until a code expires
    pub expiry_minutes: i64,
    /// Verification attempts before a code is dead
    pub max_attempts: u32,
    /// Seconds a caller must wait between code requests for one contact
    pub rate_limit_seconds: i64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: limits::OTP_CODE_LENGTH,
            expiry_minutes: limits::OTP_EXPIRY_MINUTES,
            max_attempts: limits::OTP_MAX_ATTEMPTS,
            rate_limit_seconds: limits::OTP_RATE_LIMIT_SECONDS,
        }
    }
}

impl OtpConfig {
    /// Load from environment with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            code_length: env_parse("OTP_CODE_LENGTH", limits::OTP_CODE_LENGTH),
            expiry_minutes: env_parse("OTP_EXPIRY_MINUTES", limits::OTP_EXPIRY_MINUTES),
            max_attempts: env_parse("OTP_MAX_ATTEMPTS", limits::OTP_MAX_ATTEMPTS),
            rate_limit_seconds: env_parse(
                "OTP_RATE_LIMIT_SECONDS",
                limits::OTP_RATE_LIMIT_SECONDS,
            ),
        }
    }
}

/// Invitation configuration
#[derive(Debug, Clone)]
pub struct InvitationConfig {
    /// Days until an invitation expires by default
    pub default_expiry_days: i64,
    /// Random bytes in an invitation token
    pub token_bytes: usize,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            default_expiry_days: limits::INVITATION_EXPIRY_DAYS,
            token_bytes: limits::INVITATION_TOKEN_BYTES,
        }
    }
}

impl InvitationConfig {
    /// Load from environment with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            default_expiry_days: env_parse(
                "INVITATION_EXPIRY_DAYS",
                limits::INVITATION_EXPIRY_DAYS,
            ),
            token_bytes: env_parse("INVITATION_TOKEN_BYTES", limits::INVITATION_TOKEN_BYTES),
        }
    }
}

/// Session and reaper configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Seconds between reaper sweeps
    pub cleanup_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cleanup_interval_seconds: limits::CLEANUP_INTERVAL_SECONDS,
        }
    }
}

impl SessionConfig {
    /// Load from environment with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            cleanup_interval_seconds: env_parse(
                "CLEANUP_INTERVAL_SECONDS",
                limits::CLEANUP_INTERVAL_SECONDS,
            ),
        }
    }
}

/// Tenant lifecycle configuration
#[derive(Debug, Clone)]
pub struct TenantConfig {
    /// Days a new tenant stays in trial
    pub trial_days: i64,
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            trial_days: limits::TENANT_TRIAL_DAYS,
        }
    }
}

impl TenantConfig {
    /// Load from environment with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            trial_days: env_parse("TENANT_TRIAL_DAYS", limits::TENANT_TRIAL_DAYS),
        }
    }
}

/// OAuth state store configuration
#[derive(Debug, Clone)]
pub struct StateStoreConfig {
    /// Redis connection URL; `None` selects the in-process backend
    pub redis_url: Option<String>,
    /// Seconds a stored state stays valid
    pub ttl_seconds: u64,
}

impl Default for StateStoreConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            ttl_seconds: limits::OAUTH_STATE_TTL_SECONDS,
        }
    }
}

impl StateStoreConfig {
    /// Load from environment with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL").ok(),
            ttl_seconds: env_parse("OAUTH_STATE_TTL_SECONDS", limits::OAUTH_STATE_TTL_SECONDS),
        }
    }
}

/// Credentials and endpoints for one identity provider
#[derive(Debug, Clone)]
pub struct OAuthProviderConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Redirect URI registered with the provider
    pub redirect_url: String,
    /// Scopes requested from the provider
    pub scopes: Vec<String>,
}

impl OAuthProviderConfig {
    /// Load provider credentials from `<PREFIX>_CLIENT_ID` /
    /// `<PREFIX>_CLIENT_SECRET` / `<PREFIX>_REDIRECT_URL`
    ///
    /// # Errors
    ///
    /// Returns an error if the client id or secret is unset
    pub fn from_env(prefix: &str, default_scopes: &[&str]) -> Result<Self> {
        let client_id = env::var(format!("{prefix}_CLIENT_ID"))
            .with_context(|| format!("{prefix}_CLIENT_ID must be set"))?;
        let client_secret = env::var(format!("{prefix}_CLIENT_SECRET"))
            .with_context(|| format!("{prefix}_CLIENT_SECRET must be set"))?;
        let redirect_url = env_string(
            &format!("{prefix}_REDIRECT_URL"),
            &format!("http://localhost:8080/auth/callback/{}", prefix.to_lowercase()),
        );
        Ok(Self {
            client_id,
            client_secret,
            redirect_url,
            scopes: default_scopes.iter().map(|s| (*s).to_owned()).collect(),
        })
    }
}

/// Top-level authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing configuration
    pub jwt: JwtConfig,
    /// One-time-code configuration
    pub otp: OtpConfig,
    /// Invitation configuration
    pub invitation: InvitationConfig,
    /// Session and reaper configuration
    pub session: SessionConfig,
    /// Tenant lifecycle configuration
    pub tenant: TenantConfig,
    /// OAuth state store configuration
    pub state_store: StateStoreConfig,
}

impl AuthConfig {
    /// Load the full configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a required value (the JWT secret) is missing
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            jwt: JwtConfig::from_env()?,
            otp: OtpConfig::from_env(),
            invitation: InvitationConfig::from_env(),
            session: SessionConfig::from_env(),
            tenant: TenantConfig::from_env(),
            state_store: StateStoreConfig::from_env(),
        })
    }
}
