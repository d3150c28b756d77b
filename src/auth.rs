// ABOUTME: JWT token issuer for short-lived access tokens and long-lived refresh tokens
// ABOUTME: HS256 signing with explicit claims; verification collapses failures to one signal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! # Token Issuer
//!
//! Signs and verifies the two token kinds this engine issues:
//!
//! - **Access tokens**: short-lived, embedding principal id, tenant id,
//!   email, display name, and scopes.
//! - **Refresh tokens**: long-lived, carrying only the principal id. They are
//!   additionally persisted server-side so revocation works independent of
//!   signature validity; flows check the stored row on top of the signature.
//!
//! Verification failures never tell the caller whether a token was expired
//! or tampered with; everything collapses to one invalid-token signal.

use crate::config::JwtConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{TenantId, User};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in an access token
///
/// An explicit struct, deliberately: unknown claim keys are rejected at the
/// boundary instead of threading dynamic maps through the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Principal user ID
    pub sub: String,
    /// Tenant the principal belongs to
    pub tenant_id: TenantId,
    /// Principal email
    pub email: String,
    /// Principal display name
    pub name: String,
    /// Granted permission scopes
    pub scopes: Vec<String>,
    /// Token issuer
    pub iss: String,
    /// Intended audience
    pub aud: String,
    /// Issued-at timestamp
    pub iat: i64,
    /// Not-before timestamp
    pub nbf: i64,
    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// Parse the principal user ID out of the subject claim
    ///
    /// # Errors
    ///
    /// Returns an invalid-token error if the subject is not a UUID
    pub fn user_id(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::auth_invalid("invalid token"))
    }
}

/// Claims embedded in a refresh token: principal id and lifetime only
#[derive(Debug, Serialize, Deserialize)]
struct RefreshClaims {
    sub: String,
    iss: String,
    aud: String,
    iat: i64,
    nbf: i64,
    exp: i64,
}

/// Authentication manager signing and verifying both token kinds
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    issuer: String,
    audience: String,
}

impl AuthManager {
    /// Create a new authentication manager from JWT configuration
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_token_ttl_minutes),
            refresh_ttl: Duration::days(config.refresh_token_ttl_days),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    /// Access token lifetime
    #[must_use]
    pub const fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Refresh token lifetime
    #[must_use]
    pub const fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Generate a signed access token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_access_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            tenant_id: user.tenant_id,
            email: user.email.clone(),
            name: user.name.clone(),
            scopes: user.scopes.clone(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal("failed to sign access token").with_source(e))
    }

    /// Validate an access token's signature, algorithm, audience, and expiry
    ///
    /// # Errors
    ///
    /// Returns a single invalid-token error for every failure mode; the
    /// distinction between expired and tampered tokens is logged, not
    /// surfaced.
    pub fn validate_access_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("access token validation failed: {e}");
                AppError::auth_invalid("invalid token")
            })
    }

    /// Generate a signed refresh token carrying only the principal id
    ///
    /// The caller persists the returned string server-side; presentation is
    /// only honored while the stored row is unrevoked and unexpired.
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_refresh_token(&self, user_id: Uuid) -> AppResult<String> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + self.refresh_ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal("failed to sign refresh token").with_source(e))
    }

    /// Validate a refresh token's signature and expiry, returning the
    /// principal id
    ///
    /// This is the signature half of refresh verification; flows must also
    /// check the persisted row for revocation.
    ///
    /// # Errors
    ///
    /// Returns a single invalid-token error for every failure mode
    pub fn validate_refresh_token(&self, token: &str) -> AppResult<Uuid> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        let claims = decode::<RefreshClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("refresh token validation failed: {e}");
                AppError::auth_invalid("invalid token")
            })?;

        Uuid::parse_str(&claims.sub).map_err(|_| AppError::auth_invalid("invalid token"))
    }
}
