// ABOUTME: OAuth provider capability trait, normalized identity record, and provider registry
// ABOUTME: Providers are selected by kind through the registry, never by type switches in flow code
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! # OAuth Providers
//!
//! Each identity provider implements one capability interface: build an
//! authorization URL, exchange an authorization code, and fetch a normalized
//! user-info record. The flow resolves providers through a kind-keyed
//! registry.

/// OAuth login/registration flow orchestration
pub mod flow;
/// Concrete provider implementations
pub mod providers;

pub use flow::{LoginStart, OAuthFlow};
pub use providers::{GoogleOAuthProvider, MicrosoftOAuthProvider};

use crate::errors::AppResult;
use crate::models::OAuthProviderKind;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Token material returned by a provider's code exchange
#[derive(Debug, Clone)]
pub struct ProviderToken {
    /// Provider access token used to fetch user info
    pub access_token: String,
}

/// Normalized identity record returned by every provider
#[derive(Debug, Clone)]
pub struct OAuthUserInfo {
    /// Stable subject identifier at the provider
    pub provider_user_id: String,
    /// Email address as reported by the provider
    pub email: String,
    /// Display name
    pub name: String,
    /// Avatar URL; empty when the provider has none
    pub picture: String,
    /// Whether the provider vouches for the email address
    pub email_verified: bool,
}

/// Capability interface implemented by each identity provider
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Which provider this is
    fn kind(&self) -> OAuthProviderKind;

    /// Build the authorization URL carrying the CSRF state
    fn auth_url(&self, state: &str) -> String;

    /// Exchange an authorization code for provider tokens
    async fn exchange_code(&self, code: &str) -> AppResult<ProviderToken>;

    /// Fetch the normalized identity record for an access token
    async fn user_info(&self, access_token: &str) -> AppResult<OAuthUserInfo>;
}

/// Provider registry keyed by [`OAuthProviderKind`]
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<OAuthProviderKind, Arc<dyn OAuthProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its kind
    pub fn register(&mut self, provider: Arc<dyn OAuthProvider>) {
        self.providers.insert(provider.kind(), provider);
    }

    /// Look a provider up by kind
    #[must_use]
    pub fn get(&self, kind: OAuthProviderKind) -> Option<Arc<dyn OAuthProvider>> {
        self.providers.get(&kind).cloned()
    }

    /// Kinds with a registered provider
    #[must_use]
    pub fn kinds(&self) -> Vec<OAuthProviderKind> {
        self.providers.keys().copied().collect()
    }
}
