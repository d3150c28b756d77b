// ABOUTME: One-time OAuth CSRF state store with pluggable backends
// ABOUTME: In-memory and Redis variants share identical observable semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! # OAuth State Store
//!
//! CSRF state tokens for the OAuth flow: unguessable, TTL-bound, and
//! consumed exactly once — the destructive read is an atomic get-and-delete,
//! so a replayed callback fails with invalid-state even under concurrent
//! access from multiple process instances.
//!
//! Two interchangeable backends: [`memory::MemoryStateStore`] for
//! single-instance deployments and [`redis::RedisStateStore`] for
//! multi-instance deployments. Caller code never changes between them.

/// In-memory state store implementation
pub mod memory;
/// Redis state store implementation
pub mod redis;

use crate::errors::AppResult;
use crate::models::OAuthProviderKind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request-scoped payload stored under a state token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateData {
    /// Provider the login was initiated against
    pub provider: OAuthProviderKind,
    /// Invitation token carried through the flow, when registering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitation_token: Option<String>,
}

/// One-time CSRF state storage for the OAuth flow
#[async_trait]
pub trait OAuthStateStore: Send + Sync {
    /// Generate an unguessable state token
    fn generate_state(&self) -> String {
        crate::crypto::generate_token_hex(32)
    }

    /// Persist a payload under a state token with the configured TTL
    async fn store_state(&self, state: &str, data: StateData) -> AppResult<()>;

    /// Non-destructive existence + TTL check, used when the provider echoes
    /// the state back before code exchange
    async fn validate_state(&self, state: &str) -> AppResult<bool>;

    /// Destructive read: return the payload and delete it atomically.
    ///
    /// # Errors
    ///
    /// Returns an invalid-state error when the token is unknown, expired, or
    /// already consumed — the second read of any token always fails.
    async fn get_state_data(&self, state: &str) -> AppResult<StateData>;
}
