// ABOUTME: Crate root for the TalentGate multi-tenant IAM engine
// ABOUTME: Module tree and public re-exports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! # TalentGate IAM
//!
//! Multi-tenant authentication and scope-based authorization engine: decides
//! who a caller is (OAuth-linked identity, passwordless one-time-code login,
//! or a long-lived API key) and what that caller may do (wildcard
//! permission-string scopes), inside tenant-isolated boundaries.
//!
//! HTTP routing, persistence engines, and outbound delivery are collaborator
//! contracts ([`store::IamStore`], [`oauth::OAuthProvider`],
//! [`notifications::NotificationSender`]); this crate owns the flows and
//! their invariants: single-use tokens, attempt and rate limiting,
//! expiry-driven state transitions, tenant isolation, and account linking.

/// API key management for long-lived machine credentials
pub mod api_keys;
/// JWT token issuer for access and refresh tokens
pub mod auth;
/// Environment-driven typed configuration
pub mod config;
/// Centralized constants
pub mod constants;
/// Cryptographic random helpers for codes and tokens
pub mod crypto;
/// Unified error handling system
pub mod errors;
/// Invitation lifecycle service
pub mod invitations;
/// Background reaper for expired credentials
pub mod lifecycle;
/// Logging configuration and setup
pub mod logging;
/// Request authentication middleware and guards
pub mod middleware;
/// Core data models
pub mod models;
/// Outbound notification contract
pub mod notifications;
/// OAuth providers and flow
pub mod oauth;
/// One-time-code service
pub mod otp;
/// Passwordless signup and login flow
pub mod passwordless;
/// Scope model: vocabulary, matcher, groups
pub mod scopes;
/// Session issuance, refresh, and revocation
pub mod sessions;
/// One-time OAuth CSRF state store
pub mod state_store;
/// Storage contract consumed by the flows
pub mod store;
/// Tenant lifecycle and quota service
pub mod tenants;
/// User administration service
pub mod users;

pub use api_keys::{ApiKeyEnvironment, ApiKeyManager, CreateApiKeyParams};
pub use auth::{AuthManager, Claims};
pub use config::AuthConfig;
pub use errors::{AppError, AppResult, ErrorCode};
pub use middleware::{AuthContext, CredentialKind, UnifiedAuthMiddleware};
pub use models::{
    ApiKey, Invitation, InvitationStatus, OAuthProviderKind, Otp, OtpPurpose, RefreshToken,
    Session, SubscriptionPlan, Tenant, TenantId, TenantStatus, User, UserStatus,
};
pub use oauth::{OAuthFlow, OAuthProvider, ProviderRegistry};
pub use otp::OtpService;
pub use passwordless::PasswordlessFlow;
pub use sessions::{ClientMeta, IssuedTokens, SessionManager};
pub use state_store::{OAuthStateStore, StateData};
pub use store::IamStore;
