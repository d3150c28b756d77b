// ABOUTME: Request authentication middleware module
// ABOUTME: Unified credential extraction and scope-requirement guards
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! Request authentication and authorization middleware.

/// Unified authenticator and authorization context
pub mod auth;

pub use auth::{AuthContext, CredentialKind, UnifiedAuthMiddleware};
