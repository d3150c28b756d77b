// ABOUTME: Centralized constants for credential formats, limits, and default TTLs
// ABOUTME: Single source of truth for values shared across auth, flows, and config
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! Centralized constants used across the IAM engine.

/// API key prefixes identifying the environment a secret belongs to
pub mod key_prefixes {
    /// Production API keys: `tg_live_<64 hex>`
    pub const LIVE: &str = "tg_live";
    /// Test/sandbox API keys: `tg_test_<64 hex>`
    pub const TEST: &str = "tg_test";
    /// Hex characters in the secret tail (32 random bytes)
    pub const SECRET_HEX_LEN: usize = 64;
    /// Hex characters shown in the stored display prefix
    pub const DISPLAY_HEX_LEN: usize = 8;
}

/// Credential and flow limits
pub mod limits {
    /// Digits in a one-time code
    pub const OTP_CODE_LENGTH: usize = 6;
    /// Verification attempts before a code is permanently dead
    pub const OTP_MAX_ATTEMPTS: u32 = 5;
    /// Minutes until a one-time code expires
    pub const OTP_EXPIRY_MINUTES: i64 = 10;
    /// Seconds a caller must wait between code requests for one contact
    pub const OTP_RATE_LIMIT_SECONDS: i64 = 60;
    /// Random bytes in an API key secret
    pub const API_KEY_SECRET_BYTES: usize = 32;
    /// Random bytes in an invitation token
    pub const INVITATION_TOKEN_BYTES: usize = 32;
    /// Random bytes in a password-reset token
    pub const RESET_TOKEN_BYTES: usize = 32;
    /// Days until an invitation expires by default
    pub const INVITATION_EXPIRY_DAYS: i64 = 7;
    /// Minutes an access token stays valid
    pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;
    /// Days a refresh token stays valid
    pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;
    /// Seconds an OAuth CSRF state stays valid
    pub const OAUTH_STATE_TTL_SECONDS: u64 = 600;
    /// Seconds between reaper sweeps
    pub const CLEANUP_INTERVAL_SECONDS: u64 = 3600;
    /// Days a new tenant stays in trial
    pub const TENANT_TRIAL_DAYS: i64 = 30;
    /// Years a paid subscription runs before renewal
    pub const TENANT_SUBSCRIPTION_YEARS: i32 = 1;
    /// Default bcrypt cost for the password-hash collaborator
    pub const BCRYPT_COST: u32 = 10;
}

/// Per-plan user quotas
pub mod plan_limits {
    /// Trial plan seat ceiling
    pub const MAX_USERS_TRIAL: u32 = 5;
    /// Basic plan seat ceiling
    pub const MAX_USERS_BASIC: u32 = 5;
    /// Professional plan seat ceiling
    pub const MAX_USERS_PROFESSIONAL: u32 = 50;
    /// Enterprise plan seat ceiling
    pub const MAX_USERS_ENTERPRISE: u32 = 500;
}

/// Service identity used in logs and token claims
pub mod service_names {
    /// Service name for structured logging
    pub const SERVICE: &str = "talentgate-iam";
    /// Default JWT issuer
    pub const TOKEN_ISSUER: &str = "talentgate";
    /// Default JWT audience
    pub const TOKEN_AUDIENCE: &str = "talentgate-api";
}

/// Cookie names used when credentials ride on a browser session
pub mod cookies {
    /// Access token cookie
    pub const ACCESS_TOKEN: &str = "access_token";
    /// Refresh token cookie
    pub const REFRESH_TOKEN: &str = "refresh_token";
}

/// Identity-provider endpoints
pub mod oauth_endpoints {
    /// Google authorization endpoint
    pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
    /// Google token endpoint
    pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
    /// Google userinfo endpoint
    pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
    /// Microsoft authorization endpoint
    pub const MICROSOFT_AUTH_URL: &str =
        "https://login.microsoftonline.com/common/oauth2/v2.0/authorize";
    /// Microsoft token endpoint
    pub const MICROSOFT_TOKEN_URL: &str =
        "https://login.microsoftonline.com/common/oauth2/v2.0/token";
    /// Microsoft Graph userinfo endpoint
    pub const MICROSOFT_USERINFO_URL: &str = "https://graph.microsoft.com/v1.0/me";
}
