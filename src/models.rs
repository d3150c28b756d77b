// ABOUTME: Core data models for the multi-tenant IAM engine
// ABOUTME: Users, tenants, invitations, API keys, one-time codes, refresh tokens, sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! # Data Models
//!
//! Entity definitions shared by every flow. Domain rules (status transitions,
//! quota checks, expiry checks) live as pure methods on the entity values;
//! persistence happens explicitly through the [`crate::store::IamStore`]
//! contract, never through hidden shared references.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Type-safe wrapper for tenant identifiers
///
/// Provides compile-time distinction between tenant IDs and other UUIDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub Uuid);

impl TenantId {
    /// Create a new random `TenantId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `TenantId` from a UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TenantId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TenantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Identity provider supported for OAuth login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OAuthProviderKind {
    /// Google OAuth 2.0
    Google,
    /// Microsoft identity platform
    Microsoft,
}

impl OAuthProviderKind {
    /// Human-readable provider name for user-facing messages
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Microsoft => "Microsoft",
        }
    }
}

impl fmt::Display for OAuthProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
            Self::Microsoft => write!(f, "microsoft"),
        }
    }
}

impl FromStr for OAuthProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "microsoft" => Ok(Self::Microsoft),
            other => Err(AppError::invalid_input(format!(
                "unsupported OAuth provider: {other}"
            ))),
        }
    }
}

/// User account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    /// Invited but onboarding not completed
    Pending,
    /// Fully active account
    Active,
    /// Deactivated account
    Inactive,
    /// Suspended by administrative action
    Suspended,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Inactive => write!(f, "INACTIVE"),
            Self::Suspended => write!(f, "SUSPENDED"),
        }
    }
}

/// Principal identity scoped to one tenant
///
/// Email uniqueness is per-tenant, not global. A user may hold an OAuth link
/// and one-time-code login at the same time (account linking).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Tenant this user belongs to
    pub tenant_id: TenantId,
    /// Email address, unique within the tenant
    pub email: String,
    /// Display name
    pub name: String,
    /// Avatar URL from the identity provider, if any
    pub picture: Option<String>,
    /// Linked OAuth provider, if any
    pub oauth_provider: Option<OAuthProviderKind>,
    /// Subject identifier at the linked provider
    pub oauth_provider_id: Option<String>,
    /// Whether one-time-code login is enabled for this account
    pub otp_enabled: bool,
    /// Account status
    pub status: UserStatus,
    /// Granted permission scopes
    pub scopes: Vec<String>,
    /// Whether the email address was verified
    pub email_verified: bool,
    /// Last successful login
    pub last_login_at: Option<DateTime<Utc>>,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user in PENDING state with no credentials linked
    #[must_use]
    pub fn new(tenant_id: TenantId, email: String, name: String, scopes: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            email,
            name,
            picture: None,
            oauth_provider: None,
            oauth_provider_id: None,
            otp_enabled: false,
            status: UserStatus::Pending,
            scopes,
            email_verified: false,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether an OAuth identity is linked
    #[must_use]
    pub const fn has_oauth(&self) -> bool {
        self.oauth_provider.is_some() && self.oauth_provider_id.is_some()
    }

    /// Whether one-time-code login is enabled
    #[must_use]
    pub const fn has_otp(&self) -> bool {
        self.otp_enabled
    }

    /// Whether the account is ACTIVE
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Whether the account can log in at all (active and verified)
    #[must_use]
    pub fn can_login(&self) -> bool {
        self.is_active() && self.email_verified
    }

    /// Whether one-time-code login is currently possible
    #[must_use]
    pub fn can_login_with_otp(&self) -> bool {
        self.has_otp() && self.is_active() && self.email_verified
    }

    /// Enable one-time-code login (account linking)
    pub fn enable_otp(&mut self) {
        self.otp_enabled = true;
        self.updated_at = Utc::now();
    }

    /// Link an OAuth identity onto this account (account linking)
    pub fn link_oauth(&mut self, provider: OAuthProviderKind, provider_id: String) {
        self.oauth_provider = Some(provider);
        self.oauth_provider_id = Some(provider_id);
        self.updated_at = Utc::now();
    }

    /// Refresh profile fields from an identity provider; empty values are ignored
    pub fn update_profile(&mut self, name: &str, picture: &str) {
        if !name.is_empty() {
            self.name = name.to_owned();
        }
        if !picture.is_empty() {
            self.picture = Some(picture.to_owned());
        }
        self.updated_at = Utc::now();
    }

    /// Activate a PENDING account
    ///
    /// # Errors
    ///
    /// Returns an error if the account is not PENDING
    pub fn activate(&mut self) -> AppResult<()> {
        if self.status != UserStatus::Pending {
            return Err(AppError::invalid_state("only pending accounts can be activated")
                .with_detail("current_status", self.status.to_string()));
        }
        self.status = UserStatus::Active;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Suspend an ACTIVE account
    ///
    /// # Errors
    ///
    /// Returns an error if the account is not ACTIVE
    pub fn suspend(&mut self) -> AppResult<()> {
        if !self.is_active() {
            return Err(AppError::invalid_state("only active accounts can be suspended")
                .with_detail("current_status", self.status.to_string()));
        }
        self.status = UserStatus::Suspended;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record a successful login
    pub fn update_last_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Check whether this user holds a scope (wildcards included)
    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        crate::scopes::has_scope(&self.scopes, scope)
    }

    /// Check whether this user holds any of the scopes
    #[must_use]
    pub fn has_any_scope(&self, scopes: &[&str]) -> bool {
        crate::scopes::has_any_scope(&self.scopes, scopes)
    }

    /// Check whether this user holds all of the scopes
    #[must_use]
    pub fn has_all_scopes(&self, scopes: &[&str]) -> bool {
        crate::scopes::has_all_scopes(&self.scopes, scopes)
    }

    /// Whether this user holds administrative authority
    #[must_use]
    pub fn is_admin(&self) -> bool {
        crate::scopes::is_admin(&self.scopes)
    }

    /// Grant a scope if not already covered verbatim
    pub fn add_scope(&mut self, scope: &str) {
        if !self.has_scope(scope) {
            self.scopes.push(scope.to_owned());
            self.updated_at = Utc::now();
        }
    }

    /// Remove a verbatim scope grant
    pub fn remove_scope(&mut self, scope: &str) {
        self.scopes.retain(|s| s != scope);
        self.updated_at = Utc::now();
    }

    /// Replace the scope set
    pub fn set_scopes(&mut self, scopes: Vec<String>) {
        self.scopes = scopes;
        self.updated_at = Utc::now();
    }

    /// Grant full administrative authority
    pub fn make_admin(&mut self) {
        self.add_scope(crate::scopes::SCOPE_ALL);
    }

    /// Remove administrative authority
    pub fn revoke_admin(&mut self) {
        self.remove_scope(crate::scopes::SCOPE_ALL);
        self.remove_scope(crate::scopes::SCOPE_ADMIN_ALL);
    }
}

/// Tenant lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenantStatus {
    /// Evaluation period
    Trial,
    /// Paying, active organization
    Active,
    /// Suspended by administrative action
    Suspended,
    /// Subscription canceled
    Canceled,
}

impl fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trial => write!(f, "TRIAL"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Suspended => write!(f, "SUSPENDED"),
            Self::Canceled => write!(f, "CANCELED"),
        }
    }
}

/// Subscription plan determining the seat quota
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionPlan {
    /// Trial plan
    Trial,
    /// Basic plan
    Basic,
    /// Professional plan
    Professional,
    /// Enterprise plan
    Enterprise,
}

impl SubscriptionPlan {
    /// Seat ceiling for this plan
    #[must_use]
    pub const fn max_users(self) -> u32 {
        use crate::constants::plan_limits;
        match self {
            Self::Trial => plan_limits::MAX_USERS_TRIAL,
            Self::Basic => plan_limits::MAX_USERS_BASIC,
            Self::Professional => plan_limits::MAX_USERS_PROFESSIONAL,
            Self::Enterprise => plan_limits::MAX_USERS_ENTERPRISE,
        }
    }
}

/// Tenant organization in the multi-tenant setup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    /// Unique tenant identifier
    pub id: TenantId,
    /// Organization name
    pub company_name: String,
    /// Lifecycle status
    pub status: TenantStatus,
    /// Subscription plan
    pub plan: SubscriptionPlan,
    /// Seat quota ceiling
    pub max_users: u32,
    /// Seats currently counted against the quota
    pub current_users: u32,
    /// When the trial period ends, for trial tenants
    pub trial_expires_at: Option<DateTime<Utc>>,
    /// When the paid subscription ends, for paying tenants
    pub subscription_expires_at: Option<DateTime<Utc>>,
    /// When the tenant was created
    pub created_at: DateTime<Utc>,
    /// When the tenant was last updated
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Create a new tenant on the trial plan with the plan-derived quota
    #[must_use]
    pub fn new_trial(company_name: String, trial_days: i64) -> Self {
        let now = Utc::now();
        Self {
            id: TenantId::new(),
            company_name,
            status: TenantStatus::Trial,
            plan: SubscriptionPlan::Trial,
            max_users: SubscriptionPlan::Trial.max_users(),
            current_users: 0,
            trial_expires_at: Some(now + Duration::days(trial_days)),
            subscription_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the tenant is on the trial plan
    #[must_use]
    pub fn is_trial(&self) -> bool {
        self.status == TenantStatus::Trial
    }

    /// Whether the trial period is over
    #[must_use]
    pub fn is_trial_expired(&self) -> bool {
        self.trial_expires_at.is_some_and(|t| Utc::now() > t)
    }

    /// Whether the paid subscription is over
    #[must_use]
    pub fn is_subscription_expired(&self) -> bool {
        self.subscription_expires_at.is_some_and(|t| Utc::now() > t)
    }

    /// Whether the tenant accepts logins and new activity.
    ///
    /// An unexpired trial counts as active; suspended and canceled tenants
    /// never do.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self.status {
            TenantStatus::Trial => !self.is_trial_expired(),
            TenantStatus::Active => !self.is_subscription_expired(),
            TenantStatus::Suspended | TenantStatus::Canceled => false,
        }
    }

    /// Whether another user fits under the seat quota
    #[must_use]
    pub const fn can_add_user(&self) -> bool {
        self.current_users < self.max_users
    }

    /// Count one more user against the quota
    ///
    /// # Errors
    ///
    /// Returns an error if the quota is already reached
    pub fn add_user(&mut self) -> AppResult<()> {
        if !self.can_add_user() {
            return Err(AppError::quota_exceeded("organization has reached its user limit")
                .with_detail("max_users", self.max_users)
                .with_detail("current_users", self.current_users));
        }
        self.current_users += 1;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Release one seat
    pub fn remove_user(&mut self) {
        self.current_users = self.current_users.saturating_sub(1);
        self.updated_at = Utc::now();
    }

    /// Move the tenant to ACTIVE
    pub fn activate(&mut self) {
        self.status = TenantStatus::Active;
        self.updated_at = Utc::now();
    }

    /// Suspend the tenant
    pub fn suspend(&mut self) {
        self.status = TenantStatus::Suspended;
        self.updated_at = Utc::now();
    }

    /// Change the subscription plan, lifting the seat quota to the new
    /// plan's ceiling
    ///
    /// # Errors
    ///
    /// Returns an error if the tenant is canceled
    pub fn upgrade_plan(&mut self, plan: SubscriptionPlan) -> AppResult<()> {
        if self.status == TenantStatus::Canceled {
            return Err(AppError::invalid_state("canceled tenants cannot change plans"));
        }
        self.plan = plan;
        self.max_users = plan.max_users();
        if plan != SubscriptionPlan::Trial {
            self.status = TenantStatus::Active;
            self.trial_expires_at = None;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Invitation lifecycle status; everything except PENDING is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    /// Awaiting acceptance
    Pending,
    /// Accepted by the invited user
    Accepted,
    /// Expired without acceptance
    Expired,
    /// Revoked by the tenant
    Revoked,
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Accepted => write!(f, "ACCEPTED"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::Revoked => write!(f, "REVOKED"),
        }
    }
}

/// Single-use invitation granting tenant membership with a scope set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    /// Unique invitation identifier
    pub id: Uuid,
    /// Tenant extending the invitation
    pub tenant_id: TenantId,
    /// Email address the invitation targets
    pub email: String,
    /// Opaque single-use lookup token
    pub token: String,
    /// Scopes granted on acceptance
    pub scopes: Vec<String>,
    /// Lifecycle status
    pub status: InvitationStatus,
    /// User who issued the invitation
    pub invited_by: Uuid,
    /// When the invitation expires
    pub expires_at: DateTime<Utc>,
    /// When the invitation was accepted
    pub accepted_at: Option<DateTime<Utc>>,
    /// User created or linked through acceptance
    pub accepted_by: Option<Uuid>,
    /// When the invitation was created
    pub created_at: DateTime<Utc>,
    /// When the invitation was last updated
    pub updated_at: DateTime<Utc>,
}

impl Invitation {
    /// Whether the invitation is past its expiry timestamp
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Whether the invitation is PENDING and unexpired
    #[must_use]
    pub fn can_be_accepted(&self) -> bool {
        self.status == InvitationStatus::Pending && !self.is_expired()
    }

    /// Mark the invitation accepted by the given user
    ///
    /// # Errors
    ///
    /// Returns the corresponding business error when the invitation is
    /// expired, already accepted, or revoked
    pub fn accept(&mut self, user_id: Uuid) -> AppResult<()> {
        if !self.can_be_accepted() {
            return Err(match self.status {
                InvitationStatus::Accepted => {
                    AppError::already_used("invitation has already been accepted")
                }
                InvitationStatus::Revoked => AppError::revoked("invitation has been revoked"),
                InvitationStatus::Pending | InvitationStatus::Expired => {
                    AppError::expired("invitation has expired")
                }
            });
        }
        let now = Utc::now();
        self.status = InvitationStatus::Accepted;
        self.accepted_at = Some(now);
        self.accepted_by = Some(user_id);
        self.updated_at = now;
        Ok(())
    }

    /// Revoke a not-yet-accepted invitation
    ///
    /// # Errors
    ///
    /// Returns an error if the invitation was already accepted or revoked
    pub fn revoke(&mut self) -> AppResult<()> {
        match self.status {
            InvitationStatus::Accepted => {
                Err(AppError::already_used("invitation has already been accepted"))
            }
            InvitationStatus::Revoked => {
                Err(AppError::revoked("invitation is already revoked"))
            }
            InvitationStatus::Pending | InvitationStatus::Expired => {
                self.status = InvitationStatus::Revoked;
                self.updated_at = Utc::now();
                Ok(())
            }
        }
    }

    /// Move a PENDING invitation past its expiry to the terminal EXPIRED state
    pub fn mark_expired(&mut self) {
        if self.status == InvitationStatus::Pending && self.is_expired() {
            self.status = InvitationStatus::Expired;
            self.updated_at = Utc::now();
        }
    }
}

/// Long-lived API credential
///
/// Only the SHA-256 hash and a display prefix are ever stored; the plaintext
/// secret leaves the system exactly once at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    /// Unique key identifier
    pub id: Uuid,
    /// SHA-256 hex digest of the full secret; never exposed
    #[serde(skip_serializing)]
    pub key_hash: String,
    /// Display prefix for identification, e.g. `tg_live_1a2b3c4d...`
    pub key_prefix: String,
    /// Tenant the key belongs to
    pub tenant_id: TenantId,
    /// Optional owning user
    pub user_id: Option<Uuid>,
    /// Human-readable key name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Granted permission scopes
    pub scopes: Vec<String>,
    /// Whether the key is active (revocation clears this)
    pub is_active: bool,
    /// Optional expiry
    pub expires_at: Option<DateTime<Utc>>,
    /// When the key last authenticated a request
    pub last_used_at: Option<DateTime<Utc>>,
    /// When the key was created
    pub created_at: DateTime<Utc>,
    /// When the key was last updated
    pub updated_at: DateTime<Utc>,
}

impl ApiKey {
    /// Whether the key is past its expiry
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|t| Utc::now() > t)
    }

    /// Whether the key can authenticate requests
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_active && !self.is_expired()
    }

    /// Revoke the key (logical; the row survives until swept)
    pub fn revoke(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    /// Record that the key just authenticated a request
    pub fn touch(&mut self) {
        self.last_used_at = Some(Utc::now());
    }
}

/// Purpose a one-time code was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtpPurpose {
    /// Email verification and login
    Verification,
    /// Candidate-facing job application confirmation
    JobApplication,
}

/// One-time numeric code bound to a contact address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Otp {
    /// Unique code record identifier
    pub id: Uuid,
    /// Email or phone the code was sent to
    pub contact: String,
    /// The numeric code
    pub code: String,
    /// Purpose the code was issued for
    pub purpose: OtpPurpose,
    /// When the code expires
    pub expires_at: DateTime<Utc>,
    /// When the code was successfully verified; set once, never cleared
    pub verified_at: Option<DateTime<Utc>>,
    /// Verification attempts consumed so far
    pub attempts: u32,
    /// Attempt ceiling; reaching it kills the code regardless of correctness
    pub max_attempts: u32,
    /// When the code was issued
    pub created_at: DateTime<Utc>,
}

impl Otp {
    /// Whether the code can still be verified: unexpired, unconsumed, and
    /// under the attempt ceiling
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_expired() && self.verified_at.is_none() && self.attempts < self.max_attempts
    }

    /// Whether the code is past its expiry
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Consume one verification attempt
    pub fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    /// Mark the code verified, permanently consuming it
    pub fn mark_verified(&mut self) {
        self.verified_at = Some(Utc::now());
    }
}

/// Server-side refresh token row
///
/// The token string itself is a signed JWT; the row exists so revocation
/// works independent of signature validity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique row identifier
    pub id: Uuid,
    /// The signed refresh token string
    pub token: String,
    /// User the token belongs to
    pub user_id: Uuid,
    /// Tenant the token belongs to
    pub tenant_id: TenantId,
    /// When the token expires
    pub expires_at: DateTime<Utc>,
    /// Logical revocation flag; the row survives until swept
    pub is_revoked: bool,
    /// When the token was issued
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Whether the stored row still backs the token
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_revoked && Utc::now() < self.expires_at
    }
}

/// User session with client metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier
    pub id: Uuid,
    /// User the session belongs to
    pub user_id: Uuid,
    /// Tenant the session belongs to
    pub tenant_id: TenantId,
    /// Opaque session token
    pub session_token: String,
    /// Client IP address at session creation
    pub ip_address: String,
    /// Client user agent at session creation
    pub user_agent: String,
    /// When the session expires
    pub expires_at: DateTime<Utc>,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// Last observed activity
    pub last_activity: DateTime<Utc>,
}

impl Session {
    /// Whether the session is past its expiry
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Record session activity
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}
