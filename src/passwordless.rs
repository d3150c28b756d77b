// ABOUTME: Passwordless signup and login orchestration over one-time codes
// ABOUTME: Invitation-gated signup, account linking onto OAuth-only users, enumeration-safe login
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! # Passwordless (OTP) Flow
//!
//! Signup is invitation-gated: the invitation must be pending, unexpired,
//! and match the email. When an account already exists for (email, tenant)
//! with OAuth-only credentials, the flow *links* code login onto it instead
//! of creating a duplicate. Login never confirms whether an unknown email
//! exists; known-but-unusable accounts get explicit refusals.

use crate::errors::{AppError, AppResult};
use crate::models::{
    OAuthProviderKind, OtpPurpose, TenantId, User, UserStatus,
};
use crate::otp::OtpService;
use crate::sessions::{ClientMeta, IssuedTokens, SessionManager};
use crate::store::IamStore;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// Login methods available on an account
#[derive(Debug, Clone, Serialize)]
pub struct AuthMethods {
    /// One-time-code login enabled
    pub otp: bool,
    /// OAuth identity linked
    pub oauth: bool,
    /// Linked provider, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_provider: Option<OAuthProviderKind>,
}

impl AuthMethods {
    fn of(user: &User) -> Self {
        Self {
            otp: user.has_otp(),
            oauth: user.has_oauth(),
            oauth_provider: user.oauth_provider,
        }
    }
}

/// Outcome of signup initiation
#[derive(Debug, Clone, Serialize)]
pub struct SignupInitiation {
    /// Human-readable outcome message
    pub message: String,
    /// Email the code was sent to
    pub email: String,
    /// Tenant the signup targets
    pub tenant_id: TenantId,
    /// Whether a code must be verified next (always true)
    pub requires_otp: bool,
    /// Seconds until the delivered code expires
    pub expires_in_seconds: i64,
    /// Whether code login was linked onto an existing account
    pub account_linked: bool,
    /// Login methods now available, populated when linking occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_login_with: Option<AuthMethods>,
}

/// Outcome of signup verification
#[derive(Debug, Clone, Serialize)]
pub struct SignupVerification {
    /// Verified email
    pub email: String,
    /// Tenant the account belongs to
    pub tenant_id: TenantId,
}

/// Outcome of login initiation; success-shaped even for unknown contacts
#[derive(Debug, Clone, Serialize)]
pub struct LoginInitiation {
    /// Human-readable outcome message
    pub message: String,
    /// Email the request named
    pub email: String,
    /// Seconds until the delivered code expires
    pub expires_in_seconds: i64,
    /// Login methods on the account; absent for unknown contacts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_methods: Option<AuthMethods>,
}

/// Purpose of a resend request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResendPurpose {
    /// Resend a signup verification code
    Signup,
    /// Resend a login code
    Login,
}

/// One tenant an email holds an account in
#[derive(Debug, Clone, Serialize)]
pub struct TenantOption {
    /// Tenant identifier
    pub tenant_id: TenantId,
    /// Organization name
    pub company_name: String,
    /// Account status within that tenant
    pub user_status: UserStatus,
    /// Login methods on that account
    pub auth_methods: AuthMethods,
}

/// Orchestrates passwordless signup and login
#[derive(Clone)]
pub struct PasswordlessFlow {
    store: Arc<dyn IamStore>,
    otp: OtpService,
    sessions: SessionManager,
}

impl PasswordlessFlow {
    /// Create a new passwordless flow
    #[must_use]
    pub fn new(store: Arc<dyn IamStore>, otp: OtpService, sessions: SessionManager) -> Self {
        Self {
            store,
            otp,
            sessions,
        }
    }

    /// Start a signup: validate the invitation, create or link the account,
    /// and send a verification code.
    ///
    /// # Errors
    ///
    /// Returns business errors for invalid/expired/mismatched invitations,
    /// inactive tenants, exhausted quotas, and accounts that already have
    /// code login (conflict steering to login).
    pub async fn initiate_signup(
        &self,
        email: &str,
        name: &str,
        invitation_token: &str,
    ) -> AppResult<SignupInitiation> {
        let invitation = self
            .store
            .get_invitation_by_token(invitation_token)
            .await?
            .ok_or_else(|| AppError::not_found("invitation"))?;

        if !invitation.can_be_accepted() {
            if invitation.is_expired() {
                return Err(AppError::expired("invitation has expired"));
            }
            return Err(AppError::invalid_state("invitation cannot be accepted")
                .with_detail("status", invitation.status.to_string()));
        }
        if invitation.email != email {
            return Err(AppError::invalid_input("email does not match invitation"));
        }

        let tenant_id = invitation.tenant_id;
        let mut tenant = self
            .store
            .get_tenant(tenant_id)
            .await?
            .ok_or_else(|| AppError::not_found("tenant"))?;
        if !tenant.is_active() {
            return Err(AppError::tenant_inactive("organization is not active"));
        }

        if let Some(mut existing) = self.store.get_user_by_email(email, tenant_id).await? {
            if existing.has_otp() {
                return Err(AppError::already_exists(
                    "account already exists with code login; use login instead",
                )
                .with_detail("can_login_with_otp", true)
                .with_detail("can_login_with_oauth", existing.has_oauth()));
            }
            if existing.has_oauth() {
                // Account linking: enable code login on the OAuth-only account
                existing.enable_otp();
                self.store.update_user(&existing).await?;

                let otp = self
                    .otp
                    .generate(email, OtpPurpose::Verification)
                    .await?;

                return Ok(SignupInitiation {
                    message:
                        "Code login linked to your existing account. Please verify your email."
                            .to_owned(),
                    email: email.to_owned(),
                    tenant_id,
                    requires_otp: true,
                    expires_in_seconds: seconds_until(otp.expires_at),
                    account_linked: true,
                    can_login_with: Some(AuthMethods::of(&existing)),
                });
            }
            return Err(AppError::already_exists("account already exists in this organization"));
        }

        if !tenant.can_add_user() {
            return Err(AppError::quota_exceeded(
                "organization has reached its user limit",
            ));
        }

        let scopes = if invitation.scopes.is_empty() {
            default_scopes()
        } else {
            invitation.scopes.clone()
        };
        let mut user = User::new(tenant_id, email.to_owned(), name.to_owned(), scopes);
        user.otp_enabled = true;

        self.store.create_user(&user).await?;

        if tenant.add_user().is_ok() {
            if let Err(e) = self.store.update_tenant(&tenant).await {
                tracing::warn!("failed to persist tenant user count for {tenant_id}: {e}");
            }
        }

        let mut invitation = invitation;
        if invitation.accept(user.id).is_ok() {
            if let Err(e) = self.store.update_invitation(&invitation).await {
                tracing::warn!("failed to mark invitation {} accepted: {e}", invitation.id);
            }
        }

        let otp = self
            .otp
            .generate(email, OtpPurpose::Verification)
            .await
            .map_err(|e| e.with_detail("account_created", true))?;

        Ok(SignupInitiation {
            message: "Account created! Please check your email for a verification code."
                .to_owned(),
            email: email.to_owned(),
            tenant_id,
            requires_otp: true,
            expires_in_seconds: seconds_until(otp.expires_at),
            account_linked: false,
            can_login_with: None,
        })
    }

    /// Verify the signup code and activate the pending account
    ///
    /// # Errors
    ///
    /// Returns code-verification errors, or not-found when no account
    /// exists for the pair
    pub async fn verify_signup(
        &self,
        email: &str,
        tenant_id: TenantId,
        code: &str,
    ) -> AppResult<SignupVerification> {
        self.otp.verify(email, OtpPurpose::Verification, code).await?;

        let mut user = self
            .store
            .get_user_by_email(email, tenant_id)
            .await?
            .ok_or_else(|| AppError::not_found("user"))?;

        if user.status == UserStatus::Pending {
            user.activate()?;
        }
        user.email_verified = true;
        user.updated_at = Utc::now();
        self.store.update_user(&user).await?;

        Ok(SignupVerification {
            email: email.to_owned(),
            tenant_id,
        })
    }

    /// Start a login by sending a code.
    ///
    /// Unknown contacts get a success-shaped response so the endpoint never
    /// confirms account existence. Accounts that exist but cannot use code
    /// login are refused explicitly.
    ///
    /// # Errors
    ///
    /// Returns business errors for inactive accounts, OAuth-only accounts
    /// (steering to the provider), unverified emails, inactive tenants, and
    /// rate-limited issuance.
    pub async fn initiate_login(
        &self,
        email: &str,
        tenant_id: TenantId,
    ) -> AppResult<LoginInitiation> {
        let Some(user) = self.store.get_user_by_email(email, tenant_id).await? else {
            // Do not reveal whether the email exists
            return Ok(LoginInitiation {
                message: "If this email is registered, you'll receive a login code.".to_owned(),
                email: email.to_owned(),
                expires_in_seconds: 300,
                auth_methods: None,
            });
        };

        if !user.is_active() {
            return Err(AppError::invalid_state(
                "account is not active; complete signup verification or contact support",
            ));
        }

        if !user.has_otp() {
            let provider = user
                .oauth_provider
                .map_or("OAuth", OAuthProviderKind::display_name);
            return Err(AppError::invalid_state(format!(
                "this account uses {provider} login; sign in with {provider} instead"
            ))
            .with_detail("can_login_with_oauth", true));
        }

        if !user.email_verified {
            return Err(AppError::invalid_state("email not verified")
                .with_detail("requires_verification", true));
        }

        let tenant_active = self
            .store
            .get_tenant(user.tenant_id)
            .await?
            .is_some_and(|t| t.is_active());
        if !tenant_active {
            return Err(AppError::tenant_inactive(
                "account access is currently unavailable",
            ));
        }

        let otp = self.otp.generate(email, OtpPurpose::Verification).await?;

        Ok(LoginInitiation {
            message: "Login code sent to your email!".to_owned(),
            email: email.to_owned(),
            expires_in_seconds: seconds_until(otp.expires_at),
            auth_methods: Some(AuthMethods::of(&user)),
        })
    }

    /// Verify the login code and establish a session
    ///
    /// # Errors
    ///
    /// Returns code-verification errors, or business errors when the
    /// account or tenant cannot log in
    pub async fn verify_login(
        &self,
        email: &str,
        tenant_id: TenantId,
        code: &str,
        client: &ClientMeta,
    ) -> AppResult<IssuedTokens> {
        self.otp.verify(email, OtpPurpose::Verification, code).await?;

        let mut user = self
            .store
            .get_user_by_email(email, tenant_id)
            .await?
            .ok_or_else(|| AppError::auth_invalid("authentication failed"))?;

        if !user.is_active() {
            return Err(AppError::invalid_state("account cannot log in")
                .with_detail("status", user.status.to_string()));
        }

        let tenant = self
            .store
            .get_tenant(user.tenant_id)
            .await?
            .filter(crate::models::Tenant::is_active)
            .ok_or_else(|| AppError::tenant_inactive("organization is not active"))?;

        // A verified login code proves control of the email address
        if !user.email_verified {
            user.email_verified = true;
            user.updated_at = Utc::now();
            self.store.update_user(&user).await?;
        }

        self.sessions.establish(user, tenant, client).await
    }

    /// Resend a code for signup verification or login.
    ///
    /// Unknown contacts get a success-shaped response; status rules depend
    /// on the purpose (signup resends only for pending accounts, login
    /// resends only for active ones).
    ///
    /// # Errors
    ///
    /// Returns business errors for wrong-status accounts, inactive tenants,
    /// and rate-limited issuance
    pub async fn resend_code(
        &self,
        email: &str,
        tenant_id: TenantId,
        purpose: ResendPurpose,
    ) -> AppResult<LoginInitiation> {
        let Some(user) = self.store.get_user_by_email(email, tenant_id).await? else {
            return Ok(LoginInitiation {
                message: "If this email is registered, a verification code has been sent."
                    .to_owned(),
                email: email.to_owned(),
                expires_in_seconds: 300,
                auth_methods: None,
            });
        };

        let tenant_active = self
            .store
            .get_tenant(tenant_id)
            .await?
            .is_some_and(|t| t.is_active());
        if !tenant_active {
            return Err(AppError::tenant_inactive("unable to send verification code"));
        }

        match purpose {
            ResendPurpose::Signup if user.status != UserStatus::Pending => {
                return Err(AppError::invalid_state(
                    "account is already verified; use login instead",
                ));
            }
            ResendPurpose::Login if !user.is_active() => {
                return Err(AppError::invalid_state("account is not active"));
            }
            _ => {}
        }

        let otp = self.otp.generate(email, OtpPurpose::Verification).await?;

        Ok(LoginInitiation {
            message: "Verification code sent.".to_owned(),
            email: email.to_owned(),
            expires_in_seconds: seconds_until(otp.expires_at),
            auth_methods: Some(AuthMethods::of(&user)),
        })
    }

    /// List the tenants where an email holds an account, with the login
    /// methods available in each.
    ///
    /// Unknown emails yield an empty list, never an error, and inactive
    /// tenants are filtered out.
    ///
    /// # Errors
    ///
    /// Returns an error only on storage failure
    pub async fn user_tenants(&self, email: &str) -> AppResult<Vec<TenantOption>> {
        let users = self.store.get_users_by_email(email).await?;

        let mut options = Vec::with_capacity(users.len());
        for user in users {
            let Some(tenant) = self.store.get_tenant(user.tenant_id).await? else {
                continue;
            };
            if !tenant.is_active() {
                continue;
            }
            options.push(TenantOption {
                tenant_id: user.tenant_id,
                company_name: tenant.company_name,
                user_status: user.status,
                auth_methods: AuthMethods::of(&user),
            });
        }
        Ok(options)
    }
}

fn seconds_until(at: chrono::DateTime<Utc>) -> i64 {
    at.signed_duration_since(Utc::now()).num_seconds().max(0)
}

fn default_scopes() -> Vec<String> {
    crate::scopes::scopes_for_group(crate::scopes::DEFAULT_SCOPE_GROUP)
        .unwrap_or(&[crate::scopes::SCOPE_USERS_READ])
        .iter()
        .map(|s| (*s).to_owned())
        .collect()
}
