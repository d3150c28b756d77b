// ABOUTME: One-time-code service: rate-limited issuance and attempt-bounded verification
// ABOUTME: Counter increments before the equality check; verified codes are consumed forever
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! # One-Time Code Service
//!
//! State machine per (contact, purpose): *no code* → *code issued* →
//! {*verified*, *expired*, *attempts exhausted*}.
//!
//! Issuance is rate limited against the latest live code for the contact.
//! Verification burns an attempt before comparing, so a correct code
//! presented after the ceiling is still rejected.

use crate::config::OtpConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{Otp, OtpPurpose};
use crate::notifications::NotificationSender;
use crate::store::IamStore;
use chrono::{Duration, Utc};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Service issuing and verifying one-time codes
#[derive(Clone)]
pub struct OtpService {
    store: Arc<dyn IamStore>,
    sender: Arc<dyn NotificationSender>,
    config: OtpConfig,
}

impl OtpService {
    /// Create a new OTP service
    #[must_use]
    pub fn new(
        store: Arc<dyn IamStore>,
        sender: Arc<dyn NotificationSender>,
        config: OtpConfig,
    ) -> Self {
        Self {
            store,
            sender,
            config,
        }
    }

    /// Issue and deliver a new code for (contact, purpose).
    ///
    /// If a still-valid code for the pair was issued inside the rate-limit
    /// window, the call fails with too-many-requests instead of silently
    /// reusing or overwriting it. The code is persisted before delivery; a
    /// delivery failure still fails this call, because an undelivered code
    /// is useless to the caller.
    ///
    /// # Errors
    ///
    /// Returns a rate-limit error inside the issuance window, a storage
    /// error if persistence fails, and an external-service error if
    /// delivery fails.
    pub async fn generate(&self, contact: &str, purpose: OtpPurpose) -> AppResult<Otp> {
        if let Some(existing) = self.store.get_latest_otp(contact, purpose).await? {
            if existing.is_valid() {
                let elapsed = Utc::now().signed_duration_since(existing.created_at);
                let window = Duration::seconds(self.config.rate_limit_seconds);
                if elapsed < window {
                    let retry_after = (window - elapsed).num_seconds().max(1);
                    return Err(AppError::rate_limited(
                        "a code was recently sent to this contact",
                    )
                    .with_detail("retry_after_seconds", retry_after));
                }
            }
        }

        let now = Utc::now();
        let otp = Otp {
            id: Uuid::new_v4(),
            contact: contact.to_owned(),
            code: crate::crypto::generate_otp_code(self.config.code_length),
            purpose,
            expires_at: now + Duration::minutes(self.config.expiry_minutes),
            verified_at: None,
            attempts: 0,
            max_attempts: self.config.max_attempts,
            created_at: now,
        };

        self.store.create_otp(&otp).await?;

        self.sender.send_otp(contact, &otp.code).await.map_err(|e| {
            tracing::warn!("one-time code delivery failed for contact {contact}");
            AppError::external_service("notification", "failed to deliver one-time code")
                .with_source(e)
        })?;

        Ok(otp)
    }

    /// Verify a presented code for (contact, purpose).
    ///
    /// Check order: expiry (rejected before any attempt is counted), prior
    /// consumption ("already used"), attempt ceiling (permanent rejection
    /// even for the correct value), then the counter increments and the
    /// comparison runs in constant time.
    ///
    /// # Errors
    ///
    /// Returns expired / already-used / attempts-exhausted business errors,
    /// or an invalid-credential error with the remaining attempt count when
    /// the code does not match.
    pub async fn verify(
        &self,
        contact: &str,
        purpose: OtpPurpose,
        code: &str,
    ) -> AppResult<Otp> {
        let Some(mut otp) = self.store.get_latest_otp(contact, purpose).await? else {
            return Err(AppError::auth_invalid("invalid or expired code"));
        };

        if otp.is_expired() {
            return Err(AppError::expired("code has expired"));
        }
        if otp.verified_at.is_some() {
            return Err(AppError::already_used("code has already been used"));
        }
        if otp.attempts >= otp.max_attempts {
            return Err(AppError::attempts_exhausted("code is no longer usable")
                .with_detail("attempts_remaining", 0));
        }

        otp.record_attempt();

        let matches = otp.code.as_bytes().ct_eq(code.as_bytes()).into();
        if matches {
            otp.mark_verified();
            self.store.update_otp(&otp).await?;
            return Ok(otp);
        }

        self.store.update_otp(&otp).await?;
        let remaining = otp.max_attempts.saturating_sub(otp.attempts);
        Err(AppError::auth_invalid("invalid or expired code")
            .with_detail("attempts_remaining", remaining))
    }
}
