// ABOUTME: Notification sender contract for delivering one-time codes
// ABOUTME: Delivery is a collaborator; a failed send still fails the issuing call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! Outbound notification contract.
//!
//! Delivery transports (email, SMS) live outside this crate. The OTP flow
//! treats a send failure as a failure of the issuing call: the code was
//! persisted, but an undelivered code is useless to the caller.

use crate::errors::AppResult;
use async_trait::async_trait;

/// Sends one-time codes to a contact address
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver a one-time code to the contact
    async fn send_otp(&self, contact: &str, code: &str) -> AppResult<()>;
}

/// Development sender that logs instead of delivering
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnlySender;

#[async_trait]
impl NotificationSender for LogOnlySender {
    async fn send_otp(&self, contact: &str, _code: &str) -> AppResult<()> {
        tracing::info!("would deliver one-time code to {contact}");
        Ok(())
    }
}
