// ABOUTME: Background reaper sweeping expired tokens, sessions, codes, and invitations
// ABOUTME: Runs once at startup then on a fixed interval until the shutdown signal fires
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! # Session/Token Lifecycle Reaper
//!
//! A single long-lived task per process. Each sweep deletes refresh tokens
//! that are expired or revoked, expired sessions, dead password-reset
//! tokens, and consumed or expired one-time codes, and moves expired
//! PENDING invitations to their terminal state. Sweep errors are logged and
//! never interrupt the loop; zero matching rows is the common case.

use crate::invitations::InvitationService;
use crate::store::IamStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Background cleanup service
#[derive(Clone)]
pub struct CleanupService {
    store: Arc<dyn IamStore>,
    invitations: InvitationService,
    interval: Duration,
}

impl CleanupService {
    /// Create a new cleanup service sweeping on the given interval
    #[must_use]
    pub fn new(
        store: Arc<dyn IamStore>,
        invitations: InvitationService,
        interval_seconds: u64,
    ) -> Self {
        Self {
            store,
            invitations,
            interval: Duration::from_secs(interval_seconds),
        }
    }

    /// Run the sweep loop until the shutdown signal changes.
    ///
    /// The first sweep happens immediately; later sweeps follow the
    /// configured interval.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        info!("cleanup service started, interval {:?}", self.interval);

        loop {
            tokio::select! {
                // The first tick completes immediately, giving the sweep-at-startup behavior
                _ = ticker.tick() => {
                    self.sweep().await;
                }
                _ = shutdown.changed() => {
                    info!("cleanup service stopped");
                    return;
                }
            }
        }
    }

    /// Spawn the sweep loop on the current runtime
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Run a single sweep; every step tolerates zero matching rows and
    /// failures are logged without aborting the remaining steps
    pub async fn sweep(&self) {
        debug!("running cleanup sweep");

        match self.store.delete_dead_refresh_tokens().await {
            Ok(n) if n > 0 => debug!("deleted {n} dead refresh tokens"),
            Ok(_) => {}
            Err(e) => warn!("failed to sweep refresh tokens: {e}"),
        }

        match self.store.delete_expired_sessions().await {
            Ok(n) if n > 0 => debug!("deleted {n} expired sessions"),
            Ok(_) => {}
            Err(e) => warn!("failed to sweep sessions: {e}"),
        }

        match self.store.delete_dead_reset_tokens().await {
            Ok(n) if n > 0 => debug!("deleted {n} dead reset tokens"),
            Ok(_) => {}
            Err(e) => warn!("failed to sweep reset tokens: {e}"),
        }

        match self.store.delete_dead_otps().await {
            Ok(n) if n > 0 => debug!("deleted {n} dead one-time codes"),
            Ok(_) => {}
            Err(e) => warn!("failed to sweep one-time codes: {e}"),
        }

        match self.invitations.mark_expired_invitations().await {
            Ok(n) if n > 0 => debug!("expired {n} pending invitations"),
            Ok(_) => {}
            Err(e) => warn!("failed to expire invitations: {e}"),
        }
    }
}
