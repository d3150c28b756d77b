// ABOUTME: Process-local OAuth state store with TTL and optional background sweep
// ABOUTME: DashMap-backed; destructive read is an atomic remove
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

use super::{OAuthStateStore, StateData};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct StateEntry {
    data: StateData,
    expires_at: Instant,
}

/// In-memory state store for single-instance deployments
///
/// Entries expire lazily on access; a background sweep can be enabled to keep
/// the map from accumulating abandoned states.
#[derive(Clone)]
pub struct MemoryStateStore {
    entries: Arc<DashMap<String, StateEntry>>,
    ttl: Duration,
    shutdown_tx: Option<Arc<tokio::sync::mpsc::Sender<()>>>,
}

impl MemoryStateStore {
    /// Create a store with the given state TTL and no background sweep
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
            shutdown_tx: None,
        }
    }

    /// Create a store that also sweeps expired entries on an interval
    #[must_use]
    pub fn with_background_sweep(ttl: Duration, sweep_interval: Duration) -> Self {
        let entries: Arc<DashMap<String, StateEntry>> = Arc::new(DashMap::new());
        let (shutdown_tx, mut shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);
        let sweep_entries = Arc::clone(&entries);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(sweep_interval);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let now = Instant::now();
                        let before = sweep_entries.len();
                        sweep_entries.retain(|_, entry| entry.expires_at > now);
                        let removed = before.saturating_sub(sweep_entries.len());
                        if removed > 0 {
                            tracing::debug!("swept {removed} expired OAuth states");
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        tracing::debug!("OAuth state sweep task received shutdown signal");
                        break;
                    }
                }
            }
        });

        Self {
            entries,
            ttl,
            shutdown_tx: Some(Arc::new(shutdown_tx)),
        }
    }

    /// Number of live entries, counting not-yet-swept expired ones
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl OAuthStateStore for MemoryStateStore {
    async fn store_state(&self, state: &str, data: StateData) -> AppResult<()> {
        self.entries.insert(
            state.to_owned(),
            StateEntry {
                data,
                expires_at: Instant::now() + self.ttl,
            },
        );
        Ok(())
    }

    async fn validate_state(&self, state: &str) -> AppResult<bool> {
        let live = self
            .entries
            .get(state)
            .is_some_and(|entry| entry.expires_at > Instant::now());
        if !live {
            // lazy expiry; removing an absent key is a no-op
            self.entries.remove(state);
        }
        Ok(live)
    }

    async fn get_state_data(&self, state: &str) -> AppResult<StateData> {
        // remove() is the atomic get-and-delete; a concurrent second caller
        // observes None and fails.
        let (_, entry) = self
            .entries
            .remove(state)
            .ok_or_else(|| AppError::auth_invalid("invalid state"))?;

        if entry.expires_at <= Instant::now() {
            return Err(AppError::auth_invalid("invalid state"));
        }
        Ok(entry.data)
    }
}
