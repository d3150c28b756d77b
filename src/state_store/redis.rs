// ABOUTME: Shared OAuth state store on Redis for multi-instance deployments
// ABOUTME: TTL via SET EX; destructive read via GETDEL so one-time use holds across instances
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

use super::{OAuthStateStore, StateData};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

const KEY_PREFIX: &str = "oauth_state:";

/// Redis-backed state store for multi-instance deployments
///
/// GETDEL makes the destructive read a single atomic server-side operation,
/// so two instances racing on the same callback cannot both consume a state.
#[derive(Clone)]
pub struct RedisStateStore {
    conn: ConnectionManager,
    ttl_seconds: u64,
}

impl RedisStateStore {
    /// Connect to Redis and build a store with the given state TTL
    ///
    /// # Errors
    ///
    /// Returns an error if the Redis connection cannot be established
    pub async fn connect(redis_url: &str, ttl_seconds: u64) -> AppResult<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| AppError::config("invalid Redis URL").with_source(e))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| AppError::database("failed to connect to Redis").with_source(e))?;
        Ok(Self { conn, ttl_seconds })
    }

    fn key(state: &str) -> String {
        format!("{KEY_PREFIX}{state}")
    }
}

#[async_trait]
impl OAuthStateStore for RedisStateStore {
    async fn store_state(&self, state: &str, data: StateData) -> AppResult<()> {
        let payload = serde_json::to_string(&data)
            .map_err(|e| AppError::internal("failed to encode state payload").with_source(e))?;
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(Self::key(state), payload, self.ttl_seconds)
            .await
            .map_err(|e| AppError::database("failed to store OAuth state").with_source(e))
    }

    async fn validate_state(&self, state: &str) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        conn.exists(Self::key(state))
            .await
            .map_err(|e| AppError::database("failed to check OAuth state").with_source(e))
    }

    async fn get_state_data(&self, state: &str) -> AppResult<StateData> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn
            .get_del(Self::key(state))
            .await
            .map_err(|e| AppError::database("failed to consume OAuth state").with_source(e))?;

        let payload = payload.ok_or_else(|| AppError::auth_invalid("invalid state"))?;
        serde_json::from_str(&payload)
            .map_err(|e| AppError::internal("failed to decode state payload").with_source(e))
    }
}
