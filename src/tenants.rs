// ABOUTME: Tenant lifecycle service: creation, activation, plan changes, usage reporting
// ABOUTME: Seat quotas derive from the subscription plan; the entity enforces the ceiling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! # Tenant Service
//!
//! Tenants start in TRIAL with the trial quota and a trial expiry; an
//! explicit paid plan at creation goes straight to ACTIVE with a
//! subscription expiry. Plan changes move the quota ceiling; the
//! `current_users <= max_users` invariant itself lives on the entity.

use crate::config::TenantConfig;
use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use crate::models::{SubscriptionPlan, Tenant, TenantId};
use crate::store::IamStore;
use chrono::{Months, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Seat usage snapshot for a tenant
#[derive(Debug, Clone, Serialize)]
pub struct TenantUsage {
    /// Tenant identifier
    pub tenant_id: TenantId,
    /// Seats counted against the quota
    pub current_users: u32,
    /// Quota ceiling
    pub max_users: u32,
    /// Whether another user fits
    pub can_add_users: bool,
    /// Seats remaining under the ceiling
    pub remaining_users: u32,
}

/// Service managing tenant lifecycle and quotas
#[derive(Clone)]
pub struct TenantService {
    store: Arc<dyn IamStore>,
    config: TenantConfig,
}

impl TenantService {
    /// Create a new tenant service
    #[must_use]
    pub fn new(store: Arc<dyn IamStore>, config: TenantConfig) -> Self {
        Self { store, config }
    }

    /// Create a tenant. Defaults to TRIAL; an explicit paid plan activates
    /// immediately with a subscription expiry.
    ///
    /// # Errors
    ///
    /// Returns an error on storage failure
    pub async fn create(
        &self,
        company_name: String,
        plan: Option<SubscriptionPlan>,
    ) -> AppResult<Tenant> {
        let mut tenant = Tenant::new_trial(company_name, self.config.trial_days);

        if let Some(plan) = plan {
            if plan != SubscriptionPlan::Trial {
                tenant.upgrade_plan(plan)?;
                tenant.subscription_expires_at = subscription_expiry();
            }
        }

        self.store.create_tenant(&tenant).await?;
        Ok(tenant)
    }

    /// Get a tenant by ID
    ///
    /// # Errors
    ///
    /// Returns not-found for unknown tenants
    pub async fn get(&self, tenant_id: TenantId) -> AppResult<Tenant> {
        self.store
            .get_tenant(tenant_id)
            .await?
            .ok_or_else(|| AppError::not_found("tenant"))
    }

    /// Move a tenant to ACTIVE
    ///
    /// # Errors
    ///
    /// Returns not-found for unknown tenants
    pub async fn activate(&self, tenant_id: TenantId) -> AppResult<Tenant> {
        let mut tenant = self.get(tenant_id).await?;
        tenant.activate();
        self.store.update_tenant(&tenant).await?;
        Ok(tenant)
    }

    /// Suspend a tenant
    ///
    /// # Errors
    ///
    /// Returns not-found for unknown tenants
    pub async fn suspend(&self, tenant_id: TenantId, reason: &str) -> AppResult<Tenant> {
        let mut tenant = self.get(tenant_id).await?;
        tenant.suspend();
        self.store.update_tenant(&tenant).await?;
        tracing::info!("tenant {tenant_id} suspended: {reason}");
        Ok(tenant)
    }

    /// Change the subscription plan, lifting the seat ceiling and setting
    /// the subscription expiry for paid plans
    ///
    /// # Errors
    ///
    /// Returns not-found for unknown tenants and an invalid-state error
    /// for canceled ones
    pub async fn upgrade_plan(
        &self,
        tenant_id: TenantId,
        plan: SubscriptionPlan,
    ) -> AppResult<Tenant> {
        let mut tenant = self.get(tenant_id).await?;
        tenant.upgrade_plan(plan)?;
        if plan != SubscriptionPlan::Trial {
            tenant.subscription_expires_at = subscription_expiry();
        }
        self.store.update_tenant(&tenant).await?;
        Ok(tenant)
    }

    /// Seat usage snapshot
    ///
    /// # Errors
    ///
    /// Returns not-found for unknown tenants
    pub async fn usage(&self, tenant_id: TenantId) -> AppResult<TenantUsage> {
        let tenant = self.get(tenant_id).await?;
        Ok(TenantUsage {
            tenant_id: tenant.id,
            current_users: tenant.current_users,
            max_users: tenant.max_users,
            can_add_users: tenant.can_add_user(),
            remaining_users: tenant.max_users.saturating_sub(tenant.current_users),
        })
    }
}

fn subscription_expiry() -> Option<chrono::DateTime<Utc>> {
    let months = u32::try_from(limits::TENANT_SUBSCRIPTION_YEARS)
        .ok()
        .and_then(|years| years.checked_mul(12))
        .unwrap_or(12);
    Utc::now().checked_add_months(Months::new(months))
}
