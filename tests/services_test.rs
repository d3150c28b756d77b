// ABOUTME: Integration tests for the tenant and user administration services

mod common;

use common::{active_tenant, active_user, MemoryStore};
use talentgate_iam::config::TenantConfig;
use talentgate_iam::errors::ErrorCode;
use talentgate_iam::models::{SubscriptionPlan, TenantStatus, UserStatus};
use talentgate_iam::tenants::TenantService;
use talentgate_iam::users::UserService;
use uuid::Uuid;

#[tokio::test]
async fn test_tenant_creation_defaults_to_trial() {
    let store = MemoryStore::new();
    let service = TenantService::new(store.clone(), TenantConfig::default());

    let tenant = service.create("Initech".to_owned(), None).await.unwrap();
    assert_eq!(tenant.status, TenantStatus::Trial);
    assert!(tenant.trial_expires_at.is_some());
    assert_eq!(tenant.current_users, 0);

    let paid = service
        .create("Globex".to_owned(), Some(SubscriptionPlan::Enterprise))
        .await
        .unwrap();
    assert_eq!(paid.status, TenantStatus::Active);
    assert_eq!(paid.max_users, SubscriptionPlan::Enterprise.max_users());
    assert!(paid.subscription_expires_at.is_some());
}

#[tokio::test]
async fn test_tenant_plan_upgrade_and_usage() {
    let store = MemoryStore::new();
    let service = TenantService::new(store.clone(), TenantConfig::default());

    let tenant = service.create("Initech".to_owned(), None).await.unwrap();
    let upgraded = service
        .upgrade_plan(tenant.id, SubscriptionPlan::Professional)
        .await
        .unwrap();
    assert_eq!(upgraded.max_users, 50);
    assert_eq!(upgraded.status, TenantStatus::Active);

    let usage = service.usage(tenant.id).await.unwrap();
    assert_eq!(usage.max_users, 50);
    assert_eq!(usage.remaining_users, 50);
    assert!(usage.can_add_users);
}

#[tokio::test]
async fn test_tenant_suspend_and_activate() {
    let store = MemoryStore::new();
    let service = TenantService::new(store.clone(), TenantConfig::default());

    let tenant = service.create("Initech".to_owned(), None).await.unwrap();
    let suspended = service.suspend(tenant.id, "payment overdue").await.unwrap();
    assert_eq!(suspended.status, TenantStatus::Suspended);

    let reactivated = service.activate(tenant.id).await.unwrap();
    assert_eq!(reactivated.status, TenantStatus::Active);

    let err = service.get(talentgate_iam::models::TenantId::new()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_user_lookup_is_tenant_checked() {
    let store = MemoryStore::new();
    let tenant_a = active_tenant(5);
    let tenant_b = active_tenant(5);
    store.seed_tenant(&tenant_a);
    store.seed_tenant(&tenant_b);
    let user = active_user(tenant_a.id, "pat@initech.test", &["jobs:read"]);
    store.seed_user(&user);

    let service = UserService::new(store.clone());
    assert!(service.get(user.id, tenant_a.id).await.is_ok());

    // same ID through the wrong tenant reads as not-found
    let err = service.get(user.id, tenant_b.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_user_suspend_and_activate() {
    let store = MemoryStore::new();
    let tenant = active_tenant(5);
    store.seed_tenant(&tenant);
    let user = active_user(tenant.id, "pat@initech.test", &["jobs:read"]);
    store.seed_user(&user);

    let service = UserService::new(store.clone());
    let suspended = service
        .suspend(user.id, tenant.id, "policy violation")
        .await
        .unwrap();
    assert_eq!(suspended.status, UserStatus::Suspended);

    // suspended accounts do not re-activate through the pending path
    assert!(service.activate(user.id, tenant.id).await.is_err());
}

#[tokio::test]
async fn test_scope_administration_validates_against_registry() {
    let store = MemoryStore::new();
    let tenant = active_tenant(5);
    store.seed_tenant(&tenant);
    let user = active_user(tenant.id, "pat@initech.test", &["jobs:read"]);
    store.seed_user(&user);

    let service = UserService::new(store.clone());

    let updated = service
        .add_scopes(user.id, tenant.id, &["candidates:read".to_owned()])
        .await
        .unwrap();
    assert!(updated.has_scope("candidates:read"));

    let err = service
        .add_scopes(user.id, tenant.id, &["candidates:teleport".to_owned()])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let updated = service
        .apply_scope_group(user.id, tenant.id, "recruiter")
        .await
        .unwrap();
    assert!(updated.has_scope("candidates:export"));

    assert!(service
        .apply_scope_group(user.id, tenant.id, "wizard")
        .await
        .is_err());
}

#[tokio::test]
async fn test_scopes_report_includes_categories() {
    let store = MemoryStore::new();
    let tenant = active_tenant(5);
    store.seed_tenant(&tenant);
    let user = active_user(tenant.id, "pat@initech.test", &["jobs:read", "admin:*"]);
    store.seed_user(&user);

    let service = UserService::new(store.clone());
    let report = service.scopes_report(user.id, tenant.id).await.unwrap();

    assert!(report.is_admin);
    assert_eq!(report.scopes.len(), 2);
    let jobs = report
        .scope_details
        .iter()
        .find(|d| d.name == "jobs:read")
        .unwrap();
    assert_eq!(jobs.category, "Jobs");

    let err = service
        .scopes_report(Uuid::new_v4(), tenant.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}
