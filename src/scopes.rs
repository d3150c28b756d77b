// ABOUTME: Permission-string vocabulary, wildcard matcher, and named scope groups
// ABOUTME: Registry-backed validation and expansion for namespace:action scopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! # Scope Model
//!
//! A scope is a string of the form `namespace:action`, or one of the
//! superlative wildcards `*` (all scopes) and `namespace:*` (all actions in a
//! namespace). The runtime matcher never expands wildcards; expansion exists
//! only for introspection surfaces.

/// Super scope - full access to everything
pub const SCOPE_ALL: &str = "*";

/// Full administrative access
pub const SCOPE_ADMIN_ALL: &str = "admin:*";
/// View administrative settings
pub const SCOPE_ADMIN_READ: &str = "admin:read";
/// Modify administrative settings
pub const SCOPE_ADMIN_WRITE: &str = "admin:write";

/// Full access to user management
pub const SCOPE_USERS_ALL: &str = "users:*";
/// View users
pub const SCOPE_USERS_READ: &str = "users:read";
/// Create and edit users
pub const SCOPE_USERS_WRITE: &str = "users:write";
/// Delete users
pub const SCOPE_USERS_DELETE: &str = "users:delete";
/// Invite new users
pub const SCOPE_USERS_INVITE: &str = "users:invite";

/// Full access to role management
pub const SCOPE_ROLES_ALL: &str = "roles:*";
/// View roles
pub const SCOPE_ROLES_READ: &str = "roles:read";
/// Create and edit roles
pub const SCOPE_ROLES_WRITE: &str = "roles:write";
/// Assign roles to users
pub const SCOPE_ROLES_ASSIGN: &str = "roles:assign";

/// Full access to tenant management
pub const SCOPE_TENANTS_ALL: &str = "tenants:*";
/// View tenants
pub const SCOPE_TENANTS_READ: &str = "tenants:read";
/// Create and edit tenants
pub const SCOPE_TENANTS_WRITE: &str = "tenants:write";
/// Manage tenant configuration
pub const SCOPE_TENANTS_CONFIG: &str = "tenants:config";

/// Full access to API key management
pub const SCOPE_API_KEYS_ALL: &str = "api_keys:*";
/// View API keys
pub const SCOPE_API_KEYS_READ: &str = "api_keys:read";
/// Create and edit API keys
pub const SCOPE_API_KEYS_WRITE: &str = "api_keys:write";
/// Revoke API keys
pub const SCOPE_API_KEYS_REVOKE: &str = "api_keys:revoke";

/// Full access to settings
pub const SCOPE_SETTINGS_ALL: &str = "settings:*";
/// View settings
pub const SCOPE_SETTINGS_READ: &str = "settings:read";
/// Modify settings
pub const SCOPE_SETTINGS_WRITE: &str = "settings:write";

/// Full access to audit logs
pub const SCOPE_AUDIT_ALL: &str = "audit:*";
/// View audit logs
pub const SCOPE_AUDIT_READ: &str = "audit:read";

/// Full access to reporting
pub const SCOPE_REPORTS_ALL: &str = "reports:*";
/// View reports
pub const SCOPE_REPORTS_VIEW: &str = "reports:view";
/// Export reports
pub const SCOPE_REPORTS_EXPORT: &str = "reports:export";
/// Access the analytics dashboard
pub const SCOPE_ANALYTICS_DASHBOARD: &str = "analytics:dashboard";

/// Full access to notifications
pub const SCOPE_NOTIFICATIONS_ALL: &str = "notifications:*";
/// View notifications
pub const SCOPE_NOTIFICATIONS_READ: &str = "notifications:read";
/// Send notifications
pub const SCOPE_NOTIFICATIONS_SEND: &str = "notifications:send";

// Domain scopes - applicant tracking

/// Full access to jobs
pub const SCOPE_JOBS_ALL: &str = "jobs:*";
/// View jobs
pub const SCOPE_JOBS_READ: &str = "jobs:read";
/// Create and edit jobs
pub const SCOPE_JOBS_WRITE: &str = "jobs:write";
/// Delete jobs
pub const SCOPE_JOBS_DELETE: &str = "jobs:delete";
/// Publish and unpublish jobs
pub const SCOPE_JOBS_PUBLISH: &str = "jobs:publish";

/// Full access to candidates
pub const SCOPE_CANDIDATES_ALL: &str = "candidates:*";
/// View candidates
pub const SCOPE_CANDIDATES_READ: &str = "candidates:read";
/// Create and edit candidates
pub const SCOPE_CANDIDATES_WRITE: &str = "candidates:write";
/// Export candidate data
pub const SCOPE_CANDIDATES_EXPORT: &str = "candidates:export";

/// Full access to applications
pub const SCOPE_APPLICATIONS_ALL: &str = "applications:*";
/// View applications
pub const SCOPE_APPLICATIONS_READ: &str = "applications:read";
/// Create and edit applications
pub const SCOPE_APPLICATIONS_WRITE: &str = "applications:write";
/// Review and evaluate applications
pub const SCOPE_APPLICATIONS_REVIEW: &str = "applications:review";
/// Approve or reject applications
pub const SCOPE_APPLICATIONS_APPROVE: &str = "applications:approve";

/// Full access to interviews
pub const SCOPE_INTERVIEWS_ALL: &str = "interviews:*";
/// View interviews
pub const SCOPE_INTERVIEWS_READ: &str = "interviews:read";
/// Schedule interviews
pub const SCOPE_INTERVIEWS_SCHEDULE: &str = "interviews:schedule";
/// Conduct interviews
pub const SCOPE_INTERVIEWS_CONDUCT: &str = "interviews:conduct";

/// Full access to offers
pub const SCOPE_OFFERS_ALL: &str = "offers:*";
/// View offers
pub const SCOPE_OFFERS_READ: &str = "offers:read";
/// Create and edit offers
pub const SCOPE_OFFERS_WRITE: &str = "offers:write";
/// Approve offers
pub const SCOPE_OFFERS_APPROVE: &str = "offers:approve";

/// Full access to resumes
pub const SCOPE_RESUMES_ALL: &str = "resumes:*";
/// View resumes
pub const SCOPE_RESUMES_READ: &str = "resumes:read";
/// Create and edit resumes
pub const SCOPE_RESUMES_WRITE: &str = "resumes:write";
/// Search resumes
pub const SCOPE_RESUMES_SEARCH: &str = "resumes:search";

/// Scope registry organized by category, used for validation and introspection
pub const SCOPE_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Administration",
        &[SCOPE_ALL, SCOPE_ADMIN_ALL, SCOPE_ADMIN_READ, SCOPE_ADMIN_WRITE],
    ),
    (
        "Users",
        &[
            SCOPE_USERS_ALL,
            SCOPE_USERS_READ,
            SCOPE_USERS_WRITE,
            SCOPE_USERS_DELETE,
            SCOPE_USERS_INVITE,
        ],
    ),
    (
        "Roles",
        &[SCOPE_ROLES_ALL, SCOPE_ROLES_READ, SCOPE_ROLES_WRITE, SCOPE_ROLES_ASSIGN],
    ),
    (
        "Tenants",
        &[SCOPE_TENANTS_ALL, SCOPE_TENANTS_READ, SCOPE_TENANTS_WRITE, SCOPE_TENANTS_CONFIG],
    ),
    (
        "API Keys",
        &[SCOPE_API_KEYS_ALL, SCOPE_API_KEYS_READ, SCOPE_API_KEYS_WRITE, SCOPE_API_KEYS_REVOKE],
    ),
    (
        "Settings",
        &[SCOPE_SETTINGS_ALL, SCOPE_SETTINGS_READ, SCOPE_SETTINGS_WRITE],
    ),
    ("Audit", &[SCOPE_AUDIT_ALL, SCOPE_AUDIT_READ]),
    (
        "Reports & Analytics",
        &[SCOPE_REPORTS_ALL, SCOPE_REPORTS_VIEW, SCOPE_REPORTS_EXPORT, SCOPE_ANALYTICS_DASHBOARD],
    ),
    (
        "Notifications",
        &[SCOPE_NOTIFICATIONS_ALL, SCOPE_NOTIFICATIONS_READ, SCOPE_NOTIFICATIONS_SEND],
    ),
    (
        "Jobs",
        &[SCOPE_JOBS_ALL, SCOPE_JOBS_READ, SCOPE_JOBS_WRITE, SCOPE_JOBS_DELETE, SCOPE_JOBS_PUBLISH],
    ),
    (
        "Candidates",
        &[
            SCOPE_CANDIDATES_ALL,
            SCOPE_CANDIDATES_READ,
            SCOPE_CANDIDATES_WRITE,
            SCOPE_CANDIDATES_EXPORT,
        ],
    ),
    (
        "Applications",
        &[
            SCOPE_APPLICATIONS_ALL,
            SCOPE_APPLICATIONS_READ,
            SCOPE_APPLICATIONS_WRITE,
            SCOPE_APPLICATIONS_REVIEW,
            SCOPE_APPLICATIONS_APPROVE,
        ],
    ),
    (
        "Interviews",
        &[
            SCOPE_INTERVIEWS_ALL,
            SCOPE_INTERVIEWS_READ,
            SCOPE_INTERVIEWS_SCHEDULE,
            SCOPE_INTERVIEWS_CONDUCT,
        ],
    ),
    (
        "Offers",
        &[SCOPE_OFFERS_ALL, SCOPE_OFFERS_READ, SCOPE_OFFERS_WRITE, SCOPE_OFFERS_APPROVE],
    ),
    (
        "Resumes",
        &[SCOPE_RESUMES_ALL, SCOPE_RESUMES_READ, SCOPE_RESUMES_WRITE, SCOPE_RESUMES_SEARCH],
    ),
];

/// Named scope groups: curated grant lists used as invitation/user templates
pub const SCOPE_GROUPS: &[(&str, &[&str])] = &[
    ("super_admin", &[SCOPE_ALL]),
    (
        "platform_admin",
        &[
            SCOPE_ADMIN_ALL,
            SCOPE_USERS_ALL,
            SCOPE_ROLES_ALL,
            SCOPE_TENANTS_ALL,
            SCOPE_SETTINGS_ALL,
            SCOPE_AUDIT_READ,
            SCOPE_API_KEYS_ALL,
        ],
    ),
    (
        "tenant_admin",
        &[
            SCOPE_USERS_ALL,
            SCOPE_ROLES_ALL,
            SCOPE_SETTINGS_ALL,
            SCOPE_API_KEYS_ALL,
            SCOPE_TENANTS_READ,
            SCOPE_TENANTS_CONFIG,
        ],
    ),
    (
        "user_manager",
        &[SCOPE_USERS_ALL, SCOPE_ROLES_READ, SCOPE_ROLES_ASSIGN, SCOPE_USERS_INVITE],
    ),
    (
        "analyst",
        &[SCOPE_REPORTS_ALL, SCOPE_ANALYTICS_DASHBOARD, SCOPE_AUDIT_READ],
    ),
    (
        "auditor",
        &[SCOPE_AUDIT_READ, SCOPE_USERS_READ, SCOPE_ROLES_READ, SCOPE_TENANTS_READ],
    ),
    (
        "hr_admin",
        &[
            SCOPE_USERS_ALL,
            SCOPE_JOBS_ALL,
            SCOPE_CANDIDATES_ALL,
            SCOPE_APPLICATIONS_ALL,
            SCOPE_INTERVIEWS_ALL,
            SCOPE_OFFERS_ALL,
            SCOPE_RESUMES_ALL,
        ],
    ),
    (
        "recruiter",
        &[
            SCOPE_JOBS_READ,
            SCOPE_JOBS_WRITE,
            SCOPE_CANDIDATES_ALL,
            SCOPE_APPLICATIONS_READ,
            SCOPE_APPLICATIONS_REVIEW,
            SCOPE_INTERVIEWS_SCHEDULE,
            SCOPE_RESUMES_READ,
            SCOPE_RESUMES_SEARCH,
        ],
    ),
    (
        "hiring_manager",
        &[
            SCOPE_JOBS_READ,
            SCOPE_CANDIDATES_READ,
            SCOPE_APPLICATIONS_READ,
            SCOPE_APPLICATIONS_APPROVE,
            SCOPE_INTERVIEWS_CONDUCT,
            SCOPE_OFFERS_APPROVE,
        ],
    ),
    (
        "viewer",
        &[SCOPE_USERS_READ, SCOPE_JOBS_READ, SCOPE_CANDIDATES_READ, SCOPE_RESUMES_READ],
    ),
];

/// Group granted when a caller specifies no explicit scopes
pub const DEFAULT_SCOPE_GROUP: &str = "viewer";

/// Check whether a granted scope set satisfies a required scope.
///
/// True iff the required scope is present verbatim, `*` is granted, or a
/// granted `namespace:*` covers it. Namespace wildcard matching is exact on
/// the `:` boundary: `jobs:*` covers `jobs:read` but never `job:read`.
#[must_use]
pub fn has_scope<S: AsRef<str>>(granted: &[S], required: &str) -> bool {
    granted.iter().any(|s| {
        let s = s.as_ref();
        if s == required || s == SCOPE_ALL {
            return true;
        }
        s.strip_suffix(":*").is_some_and(|namespace| {
            required
                .strip_prefix(namespace)
                .is_some_and(|rest| rest.starts_with(':'))
        })
    })
}

/// OR-reduction of [`has_scope`] over the required set
#[must_use]
pub fn has_any_scope<S: AsRef<str>>(granted: &[S], required: &[&str]) -> bool {
    required.iter().any(|scope| has_scope(granted, scope))
}

/// AND-reduction of [`has_scope`] over the required set
#[must_use]
pub fn has_all_scopes<S: AsRef<str>>(granted: &[S], required: &[&str]) -> bool {
    required.iter().all(|scope| has_scope(granted, scope))
}

/// Check whether a scope set carries administrative authority (`*` or `admin:*`)
#[must_use]
pub fn is_admin<S: AsRef<str>>(granted: &[S]) -> bool {
    granted
        .iter()
        .any(|s| s.as_ref() == SCOPE_ALL || s.as_ref() == SCOPE_ADMIN_ALL)
}

/// Return the scopes of a named group, if the group exists
#[must_use]
pub fn scopes_for_group(group: &str) -> Option<&'static [&'static str]> {
    SCOPE_GROUPS
        .iter()
        .find(|(name, _)| *name == group)
        .map(|(_, scopes)| *scopes)
}

/// Names of every defined scope group
#[must_use]
pub fn group_names() -> Vec<&'static str> {
    SCOPE_GROUPS.iter().map(|(name, _)| *name).collect()
}

/// Check whether a scope is registered. The `*` superlative is always valid.
#[must_use]
pub fn validate_scope(scope: &str) -> bool {
    if scope == SCOPE_ALL {
        return true;
    }
    SCOPE_CATEGORIES
        .iter()
        .any(|(_, scopes)| scopes.contains(&scope))
}

/// Every scope in the registry
#[must_use]
pub fn all_scopes() -> Vec<&'static str> {
    SCOPE_CATEGORIES
        .iter()
        .flat_map(|(_, scopes)| scopes.iter().copied())
        .collect()
}

/// Category a scope is registered under
#[must_use]
pub fn scope_category(scope: &str) -> Option<&'static str> {
    SCOPE_CATEGORIES
        .iter()
        .find(|(_, scopes)| scopes.contains(&scope))
        .map(|(category, _)| *category)
}

/// Expand a wildcard scope into the concrete scopes registered under its
/// namespace. For UI and introspection only; the matcher never expands.
///
/// `"jobs:*"` expands to every registered `jobs:<action>`; `"*"` expands to
/// the full registry; a non-wildcard input returns itself.
#[must_use]
pub fn expand_wildcard_scope(wildcard: &str) -> Vec<&'static str> {
    if wildcard == SCOPE_ALL {
        return all_scopes();
    }
    let Some(namespace) = wildcard.strip_suffix(":*") else {
        return all_scopes().into_iter().filter(|s| *s == wildcard).collect();
    };
    all_scopes()
        .into_iter()
        .filter(|s| {
            s.strip_prefix(namespace)
                .is_some_and(|rest| rest.starts_with(':') && rest != ":*")
        })
        .collect()
}
