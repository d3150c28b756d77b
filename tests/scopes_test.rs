// ABOUTME: Integration tests for the scope model: wildcard matching, groups, expansion

use talentgate_iam::scopes;

#[test]
fn test_super_wildcard_grants_every_scope() {
    let granted = vec!["*".to_owned()];
    for scope in scopes::all_scopes() {
        assert!(scopes::has_scope(&granted, scope));
    }
    // including scopes that are not even registered
    assert!(scopes::has_scope(&granted, "totally:made_up"));
}

#[test]
fn test_namespace_wildcard_is_boundary_exact() {
    let granted = vec!["jobs:*".to_owned()];

    assert!(scopes::has_scope(&granted, "jobs:read"));
    assert!(scopes::has_scope(&granted, "jobs:publish"));

    // "job" is a different namespace, not a prefix match
    assert!(!scopes::has_scope(&granted, "job:read"));
    // and neither is a longer namespace sharing the prefix
    assert!(!scopes::has_scope(&granted, "jobsboard:read"));
}

#[test]
fn test_or_and_reductions() {
    let granted = vec!["candidates:read".to_owned(), "resumes:*".to_owned()];

    assert!(scopes::has_any_scope(&granted, &["jobs:write", "resumes:search"]));
    assert!(!scopes::has_any_scope(&granted, &["jobs:write", "jobs:read"]));

    assert!(scopes::has_all_scopes(
        &granted,
        &["candidates:read", "resumes:read", "resumes:write"]
    ));
    assert!(!scopes::has_all_scopes(&granted, &["candidates:read", "candidates:write"]));
}

#[test]
fn test_admin_definition() {
    assert!(scopes::is_admin(&["*".to_owned()]));
    assert!(scopes::is_admin(&["jobs:read".to_owned(), "admin:*".to_owned()]));
    assert!(!scopes::is_admin(&["admin:write".to_owned()]));
}

#[test]
fn test_named_groups_resolve_and_validate() {
    let viewer = scopes::scopes_for_group("viewer").unwrap();
    assert!(viewer.contains(&"users:read"));
    assert!(viewer.contains(&"jobs:read"));

    let recruiter = scopes::scopes_for_group("recruiter").unwrap();
    assert!(recruiter.contains(&"candidates:*"));

    assert!(scopes::scopes_for_group("does_not_exist").is_none());
    assert!(scopes::group_names().contains(&"hr_admin"));
}

#[test]
fn test_validate_scope_rejects_unregistered() {
    assert!(scopes::validate_scope("*"));
    assert!(scopes::validate_scope("candidates:export"));
    assert!(!scopes::validate_scope("candidates:embezzle"));
    assert!(!scopes::validate_scope("jobs"));
    assert!(!scopes::validate_scope(""));
}

#[test]
fn test_wildcard_expansion_is_introspection_only() {
    let expanded = scopes::expand_wildcard_scope("resumes:*");
    assert!(expanded.contains(&"resumes:read"));
    assert!(expanded.contains(&"resumes:search"));
    assert!(!expanded.contains(&"resumes:*"));

    // the matcher itself never needs expansion
    assert!(scopes::has_scope(&["resumes:*".to_owned()], "resumes:search"));
}
