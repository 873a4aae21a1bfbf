// crates/warden-core/tests/authorization.rs
// ============================================================================
// Module: Authorization Engine Tests
// Description: Matrix decisions, fallback roles, and principal revalidation.
// ============================================================================
//! ## Overview
//! Validates deny-by-omission matrix lookups, default-role fallback, special
//! capability checks, and per-request principal revalidation.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]

use warden_core::ActionName;
use warden_core::AuthorizationEngine;
use warden_core::AuthorizationError;
use warden_core::EntityDescriptor;
use warden_core::InMemoryPrincipalSource;
use warden_core::PermissionMatrix;
use warden_core::Principal;
use warden_core::PrincipalStatus;
use warden_core::RoleName;
use warden_core::resolve_principal;

fn action(name: &str) -> ActionName {
    ActionName::new(name)
}

fn sample_matrix() -> PermissionMatrix {
    let mut matrix = PermissionMatrix::new();
    matrix.set_root_role("admin");
    matrix.set_default_role("editor");
    matrix.grant("admin", "projects", [action("index"), action("destroy")]);
    matrix.grant("admin", "trash", [action("empty")]);
    matrix.grant("editor", "projects", [action("index"), action("update")]);
    matrix
}

#[test]
fn granted_action_is_allowed() {
    let engine = AuthorizationEngine::new(sample_matrix());
    let editor = Principal::new("2", "editor");
    let descriptor = EntityDescriptor::new("projects");
    let decision = engine.authorize(&editor, &descriptor, &action("index"), None).unwrap();
    assert!(decision.is_allowed());
}

#[test]
fn absent_action_is_denied() {
    let engine = AuthorizationEngine::new(sample_matrix());
    let editor = Principal::new("2", "editor");
    let descriptor = EntityDescriptor::new("projects");
    let decision = engine.authorize(&editor, &descriptor, &action("destroy"), None).unwrap();
    assert!(!decision.is_allowed());
    assert!(decision.reason().is_some());
}

#[test]
fn absent_resource_is_denied() {
    let engine = AuthorizationEngine::new(sample_matrix());
    let editor = Principal::new("2", "editor");
    let descriptor = EntityDescriptor::new("invoices");
    let decision = engine.authorize(&editor, &descriptor, &action("index"), None).unwrap();
    assert!(!decision.is_allowed());
}

#[test]
fn root_role_has_no_implicit_grants() {
    // Root widens ownership, not the matrix: an admin grant must still be
    // spelled out per resource.
    let engine = AuthorizationEngine::new(sample_matrix());
    let admin = Principal::new("1", "admin");
    let descriptor = EntityDescriptor::new("invoices");
    let decision = engine.authorize(&admin, &descriptor, &action("index"), None).unwrap();
    assert!(!decision.is_allowed());
}

#[test]
fn disabled_principal_is_rejected_before_decision() {
    let engine = AuthorizationEngine::new(sample_matrix());
    let mut editor = Principal::new("2", "editor");
    editor.status = PrincipalStatus::Disabled;
    let descriptor = EntityDescriptor::new("projects");
    let result = engine.authorize(&editor, &descriptor, &action("index"), None);
    assert!(matches!(result, Err(AuthorizationError::PrincipalInvalid)));
}

#[test]
fn unconfigured_role_is_rejected_before_decision() {
    let engine = AuthorizationEngine::new(sample_matrix());
    let ghost = Principal::new("9", "ghost");
    let descriptor = EntityDescriptor::new("projects");
    let result = engine.authorize(&ghost, &descriptor, &action("index"), None);
    assert!(matches!(result, Err(AuthorizationError::PrincipalInvalid)));
}

#[test]
fn special_capability_uses_matrix_lookup() {
    let engine = AuthorizationEngine::new(sample_matrix());
    let admin = Principal::new("1", "admin");
    let editor = Principal::new("2", "editor");
    assert!(engine.authorize_special(&admin, "trash", &action("empty")).unwrap().is_allowed());
    assert!(!engine.authorize_special(&editor, "trash", &action("empty")).unwrap().is_allowed());
}

#[test]
fn default_role_backs_unknown_roles_in_matrix_lookup() {
    let matrix = sample_matrix();
    let intern = RoleName::new("intern");
    assert!(matrix.allowed(&intern, "projects", &action("index")));
    assert!(!matrix.allowed(&intern, "projects", &action("destroy")));
}

#[test]
fn resolve_principal_returns_active_configured_principal() {
    let source = InMemoryPrincipalSource::new();
    source.insert(Principal::new("2", "editor")).unwrap();
    let matrix = sample_matrix();
    let principal = resolve_principal(&source, &"2".into(), &matrix).unwrap();
    assert_eq!(principal.id.as_str(), "2");
}

#[test]
fn resolve_principal_rejects_missing_principal() {
    let source = InMemoryPrincipalSource::new();
    let matrix = sample_matrix();
    let result = resolve_principal(&source, &"404".into(), &matrix);
    assert!(matches!(result, Err(AuthorizationError::PrincipalInvalid)));
}

#[test]
fn resolve_principal_rejects_disabled_principal() {
    let source = InMemoryPrincipalSource::new();
    let mut stale = Principal::new("2", "editor");
    stale.status = PrincipalStatus::Disabled;
    source.insert(stale).unwrap();
    let matrix = sample_matrix();
    let result = resolve_principal(&source, &"2".into(), &matrix);
    assert!(matches!(result, Err(AuthorizationError::PrincipalInvalid)));
}

#[test]
fn resolve_principal_rejects_role_removed_from_matrix() {
    let source = InMemoryPrincipalSource::new();
    source.insert(Principal::new("3", "retired")).unwrap();
    let matrix = sample_matrix();
    let result = resolve_principal(&source, &"3".into(), &matrix);
    assert!(matches!(result, Err(AuthorizationError::PrincipalInvalid)));
}
