// crates/warden-core/tests/self_management.rs
// ============================================================================
// Module: Self-Management Policy Tests
// Description: Exhaustive coverage of the principal-account decision table.
// ============================================================================
//! ## Overview
//! Exercises every cell of the decision table applied when the target record
//! belongs to the principal entity, including the matrix fallback for actions
//! the table does not cover.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]

use warden_core::ActionName;
use warden_core::AuthorizationEngine;
use warden_core::EntityDescriptor;
use warden_core::PermissionMatrix;
use warden_core::Principal;
use warden_core::Record;

fn action(name: &str) -> ActionName {
    ActionName::new(name)
}

fn engine() -> AuthorizationEngine {
    let mut matrix = PermissionMatrix::new();
    matrix.set_root_role("admin");
    matrix.grant("admin", "accounts", [action("export")]);
    matrix.grant("editor", "accounts", [action("show")]);
    AuthorizationEngine::new(matrix)
}

fn accounts() -> EntityDescriptor {
    let mut descriptor = EntityDescriptor::new("accounts");
    descriptor.principal_entity = true;
    descriptor
}

fn decide(engine: &AuthorizationEngine, who: &Principal, act: &str, target_id: &str) -> bool {
    let target = Record::new("accounts", target_id);
    engine
        .authorize(who, &accounts(), &action(act), Some(&target))
        .unwrap()
        .is_allowed()
}

#[test]
fn root_may_edit_and_destroy_any_account_including_own() {
    let engine = engine();
    let root = Principal::new("1", "admin");
    assert!(decide(&engine, &root, "edit", "1"));
    assert!(decide(&engine, &root, "edit", "2"));
    assert!(decide(&engine, &root, "destroy", "1"));
    assert!(decide(&engine, &root, "destroy", "2"));
}

#[test]
fn non_root_may_never_edit_or_destroy_accounts() {
    let engine = engine();
    let editor = Principal::new("2", "editor");
    assert!(!decide(&engine, &editor, "edit", "2"));
    assert!(!decide(&engine, &editor, "edit", "3"));
    assert!(!decide(&engine, &editor, "destroy", "2"));
    assert!(!decide(&engine, &editor, "destroy", "3"));
}

#[test]
fn root_may_toggle_other_accounts_but_never_its_own() {
    let engine = engine();
    let root = Principal::new("1", "admin");
    assert!(decide(&engine, &root, "toggle", "2"));
    assert!(!decide(&engine, &root, "toggle", "1"));
}

#[test]
fn non_root_may_never_toggle_accounts() {
    let engine = engine();
    let editor = Principal::new("2", "editor");
    assert!(!decide(&engine, &editor, "toggle", "2"));
    assert!(!decide(&engine, &editor, "toggle", "3"));
}

#[test]
fn root_may_update_other_accounts_but_not_its_own() {
    let engine = engine();
    let root = Principal::new("1", "admin");
    assert!(decide(&engine, &root, "update", "2"));
    assert!(!decide(&engine, &root, "update", "1"));
}

#[test]
fn non_root_may_update_only_its_own_account() {
    let engine = engine();
    let editor = Principal::new("2", "editor");
    assert!(decide(&engine, &editor, "update", "2"));
    assert!(!decide(&engine, &editor, "update", "3"));
}

#[test]
fn untabulated_action_on_account_falls_back_to_matrix() {
    let engine = engine();
    let root = Principal::new("1", "admin");
    let editor = Principal::new("2", "editor");
    assert!(decide(&engine, &root, "export", "2"));
    assert!(!decide(&engine, &editor, "export", "3"));
}

#[test]
fn table_applies_only_when_a_target_record_is_present() {
    // Without a target the table cannot compare identities, so the matrix
    // decides even for the principal entity.
    let engine = engine();
    let root = Principal::new("1", "admin");
    let decision = engine.authorize(&root, &accounts(), &action("export"), None).unwrap();
    assert!(decision.is_allowed());
    let decision = engine.authorize(&root, &accounts(), &action("edit"), None).unwrap();
    assert!(!decision.is_allowed());
}

#[test]
fn table_does_not_apply_to_non_principal_entities() {
    let engine = engine();
    let editor = Principal::new("2", "editor");
    let mut projects = EntityDescriptor::new("accounts");
    projects.principal_entity = false;
    let target = Record::new("accounts", "3");
    // A non-principal entity with the same action names routes straight to
    // the matrix, which carries no "edit" grant for anyone here.
    let decision = engine.authorize(&editor, &projects, &action("edit"), Some(&target)).unwrap();
    assert!(!decision.is_allowed());
}
