//! Matrix and policy builder tests for warden-config.
// warden-config/tests/matrix_builders.rs
// =============================================================================
// Module: Matrix Builder Tests
// Description: Tests for building the permission matrix and attribute policy.
// Purpose: Ensure configured grants and whitelists carry into the runtime model.
// =============================================================================

use warden_config::WardenConfig;
use warden_core::ActionName;
use warden_core::EntityName;
use warden_core::FieldAccess;
use warden_core::FieldName;
use warden_core::Principal;
use warden_core::RoleName;

type TestResult = Result<(), String>;

fn sample_config() -> Result<WardenConfig, String> {
    let content = r#"
root_role = "admin"
default_role = "editor"

[roles.admin.resources]
projects = ["index", "show", "create", "update", "destroy"]
trash = ["empty"]

[roles.editor.resources]
projects = ["index", "show", "update"]

[roles.editor.protected]
projects = ["title", "body"]
"#;
    WardenConfig::from_toml(content).map_err(|err| err.to_string())
}

#[test]
fn granted_actions_are_allowed() -> TestResult {
    let matrix = sample_config()?.permission_matrix();
    let editor = RoleName::new("editor");
    if !matrix.allowed(&editor, "projects", &ActionName::new("update")) {
        return Err("editor should update projects".to_string());
    }
    Ok(())
}

#[test]
fn ungranted_actions_are_denied() -> TestResult {
    let matrix = sample_config()?.permission_matrix();
    let editor = RoleName::new("editor");
    if matrix.allowed(&editor, "projects", &ActionName::new("destroy")) {
        return Err("editor should not destroy projects".to_string());
    }
    if matrix.allowed(&editor, "trash", &ActionName::new("empty")) {
        return Err("editor should not empty trash".to_string());
    }
    Ok(())
}

#[test]
fn unknown_role_falls_back_to_default_role() -> TestResult {
    let matrix = sample_config()?.permission_matrix();
    let guest = RoleName::new("guest");
    if !matrix.allowed(&guest, "projects", &ActionName::new("index")) {
        return Err("unknown role should inherit the default role's grants".to_string());
    }
    if matrix.allowed(&guest, "projects", &ActionName::new("destroy")) {
        return Err("fallback must not widen beyond the default role".to_string());
    }
    Ok(())
}

#[test]
fn root_role_designation_carries_over() -> TestResult {
    let matrix = sample_config()?.permission_matrix();
    let root = Principal::new("1", "admin");
    let other = Principal::new("2", "editor");
    if !matrix.is_root(&root) {
        return Err("admin principal should be root".to_string());
    }
    if matrix.is_root(&other) {
        return Err("editor principal should not be root".to_string());
    }
    Ok(())
}

#[test]
fn configured_whitelist_restricts_fields() -> TestResult {
    let policy = sample_config()?.attribute_policy();
    let access =
        policy.writable_fields(&RoleName::new("editor"), &EntityName::new("projects"));
    match access {
        FieldAccess::Whitelist {
            fields,
        } => {
            if !fields.contains(&FieldName::new("title")) {
                return Err("title should be writable".to_string());
            }
            if fields.contains(&FieldName::new("owner_id")) {
                return Err("owner_id should not be writable".to_string());
            }
            Ok(())
        }
        FieldAccess::Unrestricted => Err("editor projects should be whitelisted".to_string()),
    }
}

#[test]
fn unconfigured_entity_is_unrestricted() -> TestResult {
    let policy = sample_config()?.attribute_policy();
    let access = policy.writable_fields(&RoleName::new("admin"), &EntityName::new("projects"));
    if access != FieldAccess::Unrestricted {
        return Err("admin projects should be unrestricted".to_string());
    }
    Ok(())
}
