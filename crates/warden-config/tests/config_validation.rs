//! Configuration parsing and validation tests for warden-config.
// warden-config/tests/config_validation.rs
// =============================================================================
// Module: Config Validation Tests
// Description: Tests for TOML parsing, limit enforcement, and file loading.
// Purpose: Ensure invalid role configuration always fails closed.
// =============================================================================

use std::fs;
use std::io::Write as _;

use warden_config::ConfigError;
use warden_config::WardenConfig;

type TestResult = Result<(), String>;

/// Assert that a config result is an error containing a specific substring.
fn assert_invalid(result: Result<WardenConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

/// Minimal valid configuration used as a baseline across tests.
fn minimal_toml() -> &'static str {
    r#"
root_role = "admin"
default_role = "editor"

[roles.admin.resources]
projects = ["index", "show", "create", "update", "destroy"]

[roles.editor.resources]
projects = ["index", "show"]

[roles.editor.protected]
projects = ["title", "body"]
"#
}

// ============================================================================
// SECTION: Parsing and Core Invariants
// ============================================================================

#[test]
fn minimal_config_parses_and_validates() -> TestResult {
    let config = WardenConfig::from_toml(minimal_toml()).map_err(|err| err.to_string())?;
    if config.root_role != "admin" {
        return Err("root_role should be admin".to_string());
    }
    if config.roles.len() != 2 {
        return Err("expected two configured roles".to_string());
    }
    Ok(())
}

#[test]
fn malformed_toml_is_rejected() -> TestResult {
    assert_invalid(WardenConfig::from_toml("root_role = [not toml"), "config parse error")
}

#[test]
fn empty_root_role_is_rejected() -> TestResult {
    let content = r#"
root_role = ""

[roles.admin.resources]
projects = ["index"]
"#;
    assert_invalid(WardenConfig::from_toml(content), "root_role must not be empty")
}

#[test]
fn undefined_root_role_is_rejected() -> TestResult {
    let content = r#"
root_role = "admin"

[roles.editor.resources]
projects = ["index"]
"#;
    assert_invalid(WardenConfig::from_toml(content), "root_role is not defined")
}

#[test]
fn undefined_default_role_is_rejected() -> TestResult {
    let content = r#"
root_role = "admin"
default_role = "ghost"

[roles.admin.resources]
projects = ["index"]
"#;
    assert_invalid(WardenConfig::from_toml(content), "default_role is not defined")
}

#[test]
fn missing_default_role_is_accepted() -> TestResult {
    let content = r#"
root_role = "admin"

[roles.admin.resources]
projects = ["index"]
"#;
    let config = WardenConfig::from_toml(content).map_err(|err| err.to_string())?;
    if config.default_role.is_some() {
        return Err("default_role should be absent".to_string());
    }
    Ok(())
}

// ============================================================================
// SECTION: Limit Enforcement
// ============================================================================

#[test]
fn too_many_roles_rejected() -> TestResult {
    let mut content = String::from("root_role = \"role0\"\n");
    for i in 0 .. 129 {
        content.push_str(&format!("[roles.role{i}.resources]\nprojects = [\"index\"]\n"));
    }
    assert_invalid(WardenConfig::from_toml(&content), "too many roles")
}

#[test]
fn too_many_actions_for_resource_rejected() -> TestResult {
    let actions: Vec<String> = (0 .. 65).map(|i| format!("\"action{i}\"")).collect();
    let content = format!(
        "root_role = \"admin\"\n[roles.admin.resources]\nprojects = [{}]\n",
        actions.join(", ")
    );
    assert_invalid(WardenConfig::from_toml(&content), "too many actions")
}

#[test]
fn empty_action_name_rejected() -> TestResult {
    let content = r#"
root_role = "admin"

[roles.admin.resources]
projects = ["index", ""]
"#;
    assert_invalid(WardenConfig::from_toml(content), "empty action name")
}

#[test]
fn empty_whitelist_field_rejected() -> TestResult {
    let content = r#"
root_role = "admin"

[roles.admin.resources]
projects = ["index"]

[roles.admin.protected]
projects = ["title", " "]
"#;
    assert_invalid(WardenConfig::from_toml(content), "empty whitelist field")
}

// ============================================================================
// SECTION: File Loading
// ============================================================================

#[test]
fn load_reads_explicit_path() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("warden.toml");
    fs::write(&path, minimal_toml()).map_err(|err| err.to_string())?;
    let config = WardenConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config.root_role != "admin" {
        return Err("loaded root_role should be admin".to_string());
    }
    Ok(())
}

#[test]
fn load_missing_file_is_io_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(WardenConfig::load(Some(&path)), "config io error")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("warden.toml");
    let mut file = fs::File::create(&path).map_err(|err| err.to_string())?;
    file.write_all(&[0xff, 0xfe, 0x00, 0x80]).map_err(|err| err.to_string())?;
    drop(file);
    assert_invalid(WardenConfig::load(Some(&path)), "must be utf-8")
}
