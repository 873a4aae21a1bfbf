// warden-config/src/config.rs
// ============================================================================
// Module: Warden Role Configuration
// Description: Configuration loading and validation for Warden role permissions.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: warden-core, serde, toml
// ============================================================================

//! ## Overview
//! Role configuration is loaded from a TOML file once at process start and is
//! read-only thereafter. Missing or invalid configuration fails closed: a
//! role file that cannot be parsed or that violates a limit never produces a
//! partial matrix. The loaded model builds the [`PermissionMatrix`] and
//! [`AttributeProtectionPolicy`] consumed by the engine.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use warden_core::ActionName;
use warden_core::AttributeProtectionPolicy;
use warden_core::FieldName;
use warden_core::PermissionMatrix;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "warden.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "WARDEN_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of configured roles.
pub(crate) const MAX_ROLES: usize = 128;
/// Maximum number of resource entries per role.
pub(crate) const MAX_RESOURCES_PER_ROLE: usize = 256;
/// Maximum number of actions per resource entry.
pub(crate) const MAX_ACTIONS_PER_RESOURCE: usize = 64;
/// Maximum number of whitelisted fields per protected entity.
pub(crate) const MAX_WHITELIST_FIELDS: usize = 256;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Warden role configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WardenConfig {
    /// Role holding the highest privilege level.
    pub root_role: String,
    /// Fallback role consulted for roles without a matrix entry.
    #[serde(default)]
    pub default_role: Option<String>,
    /// Role entries keyed by role name.
    #[serde(default)]
    pub roles: BTreeMap<String, RoleConfig>,
}

/// Permissions and attribute whitelists for one role.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleConfig {
    /// Allowed actions keyed by resource name (entity or special
    /// capability).
    #[serde(default)]
    pub resources: BTreeMap<String, Vec<String>>,
    /// Writable-field whitelists keyed by entity name. Entities absent here
    /// are unrestricted for this role.
    #[serde(default)]
    pub protected: BTreeMap<String, Vec<String>>,
}

impl WardenConfig {
    /// Loads configuration from disk using the default resolution rules:
    /// explicit path, then the `WARDEN_CONFIG` environment variable, then
    /// `warden.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency and limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_role.trim().is_empty() {
            return Err(ConfigError::Invalid("root_role must not be empty".to_string()));
        }
        if !self.roles.contains_key(&self.root_role) {
            return Err(ConfigError::Invalid(format!(
                "root_role is not defined: {}",
                self.root_role
            )));
        }
        if let Some(fallback) = &self.default_role
            && !self.roles.contains_key(fallback)
        {
            return Err(ConfigError::Invalid(format!("default_role is not defined: {fallback}")));
        }
        if self.roles.len() > MAX_ROLES {
            return Err(ConfigError::Invalid("too many roles configured".to_string()));
        }
        for (name, role) in &self.roles {
            validate_role(name, role)?;
        }
        Ok(())
    }

    /// Builds the permission matrix from the configured roles.
    #[must_use]
    pub fn permission_matrix(&self) -> PermissionMatrix {
        let mut matrix = PermissionMatrix::new();
        matrix.set_root_role(self.root_role.as_str());
        if let Some(fallback) = &self.default_role {
            matrix.set_default_role(fallback.as_str());
        }
        for (role, entry) in &self.roles {
            for (resource, actions) in &entry.resources {
                matrix.grant(
                    role.as_str(),
                    resource.as_str(),
                    actions.iter().map(|action| ActionName::new(action.as_str())),
                );
            }
        }
        matrix
    }

    /// Builds the attribute protection policy from the configured
    /// whitelists.
    #[must_use]
    pub fn attribute_policy(&self) -> AttributeProtectionPolicy {
        let mut policy = AttributeProtectionPolicy::new();
        for (role, entry) in &self.roles {
            for (entity, fields) in &entry.protected {
                policy.allow(
                    role.as_str(),
                    entity.as_str(),
                    fields.iter().map(|field| FieldName::new(field.as_str())),
                );
            }
        }
        policy
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("config io error: {0}")]
    Io(String),
    /// Parsing the configuration file failed.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Configuration violated a limit or consistency rule.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Resolves the configuration path from the explicit argument, the
/// environment override, or the default filename.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let resolved = path.map_or_else(
        || {
            env::var_os(CONFIG_ENV_VAR)
                .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from)
        },
        Path::to_path_buf,
    );
    if resolved.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds length limit".to_string()));
    }
    Ok(resolved)
}

/// Validates one role entry against limits and naming rules.
fn validate_role(name: &str, role: &RoleConfig) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::Invalid("role name must not be empty".to_string()));
    }
    if role.resources.len() > MAX_RESOURCES_PER_ROLE {
        return Err(ConfigError::Invalid(format!("too many resources for role {name}")));
    }
    for (resource, actions) in &role.resources {
        if resource.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("empty resource name for role {name}")));
        }
        if actions.len() > MAX_ACTIONS_PER_RESOURCE {
            return Err(ConfigError::Invalid(format!(
                "too many actions for role {name} resource {resource}"
            )));
        }
        if actions.iter().any(|action| action.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "empty action name for role {name} resource {resource}"
            )));
        }
    }
    for (entity, fields) in &role.protected {
        if entity.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("empty protected entity for role {name}")));
        }
        if fields.len() > MAX_WHITELIST_FIELDS {
            return Err(ConfigError::Invalid(format!(
                "too many whitelist fields for role {name} entity {entity}"
            )));
        }
        if fields.iter().any(|field| field.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "empty whitelist field for role {name} entity {entity}"
            )));
        }
    }
    Ok(())
}
