// warden-core/src/core/matrix.rs
// ============================================================================
// Module: Warden Permission Matrix
// Description: Role and resource permission lookup with default-role fallback.
// Purpose: Decide whether a role may perform an action on a resource, deny by omission.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! The permission matrix maps roles to the resources they may act on and the
//! actions they may perform. Resources are entity names or special capability
//! names (maintenance tools and similar); both use the same lookup. No action
//! is permitted by omission: an absent role, resource, or action entry is an
//! explicit denial. A configured default role provides the fallback entry for
//! roles the matrix does not know.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ActionName;
use crate::core::identifiers::RoleName;
use crate::core::principal::Principal;

// ============================================================================
// SECTION: Permission Matrix
// ============================================================================

/// Allowed actions per resource for a single role.
pub type ResourcePermissions = BTreeMap<String, BTreeSet<ActionName>>;

/// Role-based permission matrix with root designation and default fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionMatrix {
    /// Permission entries keyed by role name.
    roles: BTreeMap<RoleName, ResourcePermissions>,
    /// Role holding the highest privilege level.
    root_role: Option<RoleName>,
    /// Fallback role consulted when a role has no entry of its own.
    default_role: Option<RoleName>,
}

impl PermissionMatrix {
    /// Creates an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Designates the root role.
    pub fn set_root_role(&mut self, role: impl Into<RoleName>) {
        self.root_role = Some(role.into());
    }

    /// Designates the default fallback role.
    pub fn set_default_role(&mut self, role: impl Into<RoleName>) {
        self.default_role = Some(role.into());
    }

    /// Grants a set of actions on a resource to a role. Granting merges with
    /// any existing entry for the same role and resource.
    pub fn grant(
        &mut self,
        role: impl Into<RoleName>,
        resource: impl Into<String>,
        actions: impl IntoIterator<Item = ActionName>,
    ) {
        let entry = self.roles.entry(role.into()).or_default().entry(resource.into()).or_default();
        entry.extend(actions);
    }

    /// Returns whether the role may perform the action on the resource.
    ///
    /// Lookup order: exact role entry; when the role has no entry at all, the
    /// configured default role's entry; an absent resource entry within the
    /// consulted role denies.
    #[must_use]
    pub fn allowed(&self, role: &RoleName, resource: &str, action: &ActionName) -> bool {
        let permissions = match self.roles.get(role) {
            Some(permissions) => permissions,
            None => match self.default_role.as_ref().and_then(|fallback| self.roles.get(fallback)) {
                Some(permissions) => permissions,
                None => return false,
            },
        };
        permissions.get(resource).is_some_and(|actions| actions.contains(action))
    }

    /// Returns whether the role is configured in the matrix. A principal
    /// whose role fails this check is treated as unauthenticated.
    #[must_use]
    pub fn knows_role(&self, role: &RoleName) -> bool {
        self.roles.contains_key(role)
    }

    /// Returns whether the principal holds the root role.
    #[must_use]
    pub fn is_root(&self, principal: &Principal) -> bool {
        self.root_role.as_ref() == Some(&principal.role)
    }
}
