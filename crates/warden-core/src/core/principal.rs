// warden-core/src/core/principal.rs
// ============================================================================
// Module: Warden Principals
// Description: Acting principal identity, role binding, and account status.
// Purpose: Represent the authenticated identity threaded through every call.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! A [`Principal`] is the explicit identity parameter threaded through every
//! engine call; there is no ambient "current user" lookup inside the core.
//! Principals are revalidated on every access: a principal whose role is no
//! longer configured, or whose status is disabled, is treated as
//! unauthenticated rather than merely denied.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::PrincipalId;
use crate::core::identifiers::RoleName;

// ============================================================================
// SECTION: Principal Types
// ============================================================================

/// Account status for a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalStatus {
    /// The account is active and may act.
    Active,
    /// The account is disabled and must be treated as unauthenticated.
    Disabled,
}

/// Acting principal identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Principal identifier.
    pub id: PrincipalId,
    /// Role name keyed into the permission matrix.
    pub role: RoleName,
    /// Account status, checked on every access.
    pub status: PrincipalStatus,
}

impl Principal {
    /// Creates a new active principal.
    #[must_use]
    pub fn new(id: impl Into<PrincipalId>, role: impl Into<RoleName>) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
            status: PrincipalStatus::Active,
        }
    }

    /// Returns true when the account status is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, PrincipalStatus::Active)
    }
}
